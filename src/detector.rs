// 该文件是 Dianjian （点检万象） 项目的一部分。
// src/detector.rs - 检测器接口与检测结果
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
  #[error("无法加载模型 {path}: {message}")]
  ModelLoad { path: String, message: String },
  #[error("推理失败: {0}")]
  Inference(String),
}

/// 单个检测框
///
/// 坐标与尺寸均为原始图像像素。
#[derive(Clone, Debug)]
pub struct Detection {
  /// 边界框左上角 x 坐标
  pub x: f32,
  /// 边界框左上角 y 坐标
  pub y: f32,
  /// 边界框宽度
  pub width: f32,
  /// 边界框高度
  pub height: f32,
  /// 置信度
  pub confidence: f32,
  /// 类别索引
  pub class_id: usize,
}

/// 目标检测能力的统一接口
///
/// 模型在进程启动时加载一次，此后仅用于推理。
/// 测试中可以用桩实现替换真实模型。
pub trait Detector {
  /// 对单张图像执行检测，空列表表示"未检测到物体"，不是错误
  fn detect(&mut self, image: &RgbImage) -> Result<Vec<Detection>, DetectError>;

  /// 类别索引到类别名称的映射表
  fn labels(&self) -> &[&'static str];
}

/// 按类别名称统计的检测数量
///
/// 条目顺序为类别首次出现的顺序，不做排序。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelCount {
  counts: Vec<(String, usize)>,
}

impl LabelCount {
  /// 将检测框的类别索引映射为名称并统计数量
  pub fn tally(detections: &[Detection], labels: &[&str]) -> Self {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for detection in detections {
      let name = labels.get(detection.class_id).copied().unwrap_or("unknown");
      match counts.iter_mut().find(|(label, _)| label == name) {
        Some((_, count)) => *count += 1,
        None => counts.push((name.to_string(), 1)),
      }
    }

    Self { counts }
  }

  pub fn is_empty(&self) -> bool {
    self.counts.is_empty()
  }

  pub fn len(&self) -> usize {
    self.counts.len()
  }

  /// 按首次出现顺序迭代 (类别名称, 数量)
  pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
    self.counts.iter().map(|(label, count)| (label.as_str(), *count))
  }

  pub fn get(&self, label: &str) -> Option<usize> {
    self
      .counts
      .iter()
      .find(|(name, _)| name == label)
      .map(|(_, count)| *count)
  }
}

mod yolo;
pub use self::yolo::{COCO_CLASSES, YoloDetector};

#[cfg(test)]
mod tests {
  use super::*;

  fn detection(class_id: usize) -> Detection {
    Detection {
      x: 0.0,
      y: 0.0,
      width: 10.0,
      height: 10.0,
      confidence: 0.9,
      class_id,
    }
  }

  #[test]
  fn tally_keeps_first_encounter_order() {
    let labels = ["cat", "dog"];
    let detections = vec![detection(0), detection(0), detection(1)];

    let counts = LabelCount::tally(&detections, &labels);

    let pairs: Vec<_> = counts.iter().collect();
    assert_eq!(pairs, vec![("cat", 2), ("dog", 1)]);
  }

  #[test]
  fn tally_of_empty_detections_is_empty() {
    let labels = ["cat", "dog"];
    let counts = LabelCount::tally(&[], &labels);

    assert!(counts.is_empty());
    assert_eq!(counts.len(), 0);
  }

  #[test]
  fn tally_maps_unknown_class_ids() {
    let labels = ["cat"];
    let detections = vec![detection(0), detection(7)];

    let counts = LabelCount::tally(&detections, &labels);

    assert_eq!(counts.get("cat"), Some(1));
    assert_eq!(counts.get("unknown"), Some(1));
  }
}
