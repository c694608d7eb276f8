// 该文件是 Dianjian （点检万象） 项目的一部分。
// src/output/image_output.rs - 标注图片输出
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use image::RgbImage;
use tracing::debug;

use super::{OutputError, OutputWriter, Visualizer};
use crate::detector::Detection;

/// 标注图片输出
///
/// 即使没有任何检测框也会写出结果图片；同名旧结果直接覆盖。
pub struct ImageOutput {
  /// 输出路径
  output_path: PathBuf,
  /// 检测记录文本路径（与图片同名的 .txt 文件）
  record_path: Option<PathBuf>,
  /// 可视化工具
  visualizer: Visualizer,
}

impl ImageOutput {
  /// 创建一个新的标注图片输出
  pub fn new(output_path: PathBuf, visualizer: Visualizer) -> Self {
    Self {
      output_path,
      record_path: None,
      visualizer,
    }
  }

  /// 同时写出检测记录文本文件
  pub fn with_record(mut self) -> Self {
    self.record_path = Some(self.output_path.with_extension("txt"));
    self
  }

  fn write_record(&self, detections: &[Detection], labels: &[&str]) -> Result<(), OutputError> {
    let Some(record_path) = &self.record_path else {
      return Ok(());
    };

    let mut records = Vec::new();
    for detection in detections {
      let name = labels.get(detection.class_id).copied().unwrap_or("unknown");
      records.push(format!(
        "{}, {:.4}, {:.4}, {:.4}, {:.4}, {:.4}",
        name,
        detection.confidence,
        detection.x,
        detection.y,
        detection.width,
        detection.height
      ));
    }

    std::fs::write(record_path, records.join("\n"))?;
    debug!("检测记录已写出: {}", record_path.display());

    Ok(())
  }
}

impl OutputWriter for ImageOutput {
  fn write_frame(
    &mut self,
    image: &RgbImage,
    detections: &[Detection],
    labels: &[&str],
  ) -> Result<(), OutputError> {
    let mut output_image = image.clone();
    self
      .visualizer
      .draw_detections(&mut output_image, detections, labels);

    if let Some(parent) = self.output_path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    output_image.save(&self.output_path)?;
    debug!("结果图片已保存: {}", self.output_path.display());

    self.write_record(detections, labels)?;

    Ok(())
  }

  fn finish(&mut self) -> Result<(), OutputError> {
    Ok(())
  }
}
