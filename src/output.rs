// 该文件是 Dianjian （点检万象） 项目的一部分。
// src/output.rs - 输出定义
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::{Path, PathBuf};

use image::RgbImage;
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::detector::Detection;

mod image_output;
mod visualizer;

pub use self::image_output::ImageOutput;
pub use self::visualizer::Visualizer;

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("字体加载错误: {0}")]
  FontError(String),
}

/// 输出写入器 trait
pub trait OutputWriter {
  /// 写入一帧及其检测结果
  fn write_frame(
    &mut self,
    image: &RgbImage,
    detections: &[Detection],
    labels: &[&str],
  ) -> Result<(), OutputError>;

  /// 完成写入
  fn finish(&mut self) -> Result<(), OutputError>;
}

/// 根据输入文件名计算输出文件路径: <输出目录>/<前缀><主干名>.png
///
/// 同名输入重复处理时直接覆盖旧结果。
pub fn result_path(input: &Path, config: &PipelineConfig) -> PathBuf {
  let stem = input
    .file_stem()
    .and_then(|stem| stem.to_str())
    .unwrap_or("output");

  config
    .output_dir
    .join(format!("{}{}.png", config.result_prefix, stem))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn result_path_uses_prefix_and_stem() {
    let config = PipelineConfig::default();
    let path = result_path(Path::new("input_images/th-2704056574.jpeg"), &config);

    assert_eq!(path, Path::new("results/RESULT_th-2704056574.png"));
  }

  #[test]
  fn result_path_is_deterministic_for_same_stem() {
    let config = PipelineConfig::default();
    let a = result_path(Path::new("input_images/photo.jpg"), &config);
    let b = result_path(Path::new("elsewhere/photo.png"), &config);

    assert_eq!(a, b);
  }
}
