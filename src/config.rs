// 该文件是 Dianjian （点检万象） 项目的一部分。
// src/config.rs - 流水线配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::{Path, PathBuf};

/// 流水线配置
///
/// 暂存目录、输出目录与支持的扩展名都通过该结构显式传入各组件，
/// 不依赖进程级常量。
#[derive(Debug, Clone)]
pub struct PipelineConfig {
  /// 暂存目录（待处理图片集中于此）
  pub staging_dir: PathBuf,
  /// 输出目录（标注结果写入此处）
  pub output_dir: PathBuf,
  /// 支持的图片扩展名（小写，不带点号）
  pub supported_extensions: Vec<String>,
  /// 输出文件名前缀
  pub result_prefix: String,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      staging_dir: PathBuf::from("input_images"),
      output_dir: PathBuf::from("results"),
      supported_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
      result_prefix: "RESULT_".to_string(),
    }
  }
}

impl PipelineConfig {
  /// 判断路径的扩展名是否在支持集合中（不区分大小写）
  pub fn is_supported(&self, path: &Path) -> bool {
    path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(|ext| {
        let ext = ext.to_ascii_lowercase();
        self.supported_extensions.iter().any(|s| *s == ext)
      })
      .unwrap_or(false)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_directories_and_extensions() {
    let config = PipelineConfig::default();
    assert_eq!(config.staging_dir, PathBuf::from("input_images"));
    assert_eq!(config.output_dir, PathBuf::from("results"));
    assert_eq!(config.supported_extensions, vec!["jpg", "jpeg", "png"]);
    assert_eq!(config.result_prefix, "RESULT_");
  }

  #[test]
  fn extension_match_is_case_insensitive() {
    let config = PipelineConfig::default();
    assert!(config.is_supported(Path::new("a.jpg")));
    assert!(config.is_supported(Path::new("c.PNG")));
    assert!(config.is_supported(Path::new("d.JpEg")));
    assert!(!config.is_supported(Path::new("b.txt")));
    assert!(!config.is_supported(Path::new("noext")));
  }
}
