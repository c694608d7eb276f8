// 该文件是 Dianjian （点检万象） 项目的一部分。
// src/staging.rs - 文件整理：目录准备、图片收入与批次列举
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::PipelineConfig;

#[derive(Error, Debug)]
pub enum StagingError {
  #[error("源文件不存在: {0}")]
  SourceNotFound(PathBuf),
  #[error("文件名无效: {0}")]
  InvalidFileName(PathBuf),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// 确保目录存在，已存在时不做任何操作
pub fn ensure_directory(dir: &Path) -> Result<(), StagingError> {
  if dir.is_dir() {
    info!("目录已存在: {}", dir.display());
  } else {
    fs::create_dir_all(dir)?;
    info!("目录已创建: {}", dir.display());
  }
  Ok(())
}

/// 将一个游离图片文件收入暂存目录
///
/// 先复制后删除，复制失败时原文件保持原样。
/// 已位于暂存目录内的文件原路返回，不做任何移动。
pub fn stage_file(source: &Path, config: &PipelineConfig) -> Result<PathBuf, StagingError> {
  if !source.is_file() {
    return Err(StagingError::SourceNotFound(source.to_path_buf()));
  }

  if in_staging_dir(source, config) {
    debug!("文件已在暂存目录中: {}", source.display());
    return Ok(source.to_path_buf());
  }

  let file_name = source
    .file_name()
    .ok_or_else(|| StagingError::InvalidFileName(source.to_path_buf()))?;
  let staged = config.staging_dir.join(file_name);

  fs::copy(source, &staged)?;
  fs::remove_file(source)?;
  info!("已收入暂存目录: {} -> {}", source.display(), staged.display());

  Ok(staged)
}

fn in_staging_dir(source: &Path, config: &PipelineConfig) -> bool {
  let parent = match source.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => Path::new("."),
  };

  // 符号链接与相对路径都可能指向同一目录，能规范化时按规范化路径比较
  match (parent.canonicalize(), config.staging_dir.canonicalize()) {
    (Ok(a), Ok(b)) => a == b,
    _ => parent == config.staging_dir,
  }
}

/// 扫描一个目录中的游离图片（不递归）
pub fn collect_loose_images(
  dir: &Path,
  config: &PipelineConfig,
) -> Result<Vec<PathBuf>, StagingError> {
  let mut images = Vec::new();

  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    let path = entry.path();
    if path.is_file() && config.is_supported(&path) {
      images.push(path);
    }
  }

  images.sort();
  debug!("工作目录中发现 {} 张游离图片", images.len());

  Ok(images)
}

/// 列举暂存目录中可处理的图片
///
/// 空列表表示"没有可处理的内容"，不是错误。
pub fn list_staged(config: &PipelineConfig) -> Result<Vec<PathBuf>, StagingError> {
  let mut images = Vec::new();

  for entry in fs::read_dir(&config.staging_dir)? {
    let entry = entry?;
    let path = entry.path();
    if path.is_file() && config.is_supported(&path) {
      images.push(path);
    }
  }

  images.sort();
  debug!("暂存目录中共 {} 张待处理图片", images.len());

  Ok(images)
}
