// 该文件是 Dianjian （点检万象） 项目的一部分。
// src/args.rs - 项目参数配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use clap::Parser;

/// Dianjian 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// ONNX 模型文件路径
  #[arg(long, default_value = "yolov8n.onnx", value_name = "FILE")]
  pub model: String,

  /// 暂存目录（待处理图片集中于此）
  #[arg(long, default_value = "input_images", value_name = "DIR")]
  pub staging_dir: PathBuf,

  /// 输出目录（标注结果写入此处）
  #[arg(long, default_value = "results", value_name = "DIR")]
  pub output_dir: PathBuf,

  /// 置信度阈值 (0.0 - 1.0)
  #[arg(long, default_value = "0.5", value_name = "THRESHOLD")]
  pub confidence: f32,

  /// NMS IOU 阈值 (0.0 - 1.0)
  #[arg(long, default_value = "0.45", value_name = "THRESHOLD")]
  pub nms_threshold: f32,

  /// 标签文字字体文件（TTF），缺省时只绘制边框
  #[arg(long, value_name = "FILE")]
  pub font: Option<PathBuf>,

  /// 同时写出检测记录文本文件
  #[arg(long)]
  pub record: bool,

  /// 输出每个检测框的详细信息
  #[arg(short, long)]
  pub verbose: bool,
}
