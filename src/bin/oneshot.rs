// 该文件是 Dianjian （点检万象） 项目的一部分。
// src/bin/oneshot.rs - 单张图片检测
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use dianjian::config::PipelineConfig;
use dianjian::detector::YoloDetector;
use dianjian::output::Visualizer;
use dianjian::staging;
use dianjian::task::{RunOptions, process_image};

/// Dianjian 单张图片检测参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 待检测的图片路径
  #[arg(value_name = "IMAGE")]
  pub image: PathBuf,

  /// ONNX 模型文件路径
  #[arg(long, default_value = "yolov8n.onnx", value_name = "FILE")]
  pub model: String,

  /// 输出目录（标注结果写入此处）
  #[arg(long, default_value = "results", value_name = "DIR")]
  pub output_dir: PathBuf,

  /// 标签文字字体文件（TTF），缺省时只绘制边框
  #[arg(long, value_name = "FILE")]
  pub font: Option<PathBuf>,

  /// 输出每个检测框的详细信息
  #[arg(short, long)]
  pub verbose: bool,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("模型文件路径: {}", args.model);
  info!("输入图片: {}", args.image.display());
  info!("输出目录: {}", args.output_dir.display());

  let config = PipelineConfig {
    output_dir: args.output_dir,
    ..PipelineConfig::default()
  };

  staging::ensure_directory(&config.output_dir)?;

  let mut detector = YoloDetector::new(&args.model, 0.5, 0.45)?;

  let visualizer = match &args.font {
    Some(path) => Visualizer::with_font(path)?,
    None => Visualizer::new(),
  };

  let options = RunOptions {
    verbose: args.verbose,
    record: false,
  };

  println!("[INFO] 正在处理: {}", args.image.display());
  process_image(&mut detector, &args.image, &config, &visualizer, &options)?;

  Ok(())
}
