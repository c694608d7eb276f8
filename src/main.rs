// 该文件是 Dianjian （点检万象） 项目的一部分。
// src/main.rs - 批量检测主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

mod args;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use dianjian::config::PipelineConfig;
use dianjian::detector::YoloDetector;
use dianjian::output::Visualizer;
use dianjian::task::{BatchTask, RunOptions};

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();

  println!("Dianjian 批量目标检测");
  println!("====================");
  println!("模型文件路径: {}", args.model);
  println!("暂存目录: {}", args.staging_dir.display());
  println!("输出目录: {}", args.output_dir.display());
  println!("置信度阈值: {}", args.confidence);
  println!("NMS 阈值: {}", args.nms_threshold);
  println!();

  let config = PipelineConfig {
    staging_dir: args.staging_dir,
    output_dir: args.output_dir,
    ..PipelineConfig::default()
  };

  // 加载模型（每个进程只加载一次）
  println!("正在加载模型...");
  let mut detector = YoloDetector::new(&args.model, args.confidence, args.nms_threshold)?;
  println!("模型加载完成");

  let visualizer = match &args.font {
    Some(path) => Visualizer::with_font(path)?,
    None => Visualizer::new(),
  };

  let (tx, rx) = std::sync::mpsc::channel();
  ctrlc::set_handler(move || {
    info!("收到中断信号，准备退出...");
    let _ = tx.send(());
  })
  .expect("Error setting Ctrl-C handler");

  let options = RunOptions {
    verbose: args.verbose,
    record: args.record,
  };

  let summary = BatchTask::new(options)
    .with_interrupt(&rx)
    .run(&mut detector, &config, &visualizer)?;

  println!();
  println!("处理完成!");
  println!("[INFO] 收入图片: {} 张（失败 {} 张）", summary.staged, summary.intake_failures);
  println!("[INFO] 处理成功: {} 张", summary.processed);
  println!("[INFO] 处理失败: {} 张", summary.failures);
  if summary.interrupted {
    println!("[!] 任务被中断，剩余图片未处理");
  }

  Ok(())
}
