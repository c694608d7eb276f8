// 该文件是 Dianjian （点检万象） 项目的一部分。
// src/task.rs - 检测运行器与批量任务编排
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use anyhow::{Context, Result};
use image::ImageReader;
use tracing::{error, info, warn};

use crate::config::PipelineConfig;
use crate::detector::{Detector, LabelCount};
use crate::output::{ImageOutput, OutputWriter, Visualizer, result_path};
use crate::staging;

/// 运行选项
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  /// 输出每个检测框的详细信息
  pub verbose: bool,
  /// 同时写出检测记录文本文件
  pub record: bool,
}

/// 单张图像的处理结果
#[derive(Debug)]
pub struct ProcessOutcome {
  /// 按类别统计的检测数量
  pub counts: LabelCount,
  /// 标注结果图片的保存路径
  pub saved_path: PathBuf,
}

/// 对单张图像执行检测、计数并保存标注结果
///
/// 没有检测到物体是正常结果，仍然写出（未标注的）结果图片。
pub fn process_image<D: Detector + ?Sized>(
  detector: &mut D,
  image_path: &Path,
  config: &PipelineConfig,
  visualizer: &Visualizer,
  options: &RunOptions,
) -> Result<ProcessOutcome> {
  let image = ImageReader::open(image_path)
    .with_context(|| format!("无法打开图片文件: {}", image_path.display()))?
    .decode()
    .with_context(|| format!("无法解码图片文件: {}", image_path.display()))?
    .to_rgb8();

  let detections = detector
    .detect(&image)
    .with_context(|| format!("推理失败: {}", image_path.display()))?;
  let labels = detector.labels();
  let counts = LabelCount::tally(&detections, labels);

  if counts.is_empty() {
    println!("[!] 未检测到任何物体");
  } else {
    println!("[INFO] 检测到的物体:");
    for (label, count) in counts.iter() {
      println!("[+] {}: {}", label, count);
    }
  }

  if options.verbose {
    for detection in &detections {
      let name = labels.get(detection.class_id).copied().unwrap_or("unknown");
      println!(
        "  - {}: {:.2}% at ({:.0}, {:.0}, {:.0}x{:.0})",
        name,
        detection.confidence * 100.0,
        detection.x,
        detection.y,
        detection.width,
        detection.height
      );
    }
  }

  let saved_path = result_path(image_path, config);
  let mut writer = ImageOutput::new(saved_path.clone(), visualizer.clone());
  if options.record {
    writer = writer.with_record();
  }

  writer
    .write_frame(&image, &detections, labels)
    .with_context(|| format!("无法保存结果图片: {}", saved_path.display()))?;
  writer.finish()?;

  println!("[+] 结果已保存到: {}", saved_path.display());

  Ok(ProcessOutcome { counts, saved_path })
}

/// 批量任务统计
#[derive(Debug, Default)]
pub struct BatchSummary {
  /// 收入暂存目录的图片数
  pub staged: usize,
  /// 收入失败的文件数
  pub intake_failures: usize,
  /// 处理成功的图片数
  pub processed: usize,
  /// 处理失败的图片数
  pub failures: usize,
  /// 任务是否被中断
  pub interrupted: bool,
}

/// 批量任务：准备目录、收入游离图片、逐张检测
///
/// 单张图片的失败不影响其余图片，统计在 `BatchSummary` 中返回。
pub struct BatchTask<'a> {
  options: RunOptions,
  work_dir: PathBuf,
  interrupt: Option<&'a Receiver<()>>,
}

impl<'a> BatchTask<'a> {
  pub fn new(options: RunOptions) -> Self {
    Self {
      options,
      work_dir: PathBuf::from("."),
      interrupt: None,
    }
  }

  /// 指定扫描游离图片的工作目录（默认为当前目录）
  pub fn with_work_dir(mut self, work_dir: PathBuf) -> Self {
    self.work_dir = work_dir;
    self
  }

  /// 指定中断信号接收端，收到信号后在当前图片处理完成时退出循环
  pub fn with_interrupt(mut self, interrupt: &'a Receiver<()>) -> Self {
    self.interrupt = Some(interrupt);
    self
  }

  pub fn run<D: Detector + ?Sized>(
    &self,
    detector: &mut D,
    config: &PipelineConfig,
    visualizer: &Visualizer,
  ) -> Result<BatchSummary> {
    info!("开始批量任务...");

    // 准备目录
    staging::ensure_directory(&config.staging_dir).context("无法准备暂存目录")?;
    staging::ensure_directory(&config.output_dir).context("无法准备输出目录")?;

    let mut summary = BatchSummary::default();

    // 收入工作目录中的游离图片
    let loose = staging::collect_loose_images(&self.work_dir, config)
      .with_context(|| format!("无法扫描工作目录: {}", self.work_dir.display()))?;
    for path in &loose {
      match staging::stage_file(path, config) {
        Ok(_) => summary.staged += 1,
        Err(e) => {
          summary.intake_failures += 1;
          error!("收入失败 {}: {}", path.display(), e);
          println!("[!] 收入失败: {}", path.display());
        }
      }
    }

    // 列举暂存目录
    let staged = staging::list_staged(config).context("无法列举暂存目录")?;
    if staged.is_empty() {
      println!("[!] 暂存目录中没有可处理的图片");
      info!("暂存目录为空，任务结束");
      return Ok(summary);
    }

    info!("共 {} 张图片待处理", staged.len());

    // 逐张处理，单张失败不中断批次
    for path in &staged {
      println!();
      println!("[INFO] 正在处理: {}", path.display());

      match process_image(detector, path, config, visualizer, &self.options) {
        Ok(_) => summary.processed += 1,
        Err(e) => {
          summary.failures += 1;
          error!("处理失败 {}: {:#}", path.display(), e);
          println!("[!] 处理失败: {}", path.display());
        }
      }

      if let Some(interrupt) = self.interrupt
        && interrupt.try_recv().is_ok()
      {
        warn!("中断信号接收，退出处理循环");
        summary.interrupted = true;
        break;
      }
    }

    info!("批量任务完成");
    Ok(summary)
  }
}
