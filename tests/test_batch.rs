//! 批量任务的集成测试：收入、列举、单张失败隔离与统计。

mod common;

use common::*;
use dianjian::output::Visualizer;
use dianjian::task::{BatchTask, RunOptions};

#[test]
fn batch_stages_loose_images_and_processes_them() -> anyhow::Result<()> {
  let dir = tempfile::TempDir::new()?;
  let config = test_config(dir.path());

  // 工作目录中的游离图片与无关文件
  save_test_image(&dir.path().join("one.jpg"), TEST_GREEN);
  save_test_image(&dir.path().join("two.png"), TEST_BLUE);
  std::fs::write(dir.path().join("notes.txt"), b"keep me")?;

  let mut detector = StubDetector::returning(vec![make_detection(0)]);

  let summary = BatchTask::new(RunOptions::default())
    .with_work_dir(dir.path().to_path_buf())
    .run(&mut detector, &config, &Visualizer::new())?;

  assert_eq!(summary.staged, 2);
  assert_eq!(summary.intake_failures, 0);
  assert_eq!(summary.processed, 2);
  assert_eq!(summary.failures, 0);
  assert!(!summary.interrupted);

  // 游离图片被移入暂存目录，原位置不再存在
  assert!(!dir.path().join("one.jpg").exists());
  assert!(config.staging_dir.join("one.jpg").is_file());
  assert!(config.staging_dir.join("two.png").is_file());

  // 无关文件留在原处
  assert!(dir.path().join("notes.txt").is_file());

  // 每张图片都有对应的结果图片
  assert!(config.output_dir.join("RESULT_one.png").is_file());
  assert!(config.output_dir.join("RESULT_two.png").is_file());

  Ok(())
}

#[test]
fn one_failing_image_does_not_abort_batch() -> anyhow::Result<()> {
  let dir = tempfile::TempDir::new()?;
  let config = test_config(dir.path());
  std::fs::create_dir_all(&config.staging_dir)?;

  // 按名称排序后 b.jpg 位于中间，桩检测器对红色图片报错
  save_test_image(&config.staging_dir.join("a.jpg"), TEST_GREEN);
  save_test_image(&config.staging_dir.join("b.jpg"), TEST_RED);
  save_test_image(&config.staging_dir.join("c.jpg"), TEST_BLUE);

  let mut detector = StubDetector::returning(vec![make_detection(1)]).failing_on(TEST_RED);

  let summary = BatchTask::new(RunOptions::default())
    .with_work_dir(dir.path().to_path_buf())
    .run(&mut detector, &config, &Visualizer::new())?;

  assert_eq!(summary.processed, 2);
  assert_eq!(summary.failures, 1);
  assert_eq!(detector.calls, 3);

  // 失败图片前后的两张都有结果
  assert!(config.output_dir.join("RESULT_a.png").is_file());
  assert!(!config.output_dir.join("RESULT_b.png").exists());
  assert!(config.output_dir.join("RESULT_c.png").is_file());

  Ok(())
}

#[test]
fn empty_staging_directory_ends_cleanly() -> anyhow::Result<()> {
  let dir = tempfile::TempDir::new()?;
  let config = test_config(dir.path());

  let mut detector = StubDetector::returning(vec![make_detection(0)]);

  let summary = BatchTask::new(RunOptions::default())
    .with_work_dir(dir.path().to_path_buf())
    .run(&mut detector, &config, &Visualizer::new())?;

  assert_eq!(summary.staged, 0);
  assert_eq!(summary.processed, 0);
  assert_eq!(summary.failures, 0);
  assert_eq!(detector.calls, 0);

  // 目录已由任务准备好
  assert!(config.staging_dir.is_dir());
  assert!(config.output_dir.is_dir());

  Ok(())
}

#[test]
fn corrupt_staged_file_is_isolated() -> anyhow::Result<()> {
  let dir = tempfile::TempDir::new()?;
  let config = test_config(dir.path());
  std::fs::create_dir_all(&config.staging_dir)?;

  save_test_image(&config.staging_dir.join("good.jpg"), TEST_GREEN);
  std::fs::write(config.staging_dir.join("junk.jpg"), b"not an image")?;

  let mut detector = StubDetector::returning(vec![make_detection(0)]);

  let summary = BatchTask::new(RunOptions::default())
    .with_work_dir(dir.path().to_path_buf())
    .run(&mut detector, &config, &Visualizer::new())?;

  assert_eq!(summary.processed, 1);
  assert_eq!(summary.failures, 1);
  assert!(config.output_dir.join("RESULT_good.png").is_file());

  Ok(())
}
