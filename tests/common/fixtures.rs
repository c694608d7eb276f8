use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use dianjian::config::PipelineConfig;
use dianjian::detector::{DetectError, Detection, Detector};

/// 测试用类别映射表
pub const TEST_LABELS: [&str; 2] = ["cat", "dog"];

/// 测试用颜色常量
pub const TEST_RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const TEST_GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const TEST_BLUE: Rgb<u8> = Rgb([0, 0, 255]);

/// 在指定路径生成一张 64x64 的纯色测试图片
pub fn save_test_image(path: &Path, color: Rgb<u8>) {
  let img: RgbImage = ImageBuffer::from_fn(64, 64, |_, _| color);
  img.save(path).expect("Failed to save test image");
}

/// 创建一个根在临时目录下的流水线配置
pub fn test_config(root: &Path) -> PipelineConfig {
  PipelineConfig {
    staging_dir: root.join("input_images"),
    output_dir: root.join("results"),
    ..PipelineConfig::default()
  }
}

/// 返回一个指定类别的检测框
pub fn make_detection(class_id: usize) -> Detection {
  Detection {
    x: 8.0,
    y: 8.0,
    width: 16.0,
    height: 16.0,
    confidence: 0.9,
    class_id,
  }
}

/// 检测器桩实现，代替真实模型
///
/// 每次调用返回固定的检测列表；可配置为对首像素为特定颜色的
/// 图片返回推理错误，用于测试单张失败的隔离。
pub struct StubDetector {
  detections: Vec<Detection>,
  fail_on: Option<Rgb<u8>>,
  pub calls: usize,
}

impl StubDetector {
  pub fn returning(detections: Vec<Detection>) -> Self {
    Self {
      detections,
      fail_on: None,
      calls: 0,
    }
  }

  pub fn failing_on(mut self, color: Rgb<u8>) -> Self {
    self.fail_on = Some(color);
    self
  }
}

impl Detector for StubDetector {
  fn detect(&mut self, image: &RgbImage) -> Result<Vec<Detection>, DetectError> {
    self.calls += 1;

    if let Some(color) = self.fail_on {
      // 测试图片以有损 JPEG 存储，首像素颜色会有微小偏移，
      // 因此按通道容差比较而非精确相等。
      let px = image.get_pixel(0, 0);
      let near = (0..3).all(|i| px.0[i].abs_diff(color.0[i]) <= 4);
      if near {
        return Err(DetectError::Inference("模拟推理失败".to_string()));
      }
    }

    Ok(self.detections.clone())
  }

  fn labels(&self) -> &[&'static str] {
    &TEST_LABELS
  }
}
