// 该文件是 Dianjian （点检万象） 项目的一部分。
// src/detector/yolo.rs - YOLO 目标检测器（ONNX Runtime 后端）
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use ndarray::{Array4, ArrayD};
use ort::{
  session::{Session, builder::GraphOptimizationLevel},
  value::TensorRef,
};
use tracing::{debug, info};

use super::{DetectError, Detection, Detector};

/// COCO 数据集类别名称
pub const COCO_CLASSES: [&str; 80] = [
  "person",
  "bicycle",
  "car",
  "motorcycle",
  "airplane",
  "bus",
  "train",
  "truck",
  "boat",
  "traffic light",
  "fire hydrant",
  "stop sign",
  "parking meter",
  "bench",
  "bird",
  "cat",
  "dog",
  "horse",
  "sheep",
  "cow",
  "elephant",
  "bear",
  "zebra",
  "giraffe",
  "backpack",
  "umbrella",
  "handbag",
  "tie",
  "suitcase",
  "frisbee",
  "skis",
  "snowboard",
  "sports ball",
  "kite",
  "baseball bat",
  "baseball glove",
  "skateboard",
  "surfboard",
  "tennis racket",
  "bottle",
  "wine glass",
  "cup",
  "fork",
  "knife",
  "spoon",
  "bowl",
  "banana",
  "apple",
  "sandwich",
  "orange",
  "broccoli",
  "carrot",
  "hot dog",
  "pizza",
  "donut",
  "cake",
  "chair",
  "couch",
  "potted plant",
  "bed",
  "dining table",
  "toilet",
  "tv",
  "laptop",
  "mouse",
  "remote",
  "keyboard",
  "cell phone",
  "microwave",
  "oven",
  "toaster",
  "sink",
  "refrigerator",
  "book",
  "clock",
  "vase",
  "scissors",
  "teddy bear",
  "hair drier",
  "toothbrush",
];

const YOLO_INPUT_W: u32 = 640;
const YOLO_INPUT_H: u32 = 640;

/// YOLO 目标检测器
pub struct YoloDetector {
  /// ONNX Runtime 会话
  session: Session,
  /// 模型输入宽度
  input_width: u32,
  /// 模型输入高度
  input_height: u32,
  /// 置信度阈值
  confidence_threshold: f32,
  /// NMS IOU 阈值
  nms_threshold: f32,
  /// 类别数量
  num_classes: usize,
}

impl YoloDetector {
  /// 从 ONNX 权重文件创建一个新的 YOLO 检测器
  pub fn new(
    model_path: &str,
    confidence_threshold: f32,
    nms_threshold: f32,
  ) -> Result<Self, DetectError> {
    info!("加载模型文件: {}", model_path);
    let session = build_session(model_path).map_err(|e| DetectError::ModelLoad {
      path: model_path.to_string(),
      message: e.to_string(),
    })?;
    info!("模型加载完成");

    Ok(Self {
      session,
      input_width: YOLO_INPUT_W,
      input_height: YOLO_INPUT_H,
      confidence_threshold,
      nms_threshold,
      num_classes: COCO_CLASSES.len(),
    })
  }

  /// 预处理图像：缩放到模型输入尺寸并归一化为 NCHW 浮点张量
  fn preprocess(&self, image: &RgbImage) -> Array4<f32> {
    let resized = image::imageops::resize(
      image,
      self.input_width,
      self.input_height,
      image::imageops::FilterType::Triangle,
    );

    let mut input = Array4::<f32>::zeros((
      1,
      3,
      self.input_height as usize,
      self.input_width as usize,
    ));

    for (x, y, pixel) in resized.enumerate_pixels() {
      for c in 0..3 {
        input[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
      }
    }

    input
  }

  fn run_inference(&mut self, input: &Array4<f32>) -> ort::Result<ArrayD<f32>> {
    let outputs = self.session.run(ort::inputs![
      "images" => TensorRef::from_array_view(input.view())?
    ])?;

    Ok(outputs["output0"].try_extract_array::<f32>()?.into_owned())
  }

  /// 后处理输出
  ///
  /// YOLOv8 输出布局: [1, 4 + num_classes, num_anchors]，
  /// 前 4 行为 cx, cy, w, h（模型输入像素），其余各行为类别分数。
  fn postprocess(
    &self,
    output: &ArrayD<f32>,
    original_width: f32,
    original_height: f32,
  ) -> Result<Vec<Detection>, DetectError> {
    let shape = output.shape();
    if shape.len() != 3 || shape[1] != 4 + self.num_classes {
      return Err(DetectError::Inference(format!(
        "意外的模型输出形状: {:?}, 期望 [1, {}, N]",
        shape,
        4 + self.num_classes
      )));
    }

    let num_anchors = shape[2];
    let scale_x = original_width / self.input_width as f32;
    let scale_y = original_height / self.input_height as f32;

    let mut detections = Vec::new();

    for i in 0..num_anchors {
      // 找到最高类别分数
      let mut max_score = 0.0f32;
      let mut max_class_id = 0usize;

      for class_id in 0..self.num_classes {
        let score = output[[0, 4 + class_id, i]];
        if score > max_score {
          max_score = score;
          max_class_id = class_id;
        }
      }

      if max_score < self.confidence_threshold {
        continue;
      }

      // 解码边界框：中心点坐标转为左上角坐标，并缩放到原始图像尺寸
      let cx = output[[0, 0, i]];
      let cy = output[[0, 1, i]];
      let w = output[[0, 2, i]];
      let h = output[[0, 3, i]];

      detections.push(Detection {
        x: (cx - w / 2.0) * scale_x,
        y: (cy - h / 2.0) * scale_y,
        width: w * scale_x,
        height: h * scale_y,
        confidence: max_score,
        class_id: max_class_id,
      });
    }

    Ok(non_max_suppression(detections, self.nms_threshold))
  }
}

fn build_session(model_path: &str) -> ort::Result<Session> {
  let _ = ort::init().commit();

  Session::builder()?
    .with_optimization_level(GraphOptimizationLevel::Level3)?
    .with_intra_threads(4)?
    .commit_from_file(model_path)
}

impl Detector for YoloDetector {
  fn detect(&mut self, image: &RgbImage) -> Result<Vec<Detection>, DetectError> {
    let original_width = image.width() as f32;
    let original_height = image.height() as f32;

    debug!("预处理图像: {}x{}", image.width(), image.height());
    let input = self.preprocess(image);

    debug!("执行模型推理");
    let output = self
      .run_inference(&input)
      .map_err(|e| DetectError::Inference(e.to_string()))?;

    let detections = self.postprocess(&output, original_width, original_height)?;
    debug!("检测到 {} 个物体", detections.len());

    Ok(detections)
  }

  fn labels(&self) -> &[&'static str] {
    &COCO_CLASSES
  }
}

/// 非极大值抑制
fn non_max_suppression(mut detections: Vec<Detection>, nms_threshold: f32) -> Vec<Detection> {
  // 按置信度降序排序
  detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

  let mut result = Vec::new();

  while !detections.is_empty() {
    let best = detections.remove(0);

    detections.retain(|det| {
      if det.class_id != best.class_id {
        return true;
      }
      iou(&best, det) < nms_threshold
    });

    result.push(best);
  }

  result
}

/// 计算两个边界框的 IoU
fn iou(a: &Detection, b: &Detection) -> f32 {
  let x1 = a.x.max(b.x);
  let y1 = a.y.max(b.y);
  let x2 = (a.x + a.width).min(b.x + b.width);
  let y2 = (a.y + a.height).min(b.y + b.height);

  let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
  let area_a = a.width * a.height;
  let area_b = b.width * b.height;
  let union = area_a + area_b - intersection;

  if union > 0.0 { intersection / union } else { 0.0 }
}
