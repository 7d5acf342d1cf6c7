use crate::image::ImageLoader;
use crate::utils::error::AnalyzeError;
use crate::Result;
use image::{imageops::FilterType, DynamicImage, GenericImageView};
use ndarray::Array4;

/// 模型输入预处理器
///
/// 将任意编码、任意尺寸、任意色彩模式的输入图像转换为
/// 形状为 (1, H, W, 3)、取值范围 [0, 1] 的NHWC张量。
pub struct ImagePreprocessor {
    /// 目标尺寸 (宽, 高)
    target_size: (u32, u32),
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self {
            target_size: (224, 224),
        }
    }
}

impl ImagePreprocessor {
    pub fn new(target_size: (u32, u32)) -> Self {
        Self { target_size }
    }

    /// 从原始字节预处理（解码 + 标准化）
    pub fn preprocess_bytes(&self, bytes: &[u8]) -> Result<Array4<f32>> {
        let image = ImageLoader::from_bytes(bytes)?;
        self.preprocess_decoded(image)
    }

    /// 从已解码图像预处理
    pub fn preprocess_decoded(&self, image: DynamicImage) -> Result<Array4<f32>> {
        let (width, height) = image.dimensions();
        let (target_w, target_h) = self.target_size;

        // 小于目标边长的输入直接拒绝，不做上采样
        let min_side = target_w.min(target_h);
        if width < min_side || height < min_side {
            return Err(AnalyzeError::ImageTooSmall {
                width,
                height,
                min: min_side,
            });
        }

        // 转换为RGB：丢弃alpha通道，灰度图按标准luma约定复制到三个通道
        let rgb = image.to_rgb8();

        // 直接缩放到目标尺寸（有意拉伸非正方形图像，而不是中心裁剪）
        let resized = image::imageops::resize(&rgb, target_w, target_h, FilterType::CatmullRom);

        // 归一化到 [0, 1] 并添加batch维度
        let mut tensor = Array4::<f32>::zeros((1, target_h as usize, target_w as usize, 3));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                tensor[[0, y as usize, x as usize, c]] = pixel[c] as f32 / 255.0;
            }
        }

        Ok(tensor)
    }
}
