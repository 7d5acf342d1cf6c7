use crate::utils::error::AnalyzeError;
use crate::Result;
use image::DynamicImage;

/// 上传图像的最大字节数
const MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024;

pub struct ImageLoader;

impl ImageLoader {
    /// 从字节流加载图像
    pub fn from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
        // 检查文件大小
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AnalyzeError::FileTooLarge(bytes.len(), MAX_IMAGE_BYTES));
        }

        let image = image::load_from_memory(bytes).map_err(AnalyzeError::ImageDecode)?;

        Ok(image)
    }
}
