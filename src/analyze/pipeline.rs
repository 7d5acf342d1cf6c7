use crate::{
    analyze::ClassificationResult,
    image::ImagePreprocessor,
    models::TissueClassifier,
    utils::error::AnalyzeError,
    Result,
};
use std::time::Instant;

/// 分类处理流水线：预处理 → 前向推理 → 解码
pub struct AnalyzePipeline;

impl AnalyzePipeline {
    /// 处理一次上传的图像字节
    ///
    /// classifier为None表示模型启动时加载失败，该状态在进程
    /// 存活期间不变，所有分析请求都会得到模型不可用错误。
    pub fn process_bytes(
        bytes: &[u8],
        classifier: Option<&TissueClassifier>,
    ) -> Result<ClassificationResult> {
        let start_time = Instant::now();

        let preprocessor = ImagePreprocessor::default();
        let tensor = preprocessor.preprocess_bytes(bytes)?;

        let classifier = classifier.ok_or(AnalyzeError::ModelUnavailable)?;
        let scores = classifier.predict(tensor)?;

        let result = ClassificationResult::from_scores(&scores);

        tracing::debug!(
            "Analysis pipeline completed: classification={}, confidence={:.4}, time={:.3}s",
            result.classification,
            result.confidence,
            start_time.elapsed().as_secs_f32()
        );

        Ok(result)
    }
}
