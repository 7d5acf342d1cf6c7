use crate::models::CLASS_LABELS;
use serde::Serialize;
use std::collections::BTreeMap;

/// 单次分类的完整结果
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    /// 预测类别
    pub classification: String,
    /// 预测类别对应的原始得分（不做重新归一化）
    pub confidence: f32,
    /// 详细结果
    pub details: ClassificationDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassificationDetails {
    /// 每个类别的得分
    // BTreeMap按键字典序输出，恰与CLASS_LABELS顺序一致
    pub class_probabilities: BTreeMap<&'static str, f32>,
    /// 人类可读的摘要
    pub message: String,
}

impl ClassificationResult {
    /// 将模型输出的得分向量解码为带标签的分类结果
    ///
    /// argmax平局时取先出现的索引，保证确定性。
    pub fn from_scores(scores: &[f32]) -> Self {
        debug_assert_eq!(scores.len(), CLASS_LABELS.len());

        let mut best_idx = 0;
        for (idx, &score) in scores.iter().enumerate() {
            if score > scores[best_idx] {
                best_idx = idx;
            }
        }

        let classification = CLASS_LABELS[best_idx].to_string();
        let confidence = scores[best_idx];

        let class_probabilities: BTreeMap<&'static str, f32> = CLASS_LABELS
            .iter()
            .zip(scores.iter())
            .map(|(&label, &score)| (label, score))
            .collect();

        let message = format!(
            "Image classified as {} with {:.2}% confidence",
            classification,
            confidence * 100.0
        );

        Self {
            classification,
            confidence,
            details: ClassificationDetails {
                class_probabilities,
                message,
            },
        }
    }
}
