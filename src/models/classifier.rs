use crate::utils::error::AnalyzeError;
use crate::{Config, Result};
use ndarray::Array4;
use ort::{
    inputs,
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use parking_lot::Mutex;

/// 类别标签，与模型输出的索引一一对应。
/// 顺序是与训练产物的固定契约，严禁重排或去重。
pub const CLASS_LABELS: [&str; 3] = ["High", "Low", "Stroma"];

pub const NUM_CLASSES: usize = CLASS_LABELS.len();

/// 组织切片分类器
///
/// 持有进程级唯一的ONNX会话。会话在启动时加载一次，
/// 之后只读；并发请求的前向推理通过互斥锁串行执行。
pub struct TissueClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl TissueClassifier {
    pub fn new(config: &Config) -> Result<Self> {
        let model_path = config.model_path();

        if !model_path.exists() {
            return Err(AnalyzeError::ModelLoad(format!(
                "Classification model not found: {}",
                model_path.display()
            )));
        }

        tracing::info!("Loading classification model from: {}", model_path.display());

        let session = Session::builder()
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.with_intra_threads(config.onnx_config.intra_threads))
            .and_then(|builder| builder.commit_from_file(&model_path))
            .map_err(|e| AnalyzeError::ModelLoad(e.to_string()))?;

        // 动态发现输入输出名称，避免硬编码导出时的张量命名
        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| AnalyzeError::ModelLoad("Model has no inputs".to_string()))?;

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| AnalyzeError::ModelLoad("Model has no outputs".to_string()))?;

        tracing::info!(
            "Classification model loaded: input='{}', output='{}'",
            input_name,
            output_name
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    /// 执行一次前向推理，返回与CLASS_LABELS对齐的原始得分向量
    pub fn predict(&self, tensor: Array4<f32>) -> Result<Vec<f32>> {
        let input_tensor = Tensor::from_array(tensor)?;

        let predictions = {
            let mut session = self.session.lock();
            let outputs = session.run(inputs![self.input_name.as_str() => input_tensor])?;

            match outputs.get(&self.output_name) {
                Some(output) => output.try_extract_array::<f32>()?.into_owned(),
                None => {
                    let available: Vec<String> =
                        outputs.keys().map(|name| name.to_string()).collect();
                    return Err(AnalyzeError::Inference(format!(
                        "Model output '{}' not found, available outputs: {:?}",
                        self.output_name, available
                    )));
                }
            }
        };

        // 期望形状为 (1, 3)
        let shape = predictions.shape().to_vec();
        if shape != [1, NUM_CLASSES] {
            return Err(AnalyzeError::Inference(format!(
                "Unexpected prediction shape {:?}, expected [1, {}]",
                shape, NUM_CLASSES
            )));
        }

        Ok(predictions.iter().copied().collect())
    }
}
