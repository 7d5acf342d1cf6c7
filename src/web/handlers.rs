use crate::{
    analyze::{AnalyzePipeline, ClassificationResult},
    utils::error::AnalyzeError,
    web::AppState,
    Result,
};
use axum::{
    extract::{Multipart, State},
    response::Json,
};
use std::time::Instant;

/// Multipart图像上传分析处理器
pub async fn analyze_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClassificationResult>> {
    let start_time = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!("Processing analyze request: request_id={}", request_id);

    let mut image_data: Option<axum::body::Bytes> = None;

    // 解析multipart数据
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AnalyzeError::InvalidInput(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or("unknown").to_string();

        match field_name.as_str() {
            "file" => {
                // 验证内容类型
                match field.content_type() {
                    Some(content_type) if content_type.starts_with("image/") => {}
                    _ => return Err(AnalyzeError::NotAnImage),
                }

                // 读取文件数据
                let data = field.bytes().await.map_err(|e| {
                    AnalyzeError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;

                tracing::debug!("Received file: {} bytes", data.len());
                image_data = Some(data);
            }
            _ => {
                tracing::debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    // 验证必需的图像数据
    let image_data = image_data
        .ok_or_else(|| AnalyzeError::InvalidInput("No image file provided".to_string()))?;

    // 执行分析流水线
    let result = AnalyzePipeline::process_bytes(&image_data, state.classifier.as_deref())?;

    tracing::info!(
        "Analyze completed: request_id={}, classification={}, confidence={:.4}, time={:.3}s",
        request_id,
        result.classification,
        result.confidence,
        start_time.elapsed().as_secs_f32()
    );

    Ok(Json(result))
}
