use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    /// 模型在启动时加载失败，进程存活期间不再重试
    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("Image processing failed: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Image processing failed: image too small ({width}x{height}), minimum {min}x{min}")]
    ImageTooSmall { width: u32, height: u32, min: u32 },

    #[error("File must be an image")]
    NotAnImage,

    #[error("Analysis failed: {0}")]
    Inference(String),

    #[error("Analysis failed: {0}")]
    Ort(#[from] ort::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0} bytes, max allowed: {1} bytes")]
    FileTooLarge(usize, usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AnalyzeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalyzeError::ImageDecode(_) => StatusCode::BAD_REQUEST,
            AnalyzeError::ImageTooSmall { .. } => StatusCode::BAD_REQUEST,
            AnalyzeError::NotAnImage => StatusCode::BAD_REQUEST,
            AnalyzeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AnalyzeError::FileTooLarge(_, _) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = serde_json::json!({
            "detail": self.to_string(),
        });

        tracing::error!("Request failed: {} ({})", self, status);

        (status, axum::Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(AnalyzeError::NotAnImage.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AnalyzeError::ImageTooSmall { width: 10, height: 10, min: 224 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AnalyzeError::InvalidInput("no file".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn server_errors_map_to_500() {
        assert_eq!(
            AnalyzeError::ModelUnavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AnalyzeError::Inference("bad output".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn detail_messages_match_api_contract() {
        assert_eq!(AnalyzeError::ModelUnavailable.to_string(), "Model not loaded");
        assert_eq!(AnalyzeError::NotAnImage.to_string(), "File must be an image");
        assert_eq!(
            AnalyzeError::Inference("forward pass failed".into()).to_string(),
            "Analysis failed: forward pass failed"
        );
    }
}
