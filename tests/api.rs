//! Integration tests: HTTP API surface
//!
//! The model artifact is not available in CI, so these tests exercise the
//! degraded-state contract (model failed to load at startup) plus every
//! request-validation path that runs before inference.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use cell_classifier::{config::Config, web::AppState};
use image::{DynamicImage, Rgb, RgbImage};
use std::io::Cursor;
use tower::ServiceExt;

const BOUNDARY: &str = "cell-classifier-test-boundary";

fn test_app() -> axum::Router {
    // 模型目录不存在：启动即进入降级状态
    let config = Config::new(
        "127.0.0.1:0".to_string(),
        "/nonexistent/models".to_string(),
        false,
    )
    .unwrap();
    let state = AppState::new(config);
    assert!(state.classifier.is_none());
    cell_classifier::web::create_app(state)
}

fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn multipart_request(field_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; \
             filename=\"cell.png\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_degraded_model_state() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], false);
    assert_eq!(
        json["available_classes"],
        serde_json::json!(["High", "Low", "Stroma"])
    );
}

#[tokio::test]
async fn non_image_content_type_is_rejected() {
    let app = test_app();
    let response = app
        .oneshot(multipart_request("file", "text/plain", b"hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["detail"], "File must be an image");
}

#[tokio::test]
async fn malformed_image_bytes_fail_preprocessing() {
    let app = test_app();
    let response = app
        .oneshot(multipart_request("file", "image/png", b"not a real png"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("Image processing failed:"), "{detail}");
}

#[tokio::test]
async fn undersized_image_fails_preprocessing() {
    let app = test_app();
    let response = app
        .oneshot(multipart_request(
            "file",
            "image/png",
            &png_bytes(64, 64, [255; 3]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.contains("too small"), "{detail}");
}

#[tokio::test]
async fn valid_upload_without_model_returns_model_not_loaded() {
    let app = test_app();
    let response = app
        .oneshot(multipart_request(
            "file",
            "image/png",
            &png_bytes(300, 300, [255; 3]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["detail"], "Model not loaded");
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let app = test_app();
    let response = app
        .oneshot(multipart_request(
            "attachment",
            "image/png",
            &png_bytes(300, 300, [255; 3]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["detail"], "Invalid input: No image file provided");
}
