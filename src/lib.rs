pub mod analyze;
pub mod config;
pub mod image;
pub mod models;
pub mod utils;
pub mod web;

// 重新导出主要类型
pub use analyze::ClassificationResult;
pub use config::Config;
pub use utils::error::AnalyzeError;

pub type Result<T> = std::result::Result<T, AnalyzeError>;
