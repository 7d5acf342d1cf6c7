pub mod pipeline;
pub mod types;

pub use pipeline::AnalyzePipeline;
pub use types::{ClassificationDetails, ClassificationResult};
