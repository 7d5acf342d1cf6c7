pub mod classifier;

pub use classifier::{TissueClassifier, CLASS_LABELS, NUM_CLASSES};
