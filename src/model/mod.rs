// src/model/mod.rs
pub mod calibration;
pub mod pipeline;
pub mod scorer;
pub mod standardizer;
pub mod svm;

pub use calibration::PlattScaling;
pub use pipeline::{FittedPipeline, Pipeline};
pub use scorer::roc_auc;
pub use standardizer::Standardizer;
pub use svm::{LinearModel, MarginClassifier, MarginParams};
