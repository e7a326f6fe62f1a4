// src/data/mod.rs
pub mod dataset;
pub mod feature_group;
pub mod record;

pub use dataset::{Dataset, Partition, Split, TRAINING_LABELS};
pub use feature_group::{FeatureGroup, HEMISPHERE_GROUPS, LEFT_HEMISPHERE, RIGHT_HEMISPHERE};
pub use record::{DocLabel, Feature, Record};
