// src/data/feature_group.rs
use serde::Serialize;

use super::record::Feature;

/// A named pair of measurement columns analysed jointly as a 2-D problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureGroup {
    pub name: &'static str,
    pub features: [Feature; 2],
}

impl FeatureGroup {
    pub const fn new(name: &'static str, x: Feature, y: Feature) -> Self {
        Self {
            name,
            features: [x, y],
        }
    }

    pub fn x(&self) -> Feature {
        self.features[0]
    }

    pub fn y(&self) -> Feature {
        self.features[1]
    }
}

pub const RIGHT_HEMISPHERE: FeatureGroup =
    FeatureGroup::new("Right Hemisphere", Feature::RhOcc, Feature::RhTemp);

pub const LEFT_HEMISPHERE: FeatureGroup =
    FeatureGroup::new("Left Hemisphere", Feature::LhOcc, Feature::LhTemp);

/// Groups analysed by a run, in panel order.
pub const HEMISPHERE_GROUPS: [FeatureGroup; 2] = [RIGHT_HEMISPHERE, LEFT_HEMISPHERE];
