//! Per-view 2D point features grouped by describer type.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::IndexT;

/// Error returned when a describer type name cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown describer type: {0}")]
pub struct ParseDescriberTypeError(pub String);

/// Kind of descriptor a set of features was extracted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DescriberType {
    /// Sentinel for a describer that has not been chosen. Never valid as an argument.
    Uninitialized,
    /// SIFT
    Sift,
    /// SIFT with float descriptors
    SiftFloat,
    /// AKAZE
    Akaze,
    /// ORB
    Orb,
    /// Fiducial markers
    Marker,
}

impl DescriberType {
    /// Get the canonical name of the describer type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriberType::Uninitialized => "uninitialized",
            DescriberType::Sift => "sift",
            DescriberType::SiftFloat => "sift_float",
            DescriberType::Akaze => "akaze",
            DescriberType::Orb => "orb",
            DescriberType::Marker => "marker",
        }
    }
}

impl fmt::Display for DescriberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DescriberType {
    type Err = ParseDescriberTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uninitialized" => Ok(DescriberType::Uninitialized),
            "sift" => Ok(DescriberType::Sift),
            "sift_float" => Ok(DescriberType::SiftFloat),
            "akaze" => Ok(DescriberType::Akaze),
            "orb" => Ok(DescriberType::Orb),
            "marker" => Ok(DescriberType::Marker),
            _ => Err(ParseDescriberTypeError(s.to_string())),
        }
    }
}

/// A 2D point feature in pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointFeature {
    coords: Vec2,
}

impl PointFeature {
    /// Create a feature at `(x, y)`.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            coords: Vec2::new(x, y),
        }
    }

    /// Get the x coordinate.
    #[inline]
    pub fn x(&self) -> f32 {
        self.coords.x
    }

    /// Get the y coordinate.
    #[inline]
    pub fn y(&self) -> f32 {
        self.coords.y
    }

    /// Get the coordinates as a vector.
    #[inline]
    pub fn coords(&self) -> Vec2 {
        self.coords
    }
}

/// An indexable collection of point features.
pub type PointFeatures = Vec<PointFeature>;

/// Point features for every view, keyed by view id then describer type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturesPerView {
    data: BTreeMap<IndexT, BTreeMap<DescriberType, PointFeatures>>,
}

impl FeaturesPerView {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the features of a view for one describer type, replacing previous ones.
    pub fn add_features(
        &mut self,
        view_id: IndexT,
        desc_type: DescriberType,
        features: PointFeatures,
    ) {
        self.data
            .entry(view_id)
            .or_default()
            .insert(desc_type, features);
    }

    /// Get the features of a view for one describer type.
    pub fn features(&self, view_id: IndexT, desc_type: DescriberType) -> Option<&[PointFeature]> {
        self.data
            .get(&view_id)
            .and_then(|per_desc| per_desc.get(&desc_type))
            .map(Vec::as_slice)
    }

    /// Get every describer type's features for a view.
    pub fn features_per_desc(
        &self,
        view_id: IndexT,
    ) -> Option<&BTreeMap<DescriberType, PointFeatures>> {
        self.data.get(&view_id)
    }

    /// Iterate over the ids of the views holding features.
    pub fn view_ids(&self) -> impl Iterator<Item = IndexT> + '_ {
        self.data.keys().copied()
    }

    /// Number of views holding features.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if no view holds features.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
