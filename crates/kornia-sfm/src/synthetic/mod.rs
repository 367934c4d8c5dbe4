//! Synthetic scenes built from ground-truth datasets.
//!
//! [`convert_scene`] turns an [`NViewDataset`](crate::dataset::NViewDataset) into an
//! [`SfmData`](crate::scene::SfmData); [`generate_synthetic_features`] and
//! [`generate_synthetic_matches`] then derive features and matches from it, both
//! addressed by the `id_feat` of the scene observations.

mod features;
mod matches;
mod noise;
mod scene;

pub use features::{
    generate_synthetic_features, generate_synthetic_features_with_rng, synthesize_features,
    DEFAULT_NOISE_SEED,
};
pub use matches::{generate_synthetic_matches, synthesize_matches};
pub use noise::{DistributionNoise, NoiseGenerator, UniformNoise, ZeroNoise};
pub use scene::{convert_rig_scene, convert_scene, RigStructure, RIG_ID};

/// Errors returned by the synthetic generators.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The describer type argument is the uninitialized sentinel.
    #[error("Describer type must not be uninitialized")]
    UninitializedDescriber,
}
