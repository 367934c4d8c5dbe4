#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kornia SfM
//!
//! Synthetic scenes for validating structure-from-motion pipelines without real images.
//!
//! A ground-truth [`NViewDataset`](dataset::NViewDataset) is converted into a scene
//! description ([`SfmData`](scene::SfmData)), from which per-view features and pairwise
//! matches are derived. Features and matches share the `id_feat` slots recorded in the
//! scene observations, so a match always points at the features of one landmark.
//!
//! ## Example
//!
//! ```rust
//! use kornia_sfm::camera::IntrinsicModel;
//! use kornia_sfm::dataset::{NViewDataset, NViewDatasetConfig};
//! use kornia_sfm::features::DescriberType;
//! use kornia_sfm::synthetic::{
//!     convert_scene, synthesize_features, synthesize_matches, UniformNoise,
//! };
//!
//! let config = NViewDatasetConfig::default();
//! let dataset = NViewDataset::ring(6, 64, &config);
//! let sfm_data = convert_scene(&dataset, &config, IntrinsicModel::Pinhole);
//!
//! let mut noise = UniformNoise::new(0.5);
//! let features = synthesize_features(&sfm_data, DescriberType::Sift, &mut noise)?;
//! let matches = synthesize_matches(&sfm_data, DescriberType::Sift);
//!
//! println!("{} views, {} view pairs", features.len(), matches.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Camera intrinsic models.
pub mod camera;

/// Ground-truth multi-view datasets.
pub mod dataset;

/// Per-view point features.
pub mod features;

/// Pairwise feature matches.
pub mod matches;

/// Rigid camera poses.
pub mod pose;

/// Scene description container.
pub mod scene;

/// Synthetic scene, feature and match generation.
pub mod synthetic;
