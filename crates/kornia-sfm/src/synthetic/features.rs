use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::noise::NoiseGenerator;
use super::SyntheticError;
use crate::features::{DescriberType, FeaturesPerView, PointFeature, PointFeatures};
use crate::scene::{IndexT, SfmData};

/// Seed of the random source created by [`generate_synthetic_features`] on every call.
pub const DEFAULT_NOISE_SEED: u64 = 0;

/// Create features from the observations of a synthetic scene.
///
/// Each call drives `noise` with a fresh [`StdRng`] seeded with [`DEFAULT_NOISE_SEED`].
/// Use [`generate_synthetic_features_with_rng`] to control the random source.
pub fn generate_synthetic_features<N: NoiseGenerator>(
    out: &mut FeaturesPerView,
    desc_type: DescriberType,
    sfm_data: &SfmData,
    noise: &mut N,
) -> Result<(), SyntheticError> {
    let mut rng = StdRng::seed_from_u64(DEFAULT_NOISE_SEED);
    generate_synthetic_features_with_rng(out, desc_type, sfm_data, noise, &mut rng)
}

/// Create features from the observations of a synthetic scene using the given random source.
///
/// For every view of the scene, `out` receives a collection of `1 + max(id_feat)` features
/// under `desc_type`, or an empty one when the view has no observation. The feature at slot
/// `id_feat` is the observation position plus one noise sample per coordinate. Slots no
/// observation refers to stay at zero.
///
/// # Errors
///
/// Fails with [`SyntheticError::UninitializedDescriber`] when `desc_type` is
/// [`DescriberType::Uninitialized`]; `out` is left untouched.
pub fn generate_synthetic_features_with_rng<N: NoiseGenerator, R: Rng + ?Sized>(
    out: &mut FeaturesPerView,
    desc_type: DescriberType,
    sfm_data: &SfmData,
    noise: &mut N,
    rng: &mut R,
) -> Result<(), SyntheticError> {
    if desc_type == DescriberType::Uninitialized {
        return Err(SyntheticError::UninitializedDescriber);
    }

    // size every collection before the random access writes below
    let mut sizes: BTreeMap<IndexT, usize> =
        sfm_data.views().keys().map(|&view_id| (view_id, 0)).collect();
    for landmark in sfm_data.landmarks().values() {
        for (&view_id, obs) in &landmark.observations {
            let size = sizes.entry(view_id).or_insert(0);
            *size = (*size).max(obs.id_feat as usize + 1);
        }
    }
    let mut features_per_view: BTreeMap<IndexT, PointFeatures> = sizes
        .into_iter()
        .map(|(view_id, size)| (view_id, vec![PointFeature::default(); size]))
        .collect();

    for landmark in sfm_data.landmarks().values() {
        for (view_id, obs) in &landmark.observations {
            let x = obs.x.x + noise.sample(&mut *rng);
            let y = obs.x.y + noise.sample(&mut *rng);
            if let Some(slot) = features_per_view
                .get_mut(view_id)
                .and_then(|features| features.get_mut(obs.id_feat as usize))
            {
                *slot = PointFeature::new(x as f32, y as f32);
            }
        }
    }

    log::debug!(
        "Generated {desc_type} features for {} views",
        features_per_view.len()
    );

    for (view_id, features) in features_per_view {
        out.add_features(view_id, desc_type, features);
    }

    Ok(())
}

/// Create the features of a synthetic scene in a new container.
///
/// See [`generate_synthetic_features`].
pub fn synthesize_features<N: NoiseGenerator>(
    sfm_data: &SfmData,
    desc_type: DescriberType,
    noise: &mut N,
) -> Result<FeaturesPerView, SyntheticError> {
    let mut out = FeaturesPerView::new();
    generate_synthetic_features(&mut out, desc_type, sfm_data, noise)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::IntrinsicModel;
    use crate::dataset::{NViewDataset, NViewDatasetConfig};
    use crate::synthetic::{convert_scene, UniformNoise, ZeroNoise};

    fn ring_scene() -> SfmData {
        let config = NViewDatasetConfig::default();
        let dataset = NViewDataset::ring(5, 40, &config);
        convert_scene(&dataset, &config, IntrinsicModel::Pinhole)
    }

    #[test]
    fn test_zero_noise_matches_observations() -> Result<(), SyntheticError> {
        let sfm_data = ring_scene();
        let fpv = synthesize_features(&sfm_data, DescriberType::Sift, &mut ZeroNoise)?;

        let counts = sfm_data.observation_counts();
        for (view_id, count) in &counts {
            let features = fpv.features(*view_id, DescriberType::Sift).unwrap();
            assert_eq!(features.len(), *count);
        }
        for landmark in sfm_data.landmarks().values() {
            for (view_id, obs) in &landmark.observations {
                let f = fpv.features(*view_id, DescriberType::Sift).unwrap()[obs.id_feat as usize];
                assert_eq!(f, PointFeature::new(obs.x.x as f32, obs.x.y as f32));
            }
        }
        Ok(())
    }

    #[test]
    fn test_noise_is_bounded() -> Result<(), SyntheticError> {
        let sfm_data = ring_scene();
        let mut noise = UniformNoise::new(0.5);
        let fpv = synthesize_features(&sfm_data, DescriberType::Akaze, &mut noise)?;

        let mut moved = false;
        for landmark in sfm_data.landmarks().values() {
            for (view_id, obs) in &landmark.observations {
                let f = fpv.features(*view_id, DescriberType::Akaze).unwrap()[obs.id_feat as usize];
                let dx = (f.x() as f64 - obs.x.x).abs();
                let dy = (f.y() as f64 - obs.x.y).abs();
                assert!(dx <= 0.5 + 1e-3 && dy <= 0.5 + 1e-3);
                moved |= dx > 1e-3 || dy > 1e-3;
            }
        }
        assert!(moved);
        Ok(())
    }

    #[test]
    fn test_uninitialized_rejected_before_mutation() {
        let sfm_data = ring_scene();
        let mut out = FeaturesPerView::new();
        out.add_features(99, DescriberType::Orb, vec![PointFeature::new(1.0, 1.0)]);
        let before = out.clone();

        let res = generate_synthetic_features(
            &mut out,
            DescriberType::Uninitialized,
            &sfm_data,
            &mut ZeroNoise,
        );
        assert_eq!(res, Err(SyntheticError::UninitializedDescriber));
        assert_eq!(out, before);
    }

    #[test]
    fn test_sparse_ids_leave_default_slots() -> Result<(), SyntheticError> {
        use crate::scene::{Landmark, Observation, View};
        use glam::{DVec2, DVec3};

        let mut sfm_data = SfmData::new();
        sfm_data.add_view(View::new(0, 0, 0, 10, 10));
        sfm_data.add_view(View::new(1, 0, 1, 10, 10));
        let mut landmark = Landmark::new(DVec3::ZERO);
        landmark
            .observations
            .insert(0, Observation::new(DVec2::new(3.0, 4.0), 2, 0.0));
        sfm_data.add_landmark(0, landmark);

        let fpv = synthesize_features(&sfm_data, DescriberType::Sift, &mut ZeroNoise)?;
        assert_eq!(
            fpv.features(0, DescriberType::Sift).unwrap(),
            &[
                PointFeature::default(),
                PointFeature::default(),
                PointFeature::new(3.0, 4.0)
            ]
        );
        assert_eq!(fpv.features(1, DescriberType::Sift).map(<[_]>::len), Some(0));
        Ok(())
    }

    #[test]
    fn test_caller_rng_reproducible() -> Result<(), SyntheticError> {
        let sfm_data = ring_scene();
        let mut noise = UniformNoise::new(2.0);

        let mut a = FeaturesPerView::new();
        let mut rng = StdRng::seed_from_u64(11);
        generate_synthetic_features_with_rng(
            &mut a,
            DescriberType::Sift,
            &sfm_data,
            &mut noise,
            &mut rng,
        )?;

        let mut b = FeaturesPerView::new();
        let mut rng = StdRng::seed_from_u64(11);
        generate_synthetic_features_with_rng(
            &mut b,
            DescriberType::Sift,
            &sfm_data,
            &mut noise,
            &mut rng,
        )?;
        assert_eq!(a, b);

        let mut c = FeaturesPerView::new();
        let mut rng = StdRng::seed_from_u64(12);
        generate_synthetic_features_with_rng(
            &mut c,
            DescriberType::Sift,
            &sfm_data,
            &mut noise,
            &mut rng,
        )?;
        assert_ne!(a, c);
        Ok(())
    }
}
