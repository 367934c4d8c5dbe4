use crate::features::DescriberType;
use crate::matches::{IndMatch, PairwiseMatches};
use crate::scene::SfmData;

/// Create matches between every pair of views observing the same landmark.
///
/// A landmark seen in views `a` and `b` contributes one [`IndMatch`] joining its
/// `id_feat` in `a` to its `id_feat` in `b`. The order of matches inside a pair is unspecified.
pub fn generate_synthetic_matches(
    out: &mut PairwiseMatches,
    sfm_data: &SfmData,
    desc_type: DescriberType,
) {
    for landmark in sfm_data.landmarks().values() {
        for (n, (&view_i, obs_i)) in landmark.observations.iter().enumerate() {
            for (&view_j, obs_j) in landmark.observations.iter().skip(n + 1) {
                out.add_match(
                    view_i,
                    view_j,
                    desc_type,
                    IndMatch::new(obs_i.id_feat, obs_j.id_feat),
                );
            }
        }
    }

    log::debug!(
        "Generated {} {desc_type} matches over {} view pairs",
        out.num_matches(),
        out.len()
    );
}

/// Create the matches of a synthetic scene in a new container.
///
/// See [`generate_synthetic_matches`].
pub fn synthesize_matches(sfm_data: &SfmData, desc_type: DescriberType) -> PairwiseMatches {
    let mut out = PairwiseMatches::new();
    generate_synthetic_matches(&mut out, sfm_data, desc_type);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::camera::IntrinsicModel;
    use crate::dataset::{NViewDataset, NViewDatasetConfig};
    use crate::scene::IndexT;
    use crate::synthetic::convert_scene;

    #[test]
    fn test_matches_are_shared_landmarks() {
        let config = NViewDatasetConfig::default();
        let dataset = NViewDataset::ring(5, 40, &config);
        let sfm_data = convert_scene(&dataset, &config, IntrinsicModel::Pinhole);
        let pm = synthesize_matches(&sfm_data, DescriberType::Sift);
        assert!(!pm.is_empty());

        for (&(a, b), per_desc) in pm.iter() {
            assert!(a < b);
            assert_eq!(per_desc.keys().collect::<Vec<_>>(), vec![&DescriberType::Sift]);

            let expected: BTreeSet<IndMatch> = sfm_data
                .landmarks()
                .values()
                .filter_map(|l| {
                    let oa = l.observations.get(&a)?;
                    let ob = l.observations.get(&b)?;
                    Some(IndMatch::new(oa.id_feat, ob.id_feat))
                })
                .collect();
            let got: BTreeSet<IndMatch> = pm
                .matches(a, b, DescriberType::Sift)
                .into_iter()
                .collect();
            assert_eq!(got, expected);
            assert_eq!(per_desc[&DescriberType::Sift].len(), expected.len());
        }

        // every co-observing pair has an entry
        for landmark in sfm_data.landmarks().values() {
            let views: Vec<IndexT> = landmark.observations.keys().copied().collect();
            for (n, a) in views.iter().enumerate() {
                for b in &views[n + 1..] {
                    assert!(pm.get(&(*a, *b)).is_some());
                }
            }
        }
    }

    #[test]
    fn test_single_view_landmark_has_no_match() {
        use crate::scene::{Landmark, Observation};
        use glam::{DVec2, DVec3};

        let mut sfm_data = SfmData::new();
        let mut landmark = Landmark::new(DVec3::ZERO);
        landmark
            .observations
            .insert(3, Observation::new(DVec2::ZERO, 0, 0.0));
        sfm_data.add_landmark(0, landmark);

        let pm = synthesize_matches(&sfm_data, DescriberType::Sift);
        assert!(pm.is_empty());
    }
}
