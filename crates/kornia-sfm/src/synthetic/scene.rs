use glam::{DMat3, DVec3};

use crate::camera::{Intrinsic, IntrinsicModel};
use crate::dataset::{NViewDataset, NViewDatasetConfig};
use crate::pose::Pose3;
use crate::scene::{IndexT, Landmark, Observation, Rig, SfmData, View};

/// Id of the rig registered by [`convert_rig_scene`].
pub const RIG_ID: IndexT = 0;

const UNKNOWN_SCALE: f64 = 0.0;

/// How the dataset cameras are grouped into views and intrinsics.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RigStructure {
    /// Every dataset camera is one view; all views share a single intrinsic.
    #[default]
    Single,
    /// Every dataset camera is a rig frame holding one view per sub-pose.
    ///
    /// Sub-poses are relative to the frame pose, and each sub-pose gets its own intrinsic.
    Rig(Vec<Pose3>),
}

impl RigStructure {
    /// Two cameras side by side along x, `baseline` apart.
    pub fn stereo(baseline: f64) -> Self {
        let half = 0.5 * baseline;
        RigStructure::Rig(vec![
            Pose3::new(DMat3::IDENTITY, DVec3::new(-half, 0.0, 0.0)),
            Pose3::new(DMat3::IDENTITY, DVec3::new(half, 0.0, 0.0)),
        ])
    }

    /// Number of views created per dataset camera.
    pub fn views_per_frame(&self) -> usize {
        match self {
            RigStructure::Single => 1,
            RigStructure::Rig(sub_poses) => sub_poses.len(),
        }
    }
}

// Where the observations of one scene view come from.
struct ViewTarget {
    view_id: IndexT,
    frame: usize,
    // None: copy the dataset projection; Some: reproject through the view's own pose
    reprojection: Option<(Pose3, Intrinsic)>,
}

/// Translate a ground-truth dataset into a scene where every view shares one intrinsic.
///
/// Equivalent to [`convert_rig_scene`] with [`RigStructure::Single`].
pub fn convert_scene(
    dataset: &NViewDataset,
    config: &NViewDatasetConfig,
    model: IntrinsicModel,
) -> SfmData {
    convert_rig_scene(dataset, config, model, &RigStructure::Single)
}

/// Translate a ground-truth dataset into a scene, grouping cameras as `rig` describes.
///
/// Every intrinsic is created from `config` and `model`. A point yields an observation
/// in every view whose dataset camera sees it, and each view numbers its observations
/// `0, 1, 2, ...` in order of point index.
///
/// With [`RigStructure::Single`], view `i` uses pose `i`, intrinsic `0`, and the
/// projections recorded in the dataset. With [`RigStructure::Rig`], frame `f` and
/// sub-pose `s` give view `f * n + s` with intrinsic `s`; its observations are the
/// intrinsic's projection through the composed rig pose.
pub fn convert_rig_scene(
    dataset: &NViewDataset,
    config: &NViewDatasetConfig,
    model: IntrinsicModel,
    rig: &RigStructure,
) -> SfmData {
    let (width, height) = config.image_size();
    let intrinsic = Intrinsic::create(model, width, height, config.intrinsics());
    let mut sfm_data = SfmData::new();

    match rig {
        RigStructure::Single => {
            sfm_data.add_intrinsic(0, intrinsic);
            for (frame, pose) in dataset.poses().iter().enumerate() {
                let id = frame as IndexT;
                sfm_data.add_view(View::new(id, 0, id, width, height));
                sfm_data.set_pose(id, *pose);
            }
        }
        RigStructure::Rig(sub_poses) => {
            let n_sub = sub_poses.len() as IndexT;
            sfm_data.add_rig(RIG_ID, Rig::new(sub_poses.clone()));
            for sub_pose_id in 0..n_sub {
                sfm_data.add_intrinsic(sub_pose_id, intrinsic.clone());
            }
            for (frame, pose) in dataset.poses().iter().enumerate() {
                let frame_id = frame as IndexT;
                sfm_data.set_pose(frame_id, *pose);
                for sub_pose_id in 0..n_sub {
                    let view_id = frame_id * n_sub + sub_pose_id;
                    let view = View::new(view_id, sub_pose_id, frame_id, width, height)
                        .with_rig(RIG_ID, sub_pose_id);
                    sfm_data.add_view(view);
                }
            }
        }
    }

    let targets: Vec<ViewTarget> = sfm_data
        .views()
        .values()
        .map(|view| ViewTarget {
            view_id: view.view_id,
            frame: view.frame_id as usize,
            reprojection: if view.is_part_of_rig() {
                sfm_data.pose(view).zip(sfm_data.intrinsic_of(view).cloned())
            } else {
                None
            },
        })
        .collect();

    // next free feature slot of every target view
    let mut next_feat: Vec<IndexT> = vec![0; targets.len()];

    for (point_id, &point) in dataset.points().iter().enumerate() {
        let mut landmark = Landmark::new(point);
        for (target, id_feat) in targets.iter().zip(next_feat.iter_mut()) {
            let Some(recorded) = dataset.projection(target.frame, point_id) else {
                continue;
            };
            let x = match &target.reprojection {
                Some((pose, intrinsic)) => intrinsic.project(pose, point),
                None => recorded,
            };
            landmark
                .observations
                .insert(target.view_id, Observation::new(x, *id_feat, UNKNOWN_SCALE));
            *id_feat += 1;
        }
        if !landmark.observations.is_empty() {
            sfm_data.add_landmark(point_id as IndexT, landmark);
        }
    }

    log::debug!(
        "Converted dataset into {} views, {} intrinsics and {} landmarks",
        sfm_data.views().len(),
        sfm_data.intrinsics().len(),
        sfm_data.landmarks().len()
    );

    sfm_data
}
