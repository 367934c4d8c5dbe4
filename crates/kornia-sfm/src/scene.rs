//! Scene description: views, intrinsics, poses, rigs and landmarks.
use std::collections::BTreeMap;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::camera::Intrinsic;
use crate::pose::Pose3;

/// Index type used for views, poses, intrinsics, landmarks and features.
pub type IndexT = u32;

/// One camera instance of the scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    /// Unique view id.
    pub view_id: IndexT,
    /// Id of the intrinsic used by this view.
    pub intrinsic_id: IndexT,
    /// Id of the pose of this view, or of its rig frame.
    pub pose_id: IndexT,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Rig the view belongs to, if any.
    pub rig_id: Option<IndexT>,
    /// Sub-pose of the rig used by this view, if any.
    pub sub_pose_id: Option<IndexT>,
    /// Frame id shared by every view captured at the same instant.
    pub frame_id: IndexT,
}

impl View {
    /// Create a view with an independent pose.
    pub fn new(
        view_id: IndexT,
        intrinsic_id: IndexT,
        pose_id: IndexT,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            view_id,
            intrinsic_id,
            pose_id,
            width,
            height,
            rig_id: None,
            sub_pose_id: None,
            frame_id: pose_id,
        }
    }

    /// Attach the view to a rig sub-pose.
    pub fn with_rig(mut self, rig_id: IndexT, sub_pose_id: IndexT) -> Self {
        self.rig_id = Some(rig_id);
        self.sub_pose_id = Some(sub_pose_id);
        self
    }

    /// Check whether the view pose is defined through a rig.
    pub fn is_part_of_rig(&self) -> bool {
        self.rig_id.is_some()
    }
}

/// A rig of cameras rigidly mounted together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rig {
    sub_poses: Vec<Pose3>,
}

impl Rig {
    /// Create a rig from the pose of each sub-camera relative to the rig frame.
    pub fn new(sub_poses: Vec<Pose3>) -> Self {
        Self { sub_poses }
    }

    /// Number of cameras in the rig.
    pub fn num_sub_poses(&self) -> usize {
        self.sub_poses.len()
    }

    /// Get the pose of a sub-camera relative to the rig frame.
    pub fn sub_pose(&self, sub_pose_id: IndexT) -> Option<&Pose3> {
        self.sub_poses.get(sub_pose_id as usize)
    }
}

/// A 2D observation of a landmark in one view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Position in pixels.
    pub x: DVec2,
    /// Feature slot of the observation in its view.
    pub id_feat: IndexT,
    /// Feature scale, 0 when unknown.
    pub scale: f64,
}

impl Observation {
    /// Create a new observation.
    pub fn new(x: DVec2, id_feat: IndexT, scale: f64) -> Self {
        Self { x, id_feat, scale }
    }
}

/// A 3D point and the views observing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Position in world coordinates.
    pub x: DVec3,
    /// Observations keyed by view id.
    pub observations: BTreeMap<IndexT, Observation>,
}

impl Landmark {
    /// Create a landmark without observations.
    pub fn new(x: DVec3) -> Self {
        Self {
            x,
            observations: BTreeMap::new(),
        }
    }
}

/// Container for a structure-from-motion scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SfmData {
    views: BTreeMap<IndexT, View>,
    poses: BTreeMap<IndexT, Pose3>,
    intrinsics: BTreeMap<IndexT, Intrinsic>,
    landmarks: BTreeMap<IndexT, Landmark>,
    rigs: BTreeMap<IndexT, Rig>,
}

impl SfmData {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the views keyed by view id.
    pub fn views(&self) -> &BTreeMap<IndexT, View> {
        &self.views
    }

    /// Get the poses keyed by pose id.
    pub fn poses(&self) -> &BTreeMap<IndexT, Pose3> {
        &self.poses
    }

    /// Get the intrinsics keyed by intrinsic id.
    pub fn intrinsics(&self) -> &BTreeMap<IndexT, Intrinsic> {
        &self.intrinsics
    }

    /// Get the landmarks keyed by landmark id.
    pub fn landmarks(&self) -> &BTreeMap<IndexT, Landmark> {
        &self.landmarks
    }

    /// Get the rigs keyed by rig id.
    pub fn rigs(&self) -> &BTreeMap<IndexT, Rig> {
        &self.rigs
    }

    /// Insert a view, replacing any view with the same id.
    pub fn add_view(&mut self, view: View) {
        self.views.insert(view.view_id, view);
    }

    /// Set the absolute pose for a pose id.
    pub fn set_pose(&mut self, pose_id: IndexT, pose: Pose3) {
        self.poses.insert(pose_id, pose);
    }

    /// Insert an intrinsic.
    pub fn add_intrinsic(&mut self, intrinsic_id: IndexT, intrinsic: Intrinsic) {
        self.intrinsics.insert(intrinsic_id, intrinsic);
    }

    /// Insert a landmark.
    pub fn add_landmark(&mut self, landmark_id: IndexT, landmark: Landmark) {
        self.landmarks.insert(landmark_id, landmark);
    }

    /// Insert a rig.
    pub fn add_rig(&mut self, rig_id: IndexT, rig: Rig) {
        self.rigs.insert(rig_id, rig);
    }

    /// Get a view by id.
    pub fn view(&self, view_id: IndexT) -> Option<&View> {
        self.views.get(&view_id)
    }

    /// Get the intrinsic used by a view.
    pub fn intrinsic_of(&self, view: &View) -> Option<&Intrinsic> {
        self.intrinsics.get(&view.intrinsic_id)
    }

    /// Get the world-to-camera pose of a view.
    ///
    /// For rig views the rig sub-pose is composed with the frame pose.
    pub fn pose(&self, view: &View) -> Option<Pose3> {
        let frame_pose = self.poses.get(&view.pose_id)?;
        match (view.rig_id, view.sub_pose_id) {
            (Some(rig_id), Some(sub_pose_id)) => {
                let sub_pose = self.rigs.get(&rig_id)?.sub_pose(sub_pose_id)?;
                Some(sub_pose.compose(frame_pose))
            }
            _ => Some(*frame_pose),
        }
    }

    /// Count the observations of every view, including views without any.
    pub fn observation_counts(&self) -> BTreeMap<IndexT, usize> {
        let mut counts: BTreeMap<IndexT, usize> = self.views.keys().map(|&id| (id, 0)).collect();
        for landmark in self.landmarks.values() {
            for view_id in landmark.observations.keys() {
                *counts.entry(*view_id).or_insert(0) += 1;
            }
        }
        counts
    }
}
