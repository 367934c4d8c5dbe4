//! Ground-truth multi-view datasets: camera poses, 3D points and their projections.
use glam::{DVec2, DVec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CameraIntrinsics;
use crate::pose::Pose3;

/// Errors returned when assembling a dataset from parts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    /// The number of projection lists does not match the number of views.
    #[error("Expected projections for {expected} views, got {actual}")]
    ViewCountMismatch {
        /// Number of poses
        expected: usize,
        /// Number of projection lists
        actual: usize,
    },
    /// A view does not hold one projection slot per point.
    #[error("View {view} has {actual} projection slots but the dataset has {expected} points")]
    PointCountMismatch {
        /// Offending view index
        view: usize,
        /// Number of points
        expected: usize,
        /// Number of projection slots
        actual: usize,
    },
}

/// Parameters of the synthetic camera setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NViewDatasetConfig {
    /// Focal length in x, in pixels.
    pub fx: f64,
    /// Focal length in y, in pixels.
    pub fy: f64,
    /// Principal point x; the image is `2 * cx` pixels wide.
    pub cx: f64,
    /// Principal point y; the image is `2 * cy` pixels high.
    pub cy: f64,
    /// Distance of the cameras to the origin.
    pub distance: f64,
    /// Magnitude of the random perturbation of each viewing direction.
    pub jitter_amount: f64,
    /// Points are drawn uniformly in `[-point_extent, point_extent]^3`.
    pub point_extent: f64,
    /// Optional RNG seed for deterministic runs.
    pub random_seed: Option<u64>,
}

impl Default for NViewDatasetConfig {
    fn default() -> Self {
        Self {
            fx: 1000.0,
            fy: 1000.0,
            cx: 500.0,
            cy: 500.0,
            distance: 1.5,
            jitter_amount: 0.01,
            point_extent: 0.6,
            random_seed: Some(0),
        }
    }
}

impl NViewDatasetConfig {
    /// Get the pinhole parameters shared by every camera.
    pub fn intrinsics(&self) -> CameraIntrinsics {
        CameraIntrinsics::new(self.fx, self.fy, self.cx, self.cy)
    }

    /// Get the image size `(width, height)` in pixels.
    pub fn image_size(&self) -> (u32, u32) {
        ((self.cx * 2.0) as u32, (self.cy * 2.0) as u32)
    }
}

/// Ground truth for a set of cameras observing a set of 3D points.
#[derive(Debug, Clone, PartialEq)]
pub struct NViewDataset {
    poses: Vec<Pose3>,
    intrinsics: CameraIntrinsics,
    points: Vec<DVec3>,
    // projections[view][point], None when the point is not visible in the view
    projections: Vec<Vec<Option<DVec2>>>,
}

impl NViewDataset {
    /// Assemble a dataset from hand-crafted ground truth.
    ///
    /// `projections[v][p]` is the pixel position of point `p` in view `v`, or `None`
    /// when the point is not visible there.
    pub fn from_parts(
        poses: Vec<Pose3>,
        intrinsics: CameraIntrinsics,
        points: Vec<DVec3>,
        projections: Vec<Vec<Option<DVec2>>>,
    ) -> Result<Self, DatasetError> {
        if projections.len() != poses.len() {
            return Err(DatasetError::ViewCountMismatch {
                expected: poses.len(),
                actual: projections.len(),
            });
        }
        if let Some((view, slots)) = projections
            .iter()
            .enumerate()
            .find(|(_, slots)| slots.len() != points.len())
        {
            return Err(DatasetError::PointCountMismatch {
                view,
                expected: points.len(),
                actual: slots.len(),
            });
        }
        Ok(Self {
            poses,
            intrinsics,
            points,
            projections,
        })
    }

    /// Generate cameras evenly spread on a circle around the origin, looking at it.
    ///
    /// The circle lies in the XZ plane with Y up.
    pub fn ring(nviews: usize, npoints: usize, config: &NViewDatasetConfig) -> Self {
        Self::generate(nviews, npoints, config, |theta| {
            DVec3::new(theta.sin(), 0.0, theta.cos())
        })
    }

    /// Generate cameras on a cardioid around the origin, looking at it.
    pub fn cardioid(nviews: usize, npoints: usize, config: &NViewDatasetConfig) -> Self {
        Self::generate(nviews, npoints, config, |theta| {
            DVec3::new(
                2.0 * theta.sin() - (2.0 * theta).sin(),
                0.0,
                2.0 * theta.cos() - (2.0 * theta).cos(),
            )
        })
    }

    fn generate(
        nviews: usize,
        npoints: usize,
        config: &NViewDatasetConfig,
        curve: impl Fn(f64) -> DVec3,
    ) -> Self {
        let mut rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => {
                let mut tr = rand::rng();
                StdRng::from_rng(&mut tr)
            }
        };

        let extent = config.point_extent;
        let points: Vec<DVec3> = (0..npoints)
            .map(|_| {
                DVec3::new(
                    rng.random_range(-extent..=extent),
                    rng.random_range(-extent..=extent),
                    rng.random_range(-extent..=extent),
                )
            })
            .collect();

        let poses: Vec<Pose3> = (0..nviews)
            .map(|i| {
                let theta = i as f64 * 2.0 * std::f64::consts::PI / nviews as f64;
                let center = curve(theta) * config.distance;
                let jitter = DVec3::new(
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                ) * (config.jitter_amount / center.length());
                let rotation = Pose3::look_at(-center + jitter, DVec3::Y);
                Pose3::new(rotation, center)
            })
            .collect();

        let intrinsics = config.intrinsics();
        let (width, height) = config.image_size();
        let projections = poses
            .iter()
            .map(|pose| {
                points
                    .iter()
                    .map(|&point| project_visible(pose, &intrinsics, width, height, point))
                    .collect()
            })
            .collect();

        log::debug!("Generated synthetic dataset with {nviews} views and {npoints} points");

        Self {
            poses,
            intrinsics,
            points,
            projections,
        }
    }

    /// Number of views.
    #[inline]
    pub fn num_views(&self) -> usize {
        self.poses.len()
    }

    /// Number of 3D points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Get the pose of every view.
    pub fn poses(&self) -> &[Pose3] {
        &self.poses
    }

    /// Get the pinhole parameters shared by every view.
    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    /// Get the 3D points.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Get the projection of `point` in `view`, or `None` if it is not visible there.
    pub fn projection(&self, view: usize, point: usize) -> Option<DVec2> {
        self.projections
            .get(view)
            .and_then(|slots| slots.get(point))
            .copied()
            .flatten()
    }

    /// Check whether `point` is visible in `view`.
    #[inline]
    pub fn is_visible(&self, view: usize, point: usize) -> bool {
        self.projection(view, point).is_some()
    }
}

// A point is visible when it lies in front of the camera and projects inside the image.
fn project_visible(
    pose: &Pose3,
    intrinsics: &CameraIntrinsics,
    width: u32,
    height: u32,
    point: DVec3,
) -> Option<DVec2> {
    let pc = pose.transform(point);
    if pc.z <= 0.0 {
        return None;
    }
    let pixel = intrinsics.to_pixel(DVec2::new(pc.x / pc.z, pc.y / pc.z));
    let inside = pixel.x >= 0.0
        && pixel.y >= 0.0
        && pixel.x < width as f64
        && pixel.y < height as f64;
    inside.then_some(pixel)
}
