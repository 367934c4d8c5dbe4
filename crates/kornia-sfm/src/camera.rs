//! Camera intrinsic models used to project synthetic landmarks.
use std::fmt;
use std::str::FromStr;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pose::Pose3;

/// Error returned when an intrinsic model name cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown intrinsic model: {0}")]
pub struct ParseIntrinsicModelError(pub String);

/// Tag selecting the projection function of an [`Intrinsic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntrinsicModel {
    /// Plain pinhole projection.
    Pinhole,
    /// Pinhole with a single radial coefficient.
    PinholeRadialK1,
    /// Pinhole with three radial coefficients.
    PinholeRadialK3,
    /// Pinhole with Brown-Conrady radial and tangential distortion.
    PinholeBrown,
}

impl IntrinsicModel {
    /// Get the canonical name of the model.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntrinsicModel::Pinhole => "pinhole",
            IntrinsicModel::PinholeRadialK1 => "radial1",
            IntrinsicModel::PinholeRadialK3 => "radial3",
            IntrinsicModel::PinholeBrown => "brown",
        }
    }
}

impl fmt::Display for IntrinsicModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntrinsicModel {
    type Err = ParseIntrinsicModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pinhole" => Ok(IntrinsicModel::Pinhole),
            "radial1" => Ok(IntrinsicModel::PinholeRadialK1),
            "radial3" => Ok(IntrinsicModel::PinholeRadialK3),
            "brown" => Ok(IntrinsicModel::PinholeBrown),
            _ => Err(ParseIntrinsicModelError(s.to_string())),
        }
    }
}

/// Represents the intrinsic parameters of a pinhole camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Focal length in x direction
    pub fx: f64,
    /// Focal length in y direction
    pub fy: f64,
    /// Principal point x coordinate
    pub cx: f64,
    /// Principal point y coordinate
    pub cy: f64,
}

impl CameraIntrinsics {
    /// Create camera intrinsics from focal lengths and principal point.
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Convert to 3x3 intrinsics matrix.
    pub fn to_matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.fx, 0.0, self.cx],
            [0.0, self.fy, self.cy],
            [0.0, 0.0, 1.0],
        ]
    }

    /// Map a normalized image point to pixel coordinates.
    #[inline]
    pub fn to_pixel(&self, normalized: DVec2) -> DVec2 {
        DVec2::new(
            self.fx * normalized.x + self.cx,
            self.fy * normalized.y + self.cy,
        )
    }
}

/// Polynomial lens distortion using the Brown-Conrady model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PolynomialDistortion {
    /// Radial distortion coefficients
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    /// Tangential distortion coefficients
    pub p1: f64,
    pub p2: f64,
}

impl PolynomialDistortion {
    /// Check if there is any distortion.
    pub fn has_distortion(&self) -> bool {
        self.k1 != 0.0 || self.k2 != 0.0 || self.k3 != 0.0 || self.p1 != 0.0 || self.p2 != 0.0
    }

    /// Apply the distortion to a normalized image point.
    pub fn distort(&self, p: DVec2) -> DVec2 {
        let r2 = p.length_squared();
        let r4 = r2 * r2;
        let r6 = r4 * r2;

        let kr = 1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6;

        let x_2 = 2.0 * p.x;
        let y_2 = 2.0 * p.y;
        let xy_2 = x_2 * p.y;
        DVec2::new(
            p.x * kr + xy_2 * self.p1 + self.p2 * (r2 + x_2 * p.x),
            p.y * kr + self.p1 * (r2 + y_2 * p.y) + xy_2 * self.p2,
        )
    }
}

/// A camera projection model instance shared by one or more views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intrinsic {
    model: IntrinsicModel,
    width: u32,
    height: u32,
    intrinsics: CameraIntrinsics,
    distortion: PolynomialDistortion,
}

impl Intrinsic {
    /// Instantiate the model selected by `model` with zero distortion.
    pub fn create(
        model: IntrinsicModel,
        width: u32,
        height: u32,
        intrinsics: CameraIntrinsics,
    ) -> Self {
        Self {
            model,
            width,
            height,
            intrinsics,
            distortion: PolynomialDistortion::default(),
        }
    }

    /// Replace the distortion coefficients.
    ///
    /// Coefficients the model does not carry are zeroed, e.g. `PinholeRadialK1` keeps only `k1`.
    pub fn with_distortion(mut self, distortion: PolynomialDistortion) -> Self {
        self.distortion = match self.model {
            IntrinsicModel::Pinhole => PolynomialDistortion::default(),
            IntrinsicModel::PinholeRadialK1 => PolynomialDistortion {
                k1: distortion.k1,
                ..Default::default()
            },
            IntrinsicModel::PinholeRadialK3 => PolynomialDistortion {
                p1: 0.0,
                p2: 0.0,
                ..distortion
            },
            IntrinsicModel::PinholeBrown => distortion,
        };
        self
    }

    /// Get the model tag.
    pub fn model(&self) -> IntrinsicModel {
        self.model
    }

    /// Get the image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pinhole parameters.
    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    /// Get the distortion coefficients.
    pub fn distortion(&self) -> &PolynomialDistortion {
        &self.distortion
    }

    /// Project a point already expressed in the camera frame.
    pub fn project_camera_point(&self, point: DVec3) -> DVec2 {
        let normalized = DVec2::new(point.x / point.z, point.y / point.z);
        let distorted = if self.distortion.has_distortion() {
            self.distortion.distort(normalized)
        } else {
            normalized
        };
        self.intrinsics.to_pixel(distorted)
    }

    /// Project a world point seen from `pose` into pixel coordinates.
    pub fn project(&self, pose: &Pose3, point: DVec3) -> DVec2 {
        self.project_camera_point(pose.transform(point))
    }

    /// Check whether a pixel lies inside the image bounds.
    pub fn is_inside(&self, pixel: DVec2) -> bool {
        pixel.x >= 0.0
            && pixel.y >= 0.0
            && pixel.x < self.width as f64
            && pixel.y < self.height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_intrinsics_to_matrix() {
        let intrinsics = CameraIntrinsics::new(1000.0, 900.0, 500.0, 400.0);
        let k = intrinsics.to_matrix();
        assert_eq!(k[0][0], 1000.0);
        assert_eq!(k[1][1], 900.0);
        assert_eq!(k[0][2], 500.0);
        assert_eq!(k[1][2], 400.0);
        assert_eq!(k[2][2], 1.0);
    }

    #[test]
    fn test_project_pinhole() {
        let cam = Intrinsic::create(
            IntrinsicModel::Pinhole,
            1000,
            1000,
            CameraIntrinsics::new(1000.0, 1000.0, 500.0, 500.0),
        );
        let px = cam.project(&Pose3::identity(), DVec3::new(0.1, -0.2, 2.0));
        assert_relative_eq!(px.x, 550.0, epsilon = 1e-9);
        assert_relative_eq!(px.y, 400.0, epsilon = 1e-9);
        assert!(cam.is_inside(px));
        assert!(!cam.is_inside(DVec2::new(1000.0, 10.0)));
    }

    #[test]
    fn test_created_model_has_no_distortion() {
        for model in [
            IntrinsicModel::Pinhole,
            IntrinsicModel::PinholeRadialK1,
            IntrinsicModel::PinholeRadialK3,
            IntrinsicModel::PinholeBrown,
        ] {
            let cam = Intrinsic::create(model, 640, 480, CameraIntrinsics::new(1.0, 1.0, 0.0, 0.0));
            assert!(!cam.distortion().has_distortion());
        }
    }

    #[test]
    fn test_radial_k1_keeps_only_k1() {
        let distortion = PolynomialDistortion {
            k1: 0.1,
            k2: 0.01,
            k3: 0.001,
            p1: 0.02,
            p2: 0.03,
        };
        let cam = Intrinsic::create(
            IntrinsicModel::PinholeRadialK1,
            640,
            480,
            CameraIntrinsics::new(500.0, 500.0, 320.0, 240.0),
        )
        .with_distortion(distortion);
        assert_eq!(cam.distortion().k1, 0.1);
        assert_eq!(cam.distortion().k2, 0.0);
        assert_eq!(cam.distortion().p1, 0.0);

        // r^2 = 0.04 at (0.2, 0) so the point moves out by a factor 1 + 0.1 * 0.04
        let px = cam.project_camera_point(DVec3::new(0.2, 0.0, 1.0));
        assert_relative_eq!(px.x, 320.0 + 500.0 * 0.2 * 1.004, epsilon = 1e-9);
        assert_relative_eq!(px.y, 240.0, epsilon = 1e-9);
    }

    #[test]
    fn test_model_from_str() {
        assert_eq!("Radial3".parse::<IntrinsicModel>(), Ok(IntrinsicModel::PinholeRadialK3));
        assert_eq!(IntrinsicModel::PinholeBrown.to_string(), "brown");
        assert!("fisheye".parse::<IntrinsicModel>().is_err());
    }
}
