use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

/// A rigid world-to-camera transform stored as rotation and camera center.
///
/// A world point `X` maps to camera coordinates as `R (X - C)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose3 {
    rotation: DMat3,
    center: DVec3,
}

impl Pose3 {
    /// Create a pose from a world-to-camera rotation and the camera center in world coordinates.
    pub fn new(rotation: DMat3, center: DVec3) -> Self {
        Self { rotation, center }
    }

    /// The identity pose: camera at the origin looking down +Z.
    pub fn identity() -> Self {
        Self::new(DMat3::IDENTITY, DVec3::ZERO)
    }

    /// Build a rotation whose optical axis (+Z) points along `direction`.
    ///
    /// The rows of the returned matrix are the camera axes expressed in world coordinates.
    pub fn look_at(direction: DVec3, up: DVec3) -> DMat3 {
        let zc = direction.normalize();
        let xc = up.cross(zc).normalize();
        let yc = zc.cross(xc);
        DMat3::from_cols(xc, yc, zc).transpose()
    }

    /// Get the world-to-camera rotation.
    #[inline]
    pub fn rotation(&self) -> DMat3 {
        self.rotation
    }

    /// Get the camera center in world coordinates.
    #[inline]
    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Get the translation `t = -R C` of the equivalent `[R | t]` form.
    pub fn translation(&self) -> DVec3 {
        -(self.rotation * self.center)
    }

    /// Transform a world point into the camera frame.
    #[inline]
    pub fn transform(&self, point: DVec3) -> DVec3 {
        self.rotation * (point - self.center)
    }

    /// Compose two poses so that `a.compose(&b).transform(x) == a.transform(b.transform(x))`.
    pub fn compose(&self, other: &Pose3) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
            center: other.center + other.rotation.transpose() * self.center,
        }
    }

    /// Return the inverse transform.
    pub fn inverse(&self) -> Self {
        Self {
            rotation: self.rotation.transpose(),
            center: self.translation(),
        }
    }
}

impl Default for Pose3 {
    fn default() -> Self {
        Self::identity()
    }
}
