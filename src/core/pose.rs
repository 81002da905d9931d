//! Robot pose representation and angle canonicalisation.

use super::point::WorldPoint;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Robot pose in world coordinates (x, y, theta)
///
/// Coordinate system: ROS REP-103
/// - X: Forward (positive ahead of robot)
/// - Y: Left (positive to robot's left)
/// - Theta: Rotation angle in radians, CCW positive from +X axis
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters
    pub x: f32,
    /// Y position in meters
    pub y: f32,
    /// Orientation in radians (CCW positive from +X)
    pub theta: f32,
}

impl Pose2D {
    /// Create a new pose
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self { x, y, theta }
    }

    /// Get the position as a WorldPoint
    #[inline]
    pub fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }

    /// Transform a point from robot frame to world frame
    #[inline]
    pub fn transform_point(&self, robot_point: WorldPoint) -> WorldPoint {
        let cos_t = self.theta.cos();
        let sin_t = self.theta.sin();

        WorldPoint::new(
            self.x + robot_point.x * cos_t - robot_point.y * sin_t,
            self.y + robot_point.x * sin_t + robot_point.y * cos_t,
        )
    }
}

/// Normalize angle to (-π, π]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle;
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_transform_point() {
        let pose = Pose2D::new(1.0, 2.0, FRAC_PI_2);
        let p = pose.transform_point(WorldPoint::new(1.0, 0.0));
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
        // -π maps to the canonical +π end of the interval
        assert!((normalize_angle(-PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(PI) - PI).abs() < 1e-6);
    }
}
