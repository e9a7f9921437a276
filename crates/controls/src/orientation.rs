use glam::{Mat3, Quat};

/// Yaw/pitch/roll decomposition of a rotation in YXZ order.
///
/// Yaw turns about the vertical axis, pitch about the lateral axis. Roll is
/// kept for completeness and is 0 for everything the look controls write.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Orientation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch,
            roll: 0.0,
        }
    }

    /// Decompose a unit quaternion. Near the poles the yaw absorbs the roll.
    pub fn from_quat(q: Quat) -> Self {
        let m = Mat3::from_quat(q);
        let m11 = m.x_axis.x;
        let m21 = m.x_axis.y;
        let m31 = m.x_axis.z;
        let m22 = m.y_axis.y;
        let m13 = m.z_axis.x;
        let m23 = m.z_axis.y;
        let m33 = m.z_axis.z;

        let pitch = (-m23.clamp(-1.0, 1.0)).asin();
        if m23.abs() < 0.999_999_9 {
            Self {
                yaw: m13.atan2(m33),
                pitch,
                roll: m21.atan2(m22),
            }
        } else {
            Self {
                yaw: (-m31).atan2(m11),
                pitch,
                roll: 0.0,
            }
        }
    }

    /// Compose yaw, then pitch, then roll.
    pub fn to_quat(self) -> Quat {
        Quat::from_rotation_y(self.yaw)
            * Quat::from_rotation_x(self.pitch)
            * Quat::from_rotation_z(self.roll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn identity_is_zero() {
        let o = Orientation::from_quat(Quat::IDENTITY);
        assert!(close(o.yaw, 0.0));
        assert!(close(o.pitch, 0.0));
        assert!(close(o.roll, 0.0));
    }

    #[test]
    fn recovers_yaw_and_pitch() {
        let o = Orientation::new(1.1, -0.4);
        let back = Orientation::from_quat(o.to_quat());
        assert!(close(back.yaw, 1.1));
        assert!(close(back.pitch, -0.4));
        assert!(close(back.roll, 0.0));
    }

    #[test]
    fn yaw_wraps_through_the_rotation() {
        let o = Orientation::new(std::f32::consts::TAU + 0.3, 0.0);
        let back = Orientation::from_quat(o.to_quat());
        assert!(close(back.yaw, 0.3));
    }

    #[test]
    fn pitch_up_looks_up() {
        let q = Orientation::new(0.0, 0.5).to_quat();
        let forward = q * Vec3::NEG_Z;
        assert!(forward.y > 0.0);
    }

    #[test]
    fn straight_up_is_stable() {
        let q = Orientation::new(0.7, FRAC_PI_2).to_quat();
        let o = Orientation::from_quat(q);
        assert!((o.pitch - FRAC_PI_2).abs() < 1e-3);
        assert!(o.yaw.is_finite());
        let forward = o.to_quat() * Vec3::NEG_Z;
        assert!(forward.y > 0.999);
    }
}
