//! Ray picking against stocked shelf slots.

use crate::layout::{ProductSlot, StorePlan};
use glam::Vec3;

/// Distance along `dir` to the box `[min, max]`, or `None` on a miss.
///
/// Origins inside the box report the exit distance.
pub fn ray_box(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-8;
    let inv = |d: f32| {
        if d.abs() < EPSILON {
            1.0 / EPSILON.copysign(d)
        } else {
            1.0 / d
        }
    };
    let inv_dir = Vec3::new(inv(dir.x), inv(dir.y), inv(dir.z));

    let t_min = (min - origin) * inv_dir;
    let t_max = (max - origin) * inv_dir;
    let near = t_min.min(t_max).max_element();
    let far = t_min.max(t_max).min_element();

    if near > far || far < 0.0 {
        None
    } else if near < 0.0 {
        Some(far)
    } else {
        Some(near)
    }
}

impl StorePlan {
    /// Nearest stocked slot hit by the ray, with its distance.
    pub fn pick(&self, origin: Vec3, dir: Vec3) -> Option<(&ProductSlot, f32)> {
        self.stocked()
            .filter_map(|slot| {
                let (min, max) = slot.bounds();
                ray_box(origin, dir, min, max).map(|t| (slot, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
