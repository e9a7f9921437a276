use crate::object::ControlledObject;
use crate::pointer_lock::PointerLockControls;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use storewalk_input::MoveIntent;

/// Walking tuning: velocity damping, key acceleration, and the box the eye
/// is kept inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Fraction of velocity shed per second.
    pub damping: f32,
    /// Velocity gained per second while a key is held.
    pub acceleration: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Depth change per wheel unit.
    pub zoom_step: f32,
    pub min_zoom_z: f32,
    pub max_zoom_z: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            acceleration: 60.0,
            min_height: 3.0,
            max_height: 45.0,
            zoom_step: 0.05,
            min_zoom_z: 8.0,
            max_zoom_z: 60.0,
        }
    }
}

/// Damped first-person movement driven by a per-frame [`MoveIntent`].
///
/// Velocity is stored in the camera's frame: x is strafe, y vertical, z is
/// the forward axis with negative values meaning forward.
#[derive(Debug, Clone, Default)]
pub struct Locomotion {
    pub config: LocomotionConfig,
    velocity: Vec3,
}

impl Locomotion {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            velocity: Vec3::ZERO,
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn stop(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    /// Advance one frame of `dt` seconds. Does nothing while unlocked.
    pub fn update<C: ControlledObject>(
        &mut self,
        controls: &mut PointerLockControls<C>,
        intent: &MoveIntent,
        dt: f32,
    ) {
        if !controls.is_locked() {
            return;
        }
        let cfg = self.config;

        // Damping never overshoots past rest, whatever the frame time.
        self.velocity *= (1.0 - cfg.damping * dt).max(0.0);

        let [x, y, z] = intent.axes();
        let direction = Vec3::new(x, y, z).normalize_or_zero();
        if intent.forward || intent.backward {
            self.velocity.z -= direction.z * cfg.acceleration * dt;
        }
        if intent.left || intent.right {
            self.velocity.x -= direction.x * cfg.acceleration * dt;
        }
        if intent.up || intent.down {
            self.velocity.y -= direction.y * cfg.acceleration * dt;
        }

        controls.move_right(-self.velocity.x * dt);
        controls.move_forward(-self.velocity.z * dt);
        controls.move_up(-self.velocity.y * dt);

        let object = controls.object_mut();
        let mut position = object.position();
        position.y = position.y.max(cfg.min_height).min(cfg.max_height);
        object.set_position(position);
    }

    /// Dolly along world Z by a wheel delta, kept inside the zoom range.
    pub fn zoom<C: ControlledObject>(&self, controls: &mut PointerLockControls<C>, delta_y: f32) {
        let cfg = self.config;
        let object = controls.object_mut();
        let mut position = object.position();
        position.z += delta_y * cfg.zoom_step;
        position.z = position.z.max(cfg.min_zoom_z).min(cfg.max_zoom_z);
        object.set_position(position);
    }
}
