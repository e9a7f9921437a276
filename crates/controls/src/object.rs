use glam::{Mat4, Quat, Vec2, Vec3};
use std::cell::RefCell;
use std::rc::Rc;

/// A camera-like object the look controls steer.
///
/// The controls only read and write orientation and position; the object
/// itself belongs to the scene host.
pub trait ControlledObject {
    fn quaternion(&self) -> Quat;
    fn set_quaternion(&mut self, rotation: Quat);
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);

    /// World up. Movement assumes this is +Y.
    fn up(&self) -> Vec3 {
        Vec3::Y
    }

    /// Local +X axis in world space (first column of the rotation).
    fn right_axis(&self) -> Vec3 {
        self.quaternion() * Vec3::X
    }
}

impl<T: ControlledObject + ?Sized> ControlledObject for &mut T {
    fn quaternion(&self) -> Quat {
        (**self).quaternion()
    }

    fn set_quaternion(&mut self, rotation: Quat) {
        (**self).set_quaternion(rotation);
    }

    fn position(&self) -> Vec3 {
        (**self).position()
    }

    fn set_position(&mut self, position: Vec3) {
        (**self).set_position(position);
    }

    fn up(&self) -> Vec3 {
        (**self).up()
    }

    fn right_axis(&self) -> Vec3 {
        (**self).right_axis()
    }
}

/// Shared handle, for hosts that also read the camera while it is bound.
impl<T: ControlledObject> ControlledObject for Rc<RefCell<T>> {
    fn quaternion(&self) -> Quat {
        self.borrow().quaternion()
    }

    fn set_quaternion(&mut self, rotation: Quat) {
        self.borrow_mut().set_quaternion(rotation);
    }

    fn position(&self) -> Vec3 {
        self.borrow().position()
    }

    fn set_position(&mut self, position: Vec3) {
        self.borrow_mut().set_position(position);
    }

    fn up(&self) -> Vec3 {
        self.borrow().up()
    }

    fn right_axis(&self) -> Vec3 {
        self.borrow().right_axis()
    }
}

/// Perspective camera with a quaternion orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub rotation: Quat,
    pub up: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            // Eye level in front of the first aisle.
            position: Vec3::new(0.0, 12.0, 20.0),
            rotation: Quat::IDENTITY,
            up: Vec3::Y,
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl PerspectiveCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            aspect,
            ..Self::default()
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a point in normalized device coordinates.
    /// Returns `(origin, unit direction)`; the origin lies on the near plane.
    pub fn screen_ray(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        (near, (far - near).normalize())
    }
}

impl ControlledObject for PerspectiveCamera {
    fn quaternion(&self) -> Quat {
        self.rotation
    }

    fn set_quaternion(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn up(&self) -> Vec3 {
        self.up
    }
}

/// Convert a pixel position to normalized device coordinates (y up).
pub fn ndc_from_screen(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}
