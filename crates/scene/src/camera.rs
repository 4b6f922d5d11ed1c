use crate::input::HeldKeys;
use glam::{Mat4, Vec3};
use std::f32::consts::PI;

/// Orbit camera circling the origin at a fixed radius.
/// Angle and height are unbounded; the angle wraps through cos/sin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub angle: f32,
    pub height: f32,
    pub radius: f32,
    /// Radians per second while LEFT/RIGHT is held.
    pub turn_speed: f32,
    /// Units per second while UP/DOWN is held.
    pub climb_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            angle: 3.0 * PI / 2.0,
            height: 2.0,
            radius: 3.0,
            turn_speed: 0.5,
            climb_speed: 5.0,
        }
    }
}

impl OrbitCamera {
    /// Apply one frame of held-key input.
    pub fn update(&mut self, keys: HeldKeys, dt: f32) {
        if keys.left {
            self.angle -= self.turn_speed * dt;
        }
        if keys.right {
            self.angle += self.turn_speed * dt;
        }
        if keys.up {
            self.height += self.climb_speed * dt;
        }
        if keys.down {
            self.height -= self.climb_speed * dt;
        }
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.angle.cos() * self.radius,
            self.height,
            self.angle.sin() * self.radius,
        )
    }

    pub fn target(&self) -> Vec3 {
        Vec3::ZERO
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.eye(), self.target(), Vec3::Y)
    }
}

/// Perspective projection parameters (left-handed, depth in [0, 1]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    /// 90 degree vertical field of view, near 1, far 1000.
    pub fn for_viewport(width: u32, height: u32) -> Self {
        Self {
            fov_y: PI * 0.5,
            aspect: width as f32 / height as f32,
            near: 1.0,
            far: 1000.0,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, self.aspect, self.near, self.far)
    }
}
