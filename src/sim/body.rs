//! Rigid body state and the capability traits built on it
//!
//! A `DynamicBody` only knows about motion. What it looks like to the
//! collision code is described separately by a `Shape`, and the two are tied
//! together by whoever implements `Collidable`.

use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::add_scaled_rotation;

/// Bounding-volume shape descriptor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere { radius: f32 },
    Cuboid { half_size: Vec3 },
}

impl Shape {
    /// Inverse inertia tensor of a solid shape with the given mass
    pub fn inverse_inertia(&self, mass: f32) -> Mat3 {
        if !mass.is_finite() {
            return Mat3::ZERO;
        }
        let diagonal = match *self {
            Shape::Sphere { radius } => Vec3::splat(0.4 * mass * radius * radius),
            Shape::Cuboid { half_size } => {
                let sq = half_size * half_size;
                Vec3::new(
                    0.3 * mass * (sq.y + sq.z),
                    0.3 * mass * (sq.x + sq.z),
                    0.3 * mass * (sq.x + sq.y),
                )
            }
        };
        Mat3::from_diagonal(diagonal.recip())
    }
}

/// World-space collision volume at the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Volume {
    Sphere { centre: Vec3, radius: f32 },
    Cuboid { transform: Mat4, half_size: Vec3 },
}

/// Something that can be advanced through time
pub trait Integrate {
    fn integrate(&mut self, dt: f32);
    /// Refresh everything derived from position and orientation
    fn calculate_derived_data(&mut self);
}

/// Something the contact generator can test
pub trait Collidable {
    fn volume(&self) -> Volume;
}

/// A simulated rigid body
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Constant acceleration (gravity or buoyancy)
    pub acceleration: Vec3,
    pub orientation: Quat,
    /// Angular velocity (radians/sec)
    pub rotation: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    inverse_mass: f32,
    inverse_inertia: Mat3,
    inverse_inertia_world: Mat3,
    force_accum: Vec3,
    transform: Mat4,
}

impl Default for DynamicBody {
    fn default() -> Self {
        Self::immovable(Vec3::ZERO)
    }
}

impl DynamicBody {
    /// A body with the given mass at `position`, at rest
    pub fn new(position: Vec3, mass: f32) -> Self {
        let mut body = Self::immovable(position);
        body.set_mass(mass);
        body
    }

    /// A body with infinite mass: forces and gravity never move it
    pub fn immovable(position: Vec3) -> Self {
        let mut body = Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            rotation: Vec3::ZERO,
            linear_damping: 1.0,
            angular_damping: 1.0,
            inverse_mass: 0.0,
            inverse_inertia: Mat3::ZERO,
            inverse_inertia_world: Mat3::ZERO,
            force_accum: Vec3::ZERO,
            transform: Mat4::IDENTITY,
        };
        body.calculate_derived_data();
        body
    }

    pub fn set_mass(&mut self, mass: f32) {
        debug_assert!(mass > 0.0, "body mass must be positive");
        self.inverse_mass = mass.recip();
    }

    /// Mass in kg (`f32::INFINITY` for immovable bodies)
    pub fn mass(&self) -> f32 {
        if self.inverse_mass == 0.0 {
            f32::INFINITY
        } else {
            self.inverse_mass.recip()
        }
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    #[inline]
    pub fn has_finite_mass(&self) -> bool {
        self.inverse_mass > 0.0
    }

    pub fn set_damping(&mut self, linear: f32, angular: f32) {
        self.linear_damping = linear;
        self.angular_damping = angular;
    }

    /// Set the inertia from a shape using the current mass
    pub fn set_inertia_for(&mut self, shape: Shape) {
        self.inverse_inertia = shape.inverse_inertia(self.mass());
        self.update_world_inertia();
    }

    pub fn inverse_inertia_world(&self) -> Mat3 {
        self.inverse_inertia_world
    }

    pub fn add_force(&mut self, force: Vec3) {
        self.force_accum += force;
    }

    pub fn clear_accumulators(&mut self) {
        self.force_accum = Vec3::ZERO;
    }

    /// Derived world transform (valid after `calculate_derived_data`)
    #[inline]
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    fn update_world_inertia(&mut self) {
        let rotation = Mat3::from_quat(self.orientation);
        self.inverse_inertia_world = rotation * self.inverse_inertia * rotation.transpose();
    }
}

impl Integrate for DynamicBody {
    fn integrate(&mut self, dt: f32) {
        if dt <= 0.0 || !self.has_finite_mass() {
            return;
        }

        let linear_acc = self.acceleration + self.force_accum * self.inverse_mass;
        self.velocity += linear_acc * dt;

        // Damping is expressed per second
        self.velocity *= self.linear_damping.powf(dt);
        self.rotation *= self.angular_damping.powf(dt);

        self.position += self.velocity * dt;
        self.orientation = add_scaled_rotation(self.orientation, self.rotation, dt);

        self.clear_accumulators();
    }

    fn calculate_derived_data(&mut self) {
        self.orientation = self.orientation.normalize();
        self.transform = Mat4::from_rotation_translation(self.orientation, self.position);
        self.update_world_inertia();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_applies_acceleration() {
        let mut body = DynamicBody::new(Vec3::ZERO, 2.0);
        body.acceleration = Vec3::new(0.0, -10.0, 0.0);
        body.integrate(1.0);
        body.calculate_derived_data();

        assert!((body.velocity.y + 10.0).abs() < 1e-5);
        assert!((body.position.y + 10.0).abs() < 1e-5);
        assert!((body.transform().w_axis.y + 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_damping_is_per_second() {
        let mut body = DynamicBody::new(Vec3::ZERO, 1.0);
        body.velocity = Vec3::new(0.0, 0.0, 10.0);
        body.set_damping(0.5, 1.0);
        body.integrate(1.0);
        assert!((body.velocity.z - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_forces_cleared_after_integrate() {
        let mut body = DynamicBody::new(Vec3::ZERO, 4.0);
        body.add_force(Vec3::new(8.0, 0.0, 0.0));
        body.integrate(0.5);
        assert!((body.velocity.x - 1.0).abs() < 1e-5);

        let before = body.velocity;
        body.integrate(0.5);
        assert_eq!(body.velocity, before);
    }

    #[test]
    fn test_immovable_body_stays_put() {
        let mut body = DynamicBody::immovable(Vec3::new(1.0, 2.0, 3.0));
        body.acceleration = Vec3::new(0.0, -10.0, 0.0);
        body.add_force(Vec3::X * 100.0);
        body.integrate(1.0);
        assert_eq!(body.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(body.mass().is_infinite());
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut body = DynamicBody::new(Vec3::ZERO, 1.0);
        body.velocity = Vec3::ONE;
        let before = body.clone();
        body.integrate(0.0);
        body.integrate(-0.1);
        assert_eq!(body, before);
    }

    #[test]
    fn test_sphere_inertia() {
        let inv = Shape::Sphere { radius: 1.0 }.inverse_inertia(2.5);
        // 0.4 * 2.5 * 1 = 1
        assert!((inv.x_axis.x - 1.0).abs() < 1e-5);
        assert!((inv.z_axis.z - 1.0).abs() < 1e-5);

        let mut body = DynamicBody::new(Vec3::ZERO, 2.5);
        body.set_inertia_for(Shape::Sphere { radius: 1.0 });
        assert!((body.inverse_inertia_world().y_axis.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_spin_keeps_orientation_normalized() {
        let mut body = DynamicBody::new(Vec3::ZERO, 1.0);
        body.rotation = Vec3::new(0.0, 3.0, 0.0);
        for _ in 0..100 {
            body.integrate(0.016);
            body.calculate_derived_data();
        }
        assert!((body.orientation.length() - 1.0).abs() < 1e-4);
    }
}
