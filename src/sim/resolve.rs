//! Contact resolution
//!
//! The step hands each frame's contacts to a `ContactResolver`. The default
//! `ImpulseResolver` is linear only: it pushes bodies apart along the normal
//! and applies a restitution impulse with Coulomb-style friction. Static
//! scenery, obstacles and vacated slots have infinite mass.

use glam::Vec3;

use super::body::{DynamicBody, Integrate};
use super::collision::{BodyRef, Contact};
use super::launcher::Launcher;
use super::pool::ProjectilePool;

/// Mutable view over every dynamic body for one frame
pub struct BodySetMut<'a> {
    pub launchers: &'a mut [Launcher],
    pub pool: &'a mut ProjectilePool,
}

impl BodySetMut<'_> {
    pub fn body(&self, body: BodyRef) -> Option<&DynamicBody> {
        match body {
            BodyRef::Launcher(i) => self.launchers.get(i).map(|l| &l.body),
            BodyRef::Projectile(i) => self.pool.round(i).map(|r| &r.body),
            BodyRef::Obstacle(_) => None,
        }
    }

    pub fn body_mut(&mut self, body: BodyRef) -> Option<&mut DynamicBody> {
        match body {
            BodyRef::Launcher(i) => self.launchers.get_mut(i).map(|l| &mut l.body),
            BodyRef::Projectile(i) => self.pool.body_mut(i),
            BodyRef::Obstacle(_) => None,
        }
    }

    /// Velocity and inverse mass; immovable when the body is absent
    fn motion(&self, body: Option<BodyRef>) -> (Vec3, f32) {
        body.and_then(|b| self.body(b))
            .map(|b| (b.velocity, b.inverse_mass()))
            .unwrap_or((Vec3::ZERO, 0.0))
    }
}

/// Backend that turns contacts into body corrections
pub trait ContactResolver {
    fn resolve(&mut self, contacts: &[Contact], bodies: &mut BodySetMut<'_>, dt: f32);
}

/// Sequential linear impulse resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseResolver {
    /// Passes over the contact list per frame
    pub iterations: usize,
}

impl Default for ImpulseResolver {
    fn default() -> Self {
        Self { iterations: 2 }
    }
}

impl ImpulseResolver {
    fn resolve_one(contact: &Contact, bodies: &mut BodySetMut<'_>) {
        let first = Some(contact.pair.first);
        let second = contact.pair.second;

        let (vel_a, inv_a) = bodies.motion(first);
        let (vel_b, inv_b) = bodies.motion(second);
        let total = inv_a + inv_b;
        if total <= 0.0 {
            return;
        }

        let normal = contact.normal;
        let mut push = Vec3::ZERO;
        if contact.penetration > 0.0 {
            push = normal * (contact.penetration / total);
        }

        let relative = vel_a - vel_b;
        let closing = relative.dot(normal);
        let mut impulse = Vec3::ZERO;
        if closing < 0.0 {
            let j = -(1.0 + contact.restitution) * closing / total;
            impulse = normal * j;

            let tangent = relative - normal * closing;
            let tangent_speed = tangent.length();
            if tangent_speed > 1e-6 {
                let jt = (tangent_speed / total).min(contact.friction * j);
                impulse -= tangent / tangent_speed * jt;
            }
        }

        if let Some(body) = first.and_then(|b| bodies.body_mut(b)) {
            body.position += push * inv_a;
            body.velocity += impulse * inv_a;
            body.calculate_derived_data();
        }
        if let Some(body) = second.and_then(|b| bodies.body_mut(b)) {
            body.position -= push * inv_b;
            body.velocity -= impulse * inv_b;
            body.calculate_derived_data();
        }
    }
}

impl ContactResolver for ImpulseResolver {
    fn resolve(&mut self, contacts: &[Contact], bodies: &mut BodySetMut<'_>, _dt: f32) {
        for _ in 0..self.iterations {
            for contact in contacts {
                Self::resolve_one(contact, bodies);
            }
        }
    }
}
