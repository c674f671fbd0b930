//! Contact records, the bounded contact buffer and pairwise primitives
//!
//! Every primitive checks the buffer before testing, appends at most one
//! contact, and reports whether it found one. Normals always point towards
//! the first body of the contact.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::body::Volume;

/// Index of a body taking part in a contact, valid for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRef {
    Launcher(usize),
    Projectile(usize),
    Obstacle(usize),
}

/// The two sides of a contact; `None` on the second side is static scenery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPair {
    pub first: BodyRef,
    pub second: Option<BodyRef>,
}

impl ContactPair {
    pub fn new(first: BodyRef, second: BodyRef) -> Self {
        Self {
            first,
            second: Some(second),
        }
    }

    pub fn with_scenery(first: BodyRef) -> Self {
        Self {
            first,
            second: None,
        }
    }
}

/// A detected overlap between two collidables
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub pair: ContactPair,
    /// Contact point (world space)
    pub point: Vec3,
    /// Contact normal, pointing towards the first body
    pub normal: Vec3,
    /// Penetration depth (may be slightly negative within tolerance)
    pub penetration: f32,
    pub friction: f32,
    pub restitution: f32,
}

/// Coefficients shared by every contact of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactCoefficients {
    pub friction: f32,
    pub restitution: f32,
    /// Bodies closer than this are reported even if not overlapping
    pub tolerance: f32,
}

impl Default for ContactCoefficients {
    fn default() -> Self {
        use crate::consts::{FRICTION, RESTITUTION, TOLERANCE};
        Self {
            friction: FRICTION,
            restitution: RESTITUTION,
            tolerance: TOLERANCE,
        }
    }
}

/// A static plane; everything on the side opposite the normal is solid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalfSpace {
    pub normal: Vec3,
    pub offset: f32,
}

impl Default for HalfSpace {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            offset: 0.0,
        }
    }
}

/// Per-frame bounded contact buffer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactBuffer {
    contacts: Vec<Contact>,
    max_contacts: usize,
    coefficients: ContactCoefficients,
}

impl ContactBuffer {
    pub fn with_capacity(max_contacts: usize) -> Self {
        Self {
            contacts: Vec::with_capacity(max_contacts),
            max_contacts,
            coefficients: ContactCoefficients::default(),
        }
    }

    /// Empty the buffer for a new frame
    pub fn reset(&mut self, max_contacts: usize, friction: f32, restitution: f32, tolerance: f32) {
        self.contacts.clear();
        self.max_contacts = max_contacts;
        self.coefficients = ContactCoefficients {
            friction,
            restitution,
            tolerance,
        };
    }

    pub fn reset_with(&mut self, max_contacts: usize, coefficients: ContactCoefficients) {
        self.reset(
            max_contacts,
            coefficients.friction,
            coefficients.restitution,
            coefficients.tolerance,
        );
    }

    #[inline]
    pub fn has_capacity(&self) -> bool {
        self.contacts.len() < self.max_contacts
    }

    #[inline]
    pub fn tolerance(&self) -> f32 {
        self.coefficients.tolerance
    }

    pub fn coefficients(&self) -> ContactCoefficients {
        self.coefficients
    }

    pub fn max_contacts(&self) -> usize {
        self.max_contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Append a contact stamped with the frame coefficients.
    /// Returns false (and drops it) when the buffer is full.
    pub fn push(&mut self, pair: ContactPair, point: Vec3, normal: Vec3, penetration: f32) -> bool {
        if !self.has_capacity() {
            return false;
        }
        self.contacts.push(Contact {
            pair,
            point,
            normal,
            penetration,
            friction: self.coefficients.friction,
            restitution: self.coefficients.restitution,
        });
        true
    }
}

/// Sphere against sphere
pub fn sphere_and_sphere(
    a: (Vec3, f32),
    b: (Vec3, f32),
    pair: ContactPair,
    data: &mut ContactBuffer,
) -> bool {
    if !data.has_capacity() {
        return false;
    }
    let (centre_a, radius_a) = a;
    let (centre_b, radius_b) = b;

    let midline = centre_a - centre_b;
    let size = midline.length();
    let reach = radius_a + radius_b;

    // Coincident centres give no usable normal
    if size <= 0.0 || size >= reach + data.tolerance() {
        return false;
    }

    let normal = midline / size;
    let point = centre_b + midline * 0.5;
    data.push(pair, point, normal, reach - size)
}

/// Sphere against a static half-space
pub fn sphere_and_half_space(
    sphere: (Vec3, f32),
    plane: &HalfSpace,
    pair: ContactPair,
    data: &mut ContactBuffer,
) -> bool {
    if !data.has_capacity() {
        return false;
    }
    let (centre, radius) = sphere;

    let distance = plane.normal.dot(centre) - radius - plane.offset;
    if distance >= data.tolerance() {
        return false;
    }

    let point = centre - plane.normal * (distance + radius);
    data.push(pair, point, plane.normal, -distance)
}

/// Oriented box against sphere; the box is the first body
pub fn box_and_sphere(
    transform: Mat4,
    half_size: Vec3,
    sphere: (Vec3, f32),
    pair: ContactPair,
    data: &mut ContactBuffer,
) -> bool {
    if !data.has_capacity() {
        return false;
    }
    let (centre, radius) = sphere;
    let reach = radius + data.tolerance();

    let local = transform.inverse().transform_point3(centre);

    // Separating axis early-out
    if (local.abs() - half_size).max_element() > reach {
        return false;
    }

    let closest = local.clamp(-half_size, half_size);
    let dist_sq = (closest - local).length_squared();
    if dist_sq > reach * reach {
        return false;
    }

    let closest_world = transform.transform_point3(closest);
    let offset = closest_world - centre;
    let (normal, penetration) = if dist_sq > 0.0 {
        (offset.normalize(), radius - dist_sq.sqrt())
    } else {
        // Centre inside the box: push out along the shallowest face
        let depth = half_size - local.abs();
        let axis = if depth.x <= depth.y && depth.x <= depth.z {
            Vec3::X * local.x.signum()
        } else if depth.y <= depth.z {
            Vec3::Y * local.y.signum()
        } else {
            Vec3::Z * local.z.signum()
        };
        (-transform.transform_vector3(axis).normalize(), radius + depth.min_element())
    };

    data.push(pair, closest_world, normal, penetration)
}

/// Dispatch a pairwise test on two volumes.
///
/// Returns false for pairs this sandbox never tests (cuboid vs cuboid).
pub fn volume_and_volume(a: &Volume, b: &Volume, pair: ContactPair, data: &mut ContactBuffer) -> bool {
    match (*a, *b) {
        (
            Volume::Sphere {
                centre: ca,
                radius: ra,
            },
            Volume::Sphere {
                centre: cb,
                radius: rb,
            },
        ) => sphere_and_sphere((ca, ra), (cb, rb), pair, data),
        (
            Volume::Cuboid {
                transform,
                half_size,
            },
            Volume::Sphere { centre, radius },
        ) => box_and_sphere(transform, half_size, (centre, radius), pair, data),
        (
            Volume::Sphere { centre, radius },
            Volume::Cuboid {
                transform,
                half_size,
            },
        ) => {
            let Some(second) = pair.second else {
                return false;
            };
            // Keep the box first so the normal convention holds, then flip back
            let flipped = ContactPair::new(second, pair.first);
            let found = box_and_sphere(transform, half_size, (centre, radius), flipped, data);
            if found {
                if let Some(last) = data.contacts.last_mut() {
                    last.pair = pair;
                    last.normal = -last.normal;
                }
            }
            found
        }
        (Volume::Cuboid { .. }, Volume::Cuboid { .. }) => false,
    }
}

/// Any volume against a static half-space
pub fn volume_and_half_space(
    volume: &Volume,
    plane: &HalfSpace,
    pair: ContactPair,
    data: &mut ContactBuffer,
) -> bool {
    match *volume {
        Volume::Sphere { centre, radius } => sphere_and_half_space((centre, radius), plane, pair, data),
        Volume::Cuboid {
            transform,
            half_size,
        } => {
            if !data.has_capacity() {
                return false;
            }
            // Deepest vertex only
            let mut deepest: Option<(Vec3, f32)> = None;
            for i in 0..8 {
                let corner = Vec3::new(
                    if i & 1 == 0 { -half_size.x } else { half_size.x },
                    if i & 2 == 0 { -half_size.y } else { half_size.y },
                    if i & 4 == 0 { -half_size.z } else { half_size.z },
                );
                let world = transform.transform_point3(corner);
                let distance = plane.normal.dot(world) - plane.offset;
                if distance < data.tolerance() && deepest.is_none_or(|(_, d)| distance < d) {
                    deepest = Some((world, distance));
                }
            }
            match deepest {
                Some((world, distance)) => {
                    let point = world - plane.normal * distance;
                    data.push(pair, point, plane.normal, -distance)
                }
                None => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(max: usize) -> ContactBuffer {
        let mut data = ContactBuffer::with_capacity(max);
        data.reset(max, 0.9, 0.1, 0.0);
        data
    }

    fn pair() -> ContactPair {
        ContactPair::new(BodyRef::Launcher(0), BodyRef::Projectile(0))
    }

    #[test]
    fn test_sphere_sphere_overlap() {
        let mut data = buffer(4);
        let hit = sphere_and_sphere((Vec3::new(0.0, 0.0, 1.5), 1.0), (Vec3::ZERO, 1.0), pair(), &mut data);
        assert!(hit);
        let contact = &data.contacts()[0];
        assert!((contact.penetration - 0.5).abs() < 1e-5);
        // Normal points towards the first sphere
        assert!((contact.normal - Vec3::Z).length() < 1e-5);
        assert!((contact.point.z - 0.75).abs() < 1e-5);
        assert_eq!(contact.friction, 0.9);
    }

    #[test]
    fn test_sphere_sphere_miss_and_tolerance() {
        let mut data = buffer(4);
        assert!(!sphere_and_sphere((Vec3::new(0.0, 0.0, 2.05), 1.0), (Vec3::ZERO, 1.0), pair(), &mut data));

        data.reset(4, 0.9, 0.1, 0.1);
        assert!(sphere_and_sphere((Vec3::new(0.0, 0.0, 2.05), 1.0), (Vec3::ZERO, 1.0), pair(), &mut data));
        assert!(data.contacts()[0].penetration < 0.0);
    }

    #[test]
    fn test_sphere_half_space() {
        let mut data = buffer(4);
        let ground = HalfSpace::default();
        let pair = ContactPair::with_scenery(BodyRef::Launcher(0));

        assert!(!sphere_and_half_space((Vec3::new(0.0, 2.0, 0.0), 1.0), &ground, pair, &mut data));
        assert!(sphere_and_half_space((Vec3::new(0.0, 0.5, 0.0), 1.0), &ground, pair, &mut data));

        let contact = &data.contacts()[0];
        assert!((contact.penetration - 0.5).abs() < 1e-5);
        assert_eq!(contact.normal, Vec3::Y);
        assert!(contact.point.y.abs() < 1e-5);
        assert_eq!(contact.pair.second, None);
    }

    #[test]
    fn test_box_sphere() {
        let mut data = buffer(4);
        let transform = Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0));
        let pair = ContactPair::new(BodyRef::Obstacle(0), BodyRef::Projectile(0));

        // Sphere in front of the -Z face
        assert!(box_and_sphere(transform, Vec3::ONE, (Vec3::new(0.0, 0.0, 8.7), 0.5), pair, &mut data));
        let contact = &data.contacts()[0];
        assert!((contact.penetration - 0.2).abs() < 1e-4);
        assert!((contact.point.z - 9.0).abs() < 1e-4);
        // Towards the box
        assert!(contact.normal.z > 0.99);

        // Far away
        assert!(!box_and_sphere(transform, Vec3::ONE, (Vec3::new(0.0, 0.0, 5.0), 0.5), pair, &mut data));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_full_buffer_rejects() {
        let mut data = buffer(1);
        let ground = HalfSpace::default();
        let pair = ContactPair::with_scenery(BodyRef::Launcher(0));
        assert!(sphere_and_half_space((Vec3::ZERO, 1.0), &ground, pair, &mut data));
        assert!(!data.has_capacity());
        assert!(!sphere_and_half_space((Vec3::ZERO, 1.0), &ground, pair, &mut data));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_zero_capacity_buffer() {
        let mut data = buffer(0);
        assert!(!data.has_capacity());
        assert!(!sphere_and_sphere((Vec3::ZERO, 1.0), (Vec3::X, 1.0), pair(), &mut data));
        assert!(data.is_empty());
    }

    #[test]
    fn test_box_sphere_centre_inside() {
        let mut data = buffer(4);
        let transform = Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0));
        let pair = ContactPair::new(BodyRef::Obstacle(0), BodyRef::Projectile(0));

        // 0.25 past the -Z face
        assert!(box_and_sphere(transform, Vec3::ONE, (Vec3::new(0.0, 0.0, 9.25), 0.2), pair, &mut data));
        let contact = &data.contacts()[0];
        assert!((contact.penetration - 0.45).abs() < 1e-4);
        // Pushes the sphere back out through the -Z face
        assert!(contact.normal.z > 0.99);
    }

    #[test]
    fn test_sphere_vs_cuboid_flips_back() {
        let mut data = buffer(4);
        let sphere = Volume::Sphere {
            centre: Vec3::new(0.0, 0.0, 8.7),
            radius: 0.5,
        };
        let cuboid = Volume::Cuboid {
            transform: Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0)),
            half_size: Vec3::ONE,
        };
        let pair = ContactPair::new(BodyRef::Projectile(2), BodyRef::Obstacle(0));
        assert!(volume_and_volume(&sphere, &cuboid, pair, &mut data));
        let contact = &data.contacts()[0];
        assert_eq!(contact.pair, pair);
        // Towards the sphere now
        assert!(contact.normal.z < -0.99);
    }

    #[test]
    fn test_cuboid_half_space() {
        let mut data = buffer(4);
        let cuboid = Volume::Cuboid {
            transform: Mat4::from_translation(Vec3::new(0.0, 0.8, 0.0)),
            half_size: Vec3::ONE,
        };
        let pair = ContactPair::with_scenery(BodyRef::Obstacle(0));
        assert!(volume_and_half_space(&cuboid, &HalfSpace::default(), pair, &mut data));
        assert!((data.contacts()[0].penetration - 0.2).abs() < 1e-4);
    }
}
