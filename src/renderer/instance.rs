//! Per-body instance data for the external renderer

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::sim::Sandbox;

/// What an instance represents
pub mod kinds {
    pub const LAUNCHER: u32 = 0;
    pub const ROUND: u32 = 1;
    pub const OBSTACLE: u32 = 2;
}

/// One drawable body: world transform, colour and half extents
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// Sphere radius on every axis, or box half extents
    pub scale: [f32; 3],
    pub kind: u32,
}

impl InstanceData {
    pub fn new(model: Mat4, color: [f32; 4], scale: Vec3, kind: u32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            scale: scale.to_array(),
            kind,
        }
    }

    pub fn translation(&self) -> Vec3 {
        Mat4::from_cols_array_2d(&self.model).w_axis.truncate()
    }
}

/// Colors for sandbox elements
pub mod colors {
    use crate::sim::ShotKind;

    pub const PISTOL: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const ARTILLERY: [f32; 4] = [0.6, 0.1, 0.1, 1.0];
    pub const FIREBALL: [f32; 4] = [1.0, 0.5, 0.1, 1.0];
    pub const LASER: [f32; 4] = [1.0, 0.2, 0.6, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.5, 0.5, 0.55, 1.0];

    pub fn shot(kind: ShotKind) -> [f32; 4] {
        match kind {
            ShotKind::Pistol => PISTOL,
            ShotKind::Artillery => ARTILLERY,
            ShotKind::Fireball => FIREBALL,
            ShotKind::Laser => LASER,
        }
    }
}

/// Snapshot every visible body: launchers, then live rounds in slot order,
/// then obstacles
pub fn extract_instances(sandbox: &Sandbox) -> Vec<InstanceData> {
    let mut out = Vec::with_capacity(
        sandbox.launchers.len() + sandbox.pool.live_count() + sandbox.obstacles.len(),
    );

    for launcher in &sandbox.launchers {
        out.push(InstanceData::new(
            launcher.body.transform(),
            launcher.colour.extend(1.0).to_array(),
            Vec3::splat(launcher.radius),
            kinds::LAUNCHER,
        ));
    }

    for (_, round) in sandbox.pool.live() {
        out.push(InstanceData::new(
            round.body.transform(),
            colors::shot(round.kind),
            Vec3::splat(round.radius),
            kinds::ROUND,
        ));
    }

    for obstacle in &sandbox.obstacles {
        out.push(InstanceData::new(
            obstacle.transform(),
            colors::OBSTACLE,
            obstacle.half_size,
            kinds::OBSTACLE,
        ));
    }

    out
}

/// Raw bytes ready for a vertex/instance buffer upload
pub fn instance_bytes(instances: &[InstanceData]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
