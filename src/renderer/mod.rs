//! Render extraction
//!
//! The sandbox does not draw. It hands the external renderer one
//! `InstanceData` per visible body, laid out for direct GPU upload.

pub mod instance;

pub use instance::{InstanceData, colors, extract_instances, instance_bytes, kinds};
