//! Core engine types for the AutoHall showroom viewer.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Euler-angle transforms with cached model matrices
//! - Frame time management

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
