//! Procedural mesh generation for the showroom: floor, walls, platform,
//! car bodies, and wheels. All builders are deterministic.

pub mod primitives;

pub use primitives::*;
