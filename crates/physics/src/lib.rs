//! AABB collision for the showroom: wall bounds, overlap tests, push-out
//! resolution, and raycasts.

pub mod collision;

pub use collision::*;
