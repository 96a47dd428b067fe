//! Deterministic simulation module
//!
//! Physics and trail state live here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - No rendering or audio dependencies

pub mod collision;
pub mod physics;
pub mod trail;

pub use collision::{Boundary, Contact, boundary_contact, reflect};
pub use physics::{Ball, BallPhase, CollisionEvent, PhysicsEngine};
pub use trail::{ImpactTrailManager, Ripple};
