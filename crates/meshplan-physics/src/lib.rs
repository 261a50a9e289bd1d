//! # meshplan-physics
//!
//! Pure, deterministic RF propagation math: great-circle distance, Fresnel
//! zone geometry, Bullington knife-edge diffraction over an effective-Earth
//! profile, and the Okumura-Hata empirical model. Nothing in this crate
//! touches a handle, a file, or the network — every function takes plain
//! numbers and elevation samples and returns a value or a [`PhysicsError`].

mod error;
mod kernel;

pub use error::PhysicsError;
pub use kernel::{
    analyze_link, bullington_diffraction_loss, calculate_link, calculate_path_loss,
    fresnel_radius, haversine_distance, hata_loss, Environment, LinkReport, PathLossModel,
    DEFAULT_K_FACTOR,
};
