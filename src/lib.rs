//! A physically based offline rendering core: analytic quadric
//! shapes with conservative intersection error bounds, a BVH over
//! models, a composable BSDF/microfacet scattering layer, stratified
//! and low-discrepancy samplers, a filtered sensor and a tile-parallel
//! Whitted integrator.

#[macro_use]
extern crate impl_ops;

pub mod accelerators;
pub mod cameras;
pub mod core;
pub mod filters;
pub mod integrators;
pub mod lights;
pub mod materials;
pub mod samplers;
pub mod shapes;
pub mod textures;
