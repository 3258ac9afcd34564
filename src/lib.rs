//! Osteon distribution library
//!
//! Generates a reproducible synthetic population of osteons along an
//! anatomically segmented long bone, for hand-off to 3-D modelling tools.
//! Re-exports modules for use by binaries and tools.

pub mod density;
pub mod engine;
pub mod error;
pub mod export;
pub mod geometry;
pub mod params;
pub mod policy;
pub mod render;
pub mod report;
pub mod sampling;
pub mod seeds;
pub mod structure;
pub mod transition;

pub use engine::{generate, generate_from_params, generate_seeded, Distribution};
pub use error::{ConfigIssue, DistributionError, ExportError};
pub use geometry::{build_regions, BoneGeometry, Region};
pub use params::{BoneParams, BonePreset, RegionKind, RegionParams};
pub use seeds::DistributionSeeds;
pub use structure::{Structure, StructureLabel, StructureRecord};
