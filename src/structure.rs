//! Generated structures and their export records

use serde::{Deserialize, Serialize};

use crate::params::RegionKind;

/// Suffix appended to labels of structures placed by the transition blender
pub const TRANSITION_SUFFIX: &str = " (transition)";

/// Originating region, optionally marked as transition membership
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StructureLabel {
    pub region: RegionKind,
    pub transition: bool,
}

impl StructureLabel {
    pub fn regular(region: RegionKind) -> Self {
        Self { region, transition: false }
    }

    pub fn transition(region: RegionKind) -> Self {
        Self { region, transition: true }
    }
}

impl std::fmt::Display for StructureLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.transition {
            write!(f, "{}{}", self.region.name(), TRANSITION_SUFFIX)
        } else {
            write!(f, "{}", self.region.name())
        }
    }
}

/// A point in bone coordinates: x/y across the section, z along the bone (cm)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// Distance from the bone axis
    pub fn radial_distance(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// One simulated structure (osteon)
#[derive(Clone, Debug, PartialEq)]
pub struct Structure {
    pub label: StructureLabel,
    pub position: Position,
    /// Diameter (µm), always positive
    pub size: f64,
}

impl Structure {
    pub fn is_transition(&self) -> bool {
        self.label.transition
    }

    /// Flat record in the column layout downstream modelling tools read
    pub fn record(&self) -> StructureRecord {
        StructureRecord {
            section_name: self.label.to_string(),
            position_x_cm: self.position.x,
            position_y_cm: self.position.y,
            position_z_cm: self.position.z,
            size_um: self.size,
        }
    }
}

/// Exported row. Field names are part of the hand-off format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureRecord {
    pub section_name: String,
    pub position_x_cm: f64,
    pub position_y_cm: f64,
    pub position_z_cm: f64,
    pub size_um: f64,
}

/// Records ordered by longitudinal coordinate, ascending
pub fn records_sorted_by_z(structures: &[Structure]) -> Vec<StructureRecord> {
    let mut records: Vec<StructureRecord> = structures.iter().map(Structure::record).collect();
    records.sort_by(|a, b| a.position_z_cm.total_cmp(&b.position_z_cm));
    records
}
