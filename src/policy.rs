//! Placement policies selected by a region's variability
//!
//! Variability is a continuous knob, but placement only ever follows one of
//! a few fixed policies per axis. The band thresholds live here and nowhere
//! else.

use serde::Serialize;

/// Radial: variability below this is uniform-in-area
pub const RADIAL_CENTER_THRESHOLD: f64 = 0.3;
/// Radial: variability at or above this is edge-biased
pub const RADIAL_EDGE_THRESHOLD: f64 = 0.7;
/// Probability that an edge-biased draw lands in the outer band
pub const EDGE_MIXTURE_WEIGHT: f64 = 0.7;
/// Width of the outer band, as a fraction of the outer radius, for a full disk
pub const EDGE_FRACTION_DISK: f64 = 0.3;
/// Width of the outer band, as a fraction of the outer radius, for a cortical shell
pub const EDGE_FRACTION_SHELL: f64 = 0.1;
/// Center-biased radius: standard deviation is the shell width over this
pub const CENTER_SIGMA_DIVISOR: f64 = 4.0;

/// Longitudinal: variability below this is uniform
pub const LONGITUDINAL_NORMAL_THRESHOLD: f64 = 0.2;
/// Longitudinal: variability at or above this is a normal/uniform mixture
pub const LONGITUDINAL_MIXTURE_THRESHOLD: f64 = 0.4;
/// Centered normal: standard deviation is the region length over this
pub const NORMAL_SIGMA_DIVISOR: f64 = 8.0;
/// Mixture normal: standard deviation is the region length over this
pub const MIXTURE_SIGMA_DIVISOR: f64 = 6.0;
/// Probability that a mixture draw comes from the normal component
pub const MIXTURE_NORMAL_WEIGHT: f64 = 0.6;

/// How a radius is drawn inside the allowed annulus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialPolicy {
    /// Points uniformly dense over the annulus area
    UniformArea,
    /// Truncated normal around the middle of the shell
    CenterBiased,
    /// Mostly in a thin band at the outer surface, otherwise uniform-in-area
    EdgeBiased,
}

impl RadialPolicy {
    /// Range lookup; `None` for NaN or values outside [0, 1]
    pub fn from_variability(variability: f64) -> Option<Self> {
        if !(0.0..=1.0).contains(&variability) {
            return None;
        }
        Some(if variability < RADIAL_CENTER_THRESHOLD {
            Self::UniformArea
        } else if variability < RADIAL_EDGE_THRESHOLD {
            Self::CenterBiased
        } else {
            Self::EdgeBiased
        })
    }

    pub fn all() -> &'static [Self] {
        &[Self::UniformArea, Self::CenterBiased, Self::EdgeBiased]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::UniformArea => "uniform in area",
            Self::CenterBiased => "center of shell",
            Self::EdgeBiased => "outer edge",
        }
    }
}

/// How a position along the region's length is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LongitudinalPolicy {
    /// Uniform over the region
    Uniform,
    /// Normal at the midpoint, sigma = length / 8, clamped
    CenterNormal,
    /// 60% normal at the midpoint (sigma = length / 6, clamped), 40% uniform
    Mixture,
}

impl LongitudinalPolicy {
    /// Range lookup; `None` for NaN or values outside [0, 1]
    pub fn from_variability(variability: f64) -> Option<Self> {
        if !(0.0..=1.0).contains(&variability) {
            return None;
        }
        Some(if variability < LONGITUDINAL_NORMAL_THRESHOLD {
            Self::Uniform
        } else if variability < LONGITUDINAL_MIXTURE_THRESHOLD {
            Self::CenterNormal
        } else {
            Self::Mixture
        })
    }

    pub fn all() -> &'static [Self] {
        &[Self::Uniform, Self::CenterNormal, Self::Mixture]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::CenterNormal => "centered normal",
            Self::Mixture => "normal/uniform mixture",
        }
    }
}

impl std::fmt::Display for RadialPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::fmt::Display for LongitudinalPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
