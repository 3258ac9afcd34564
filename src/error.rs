//! Error types for parameter validation and export

use crate::density::MAX_STRUCTURES;
use crate::params::RegionKind;

/// The specific invariant a parameter set violates
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigIssue {
    /// Total length is zero, negative or not finite
    NonPositiveLength { total_length: f64 },
    /// Region percentages do not add up to 100
    PercentSum { sum: f64 },
    /// A field that must be strictly positive is not
    NonPositive {
        region: RegionKind,
        field: &'static str,
        value: f64,
    },
    /// A field that must be non-negative is negative or not finite
    Negative {
        region: RegionKind,
        field: &'static str,
        value: f64,
    },
    /// Variability outside [0, 1] (or NaN)
    VariabilityOutOfRange { region: RegionKind, value: f64 },
    /// A region or the seam after it would hold more than `MAX_STRUCTURES`
    TooManyStructures {
        region: RegionKind,
        transition: bool,
        count: usize,
    },
    /// Regions are not in proximal-to-distal order
    RegionOrder {
        position: usize,
        expected: RegionKind,
        found: RegionKind,
    },
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigIssue::NonPositiveLength { total_length } => {
                write!(f, "total length must be positive, got {}", total_length)
            }
            ConfigIssue::PercentSum { sum } => {
                write!(f, "region percentages sum to {}%, not 100%", sum)
            }
            ConfigIssue::NonPositive { region, field, value } => {
                write!(f, "{}: {} must be positive, got {}", region, field, value)
            }
            ConfigIssue::Negative { region, field, value } => {
                write!(f, "{}: {} must be non-negative, got {}", region, field, value)
            }
            ConfigIssue::VariabilityOutOfRange { region, value } => {
                write!(f, "{}: variability must be within [0, 1], got {}", region, value)
            }
            ConfigIssue::TooManyStructures { region, transition, count } => {
                let place = if *transition { " transition" } else { "" };
                write!(
                    f,
                    "{}{}: {} structures exceed the limit of {}",
                    region, place, count, MAX_STRUCTURES
                )
            }
            ConfigIssue::RegionOrder { position, expected, found } => {
                write!(
                    f,
                    "region {} should be {} but found {}",
                    position, expected, found
                )
            }
        }
    }
}

/// Errors that abort a distribution run
#[derive(Clone, Debug, PartialEq)]
pub enum DistributionError {
    /// Parameters failed validation; nothing was generated
    InvalidConfiguration(ConfigIssue),
}

impl std::fmt::Display for DistributionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributionError::InvalidConfiguration(issue) => {
                write!(f, "Invalid configuration: {}", issue)
            }
        }
    }
}

impl std::error::Error for DistributionError {}

impl From<ConfigIssue> for DistributionError {
    fn from(issue: ConfigIssue) -> Self {
        DistributionError::InvalidConfiguration(issue)
    }
}

/// Errors raised while reading parameters or writing results
#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    Image(image::ImageError),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
            ExportError::Csv(e) => write!(f, "CSV error: {}", e),
            ExportError::Json(e) => write!(f, "JSON error: {}", e),
            ExportError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::Csv(e) => Some(e),
            ExportError::Json(e) => Some(e),
            ExportError::Image(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Json(e)
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e)
    }
}
