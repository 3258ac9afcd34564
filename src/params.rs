//! Input parameters for a distribution run
//!
//! A bone is described by its total length and five ordered anatomical
//! regions. Defaults mirror a human femur measured in centimetres, with
//! structure sizes in micrometres.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigIssue, DistributionError, ExportError};
use crate::geometry::build_regions;

/// Number of anatomical regions along the bone.
pub const REGION_COUNT: usize = 5;

/// Allowed deviation of the percentage sum from 100.
pub const PERCENT_SUM_TOLERANCE: f64 = 1e-2;

/// Anatomical region of a long bone, proximal to distal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    ProximalEpiphysis,
    ProximalMetaphysis,
    Diaphysis,
    DistalMetaphysis,
    DistalEpiphysis,
}

impl RegionKind {
    /// All regions in canonical order
    pub const ALL: [RegionKind; REGION_COUNT] = [
        RegionKind::ProximalEpiphysis,
        RegionKind::ProximalMetaphysis,
        RegionKind::Diaphysis,
        RegionKind::DistalMetaphysis,
        RegionKind::DistalEpiphysis,
    ];

    /// Display name used in labels and exports
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProximalEpiphysis => "Proximal Epiphysis",
            Self::ProximalMetaphysis => "Proximal Metaphysis",
            Self::Diaphysis => "Diaphysis",
            Self::DistalMetaphysis => "Distal Metaphysis",
            Self::DistalEpiphysis => "Distal Epiphysis",
        }
    }

    /// Position of this region in the proximal-to-distal order
    pub fn index(&self) -> usize {
        match self {
            Self::ProximalEpiphysis => 0,
            Self::ProximalMetaphysis => 1,
            Self::Diaphysis => 2,
            Self::DistalMetaphysis => 3,
            Self::DistalEpiphysis => 4,
        }
    }
}

impl std::fmt::Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-region input descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionParams {
    /// Which anatomical region this describes
    pub kind: RegionKind,
    /// Share of the total bone length (percent)
    pub percent: f64,
    /// Outer radius of the cross-section (cm)
    pub outer_radius: f64,
    /// Thickness of the cortical shell (cm); `None` means the full disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cortical_thickness: Option<f64>,
    /// Expected structures per cm² of cortical cross-section
    pub areal_density: f64,
    /// Mean structure diameter (µm)
    pub mean_size: f64,
    /// Placement variability in [0, 1]
    pub variability: f64,
}

/// Complete parameter set for one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneParams {
    /// Total bone length (cm)
    pub total_length: f64,
    /// Regions, proximal to distal
    pub regions: [RegionParams; REGION_COUNT],
}

impl Default for BoneParams {
    fn default() -> Self {
        let percent = [15.0, 10.0, 50.0, 10.0, 15.0];
        let radius = [2.5, 1.5, 1.0, 1.8, 3.0];
        let density = [1500.0, 1800.0, 2000.0, 1800.0, 1500.0];
        let size = [200.0, 180.0, 150.0, 180.0, 200.0];

        Self {
            total_length: 45.0,
            regions: RegionKind::ALL.map(|kind| {
                let i = kind.index();
                RegionParams {
                    kind,
                    percent: percent[i],
                    outer_radius: radius[i],
                    cortical_thickness: None,
                    areal_density: density[i],
                    mean_size: size[i],
                    variability: 0.05,
                }
            }),
        }
    }
}

impl BoneParams {
    /// Structures confined to a cortical shell, thickest at the diaphysis
    pub fn cortical_shell() -> Self {
        let thickness = [0.25, 0.35, 0.45, 0.35, 0.25];
        let mut params = Self::default();
        for region in params.regions.iter_mut() {
            region.cortical_thickness = Some(thickness[region.kind.index()]);
        }
        params
    }

    /// Strong edge and center biasing at the ends, milder along the shaft
    pub fn high_variability() -> Self {
        let variability = [0.7, 0.5, 0.3, 0.5, 0.7];
        let mut params = Self::default();
        for region in params.regions.iter_mut() {
            region.variability = variability[region.kind.index()];
        }
        params
    }

    /// Sum of the region percentages
    pub fn percent_sum(&self) -> f64 {
        self.regions.iter().map(|r| r.percent).sum()
    }

    /// Look up a region descriptor by kind
    pub fn region(&self, kind: RegionKind) -> &RegionParams {
        &self.regions[kind.index()]
    }

    /// Mutable access to a region descriptor by kind
    pub fn region_mut(&mut self, kind: RegionKind) -> &mut RegionParams {
        &mut self.regions[kind.index()]
    }

    /// Check every invariant the geometry and generation rely on.
    ///
    /// Nothing is normalized or clamped: the first violated invariant is
    /// returned as `InvalidConfiguration`. This resolves the geometry once
    /// and discards it, so every check lives in `build_regions`.
    pub fn validate(&self) -> Result<(), DistributionError> {
        build_regions(self.total_length, &self.regions).map(|_| ())
    }

    /// Load a parameter file (JSON)
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let file = File::open(path)?;
        let params = serde_json::from_reader(BufReader::new(file))?;
        Ok(params)
    }

    /// Save this parameter set as pretty-printed JSON
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

impl RegionParams {
    /// Per-region positivity and range checks
    pub(crate) fn validate(&self) -> Result<(), DistributionError> {
        let positive = [
            ("percent", self.percent),
            ("outer_radius", self.outer_radius),
            ("mean_size", self.mean_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigIssue::NonPositive { region: self.kind, field, value }.into());
            }
        }

        if let Some(thickness) = self.cortical_thickness {
            if !(thickness.is_finite() && thickness > 0.0) {
                return Err(ConfigIssue::NonPositive {
                    region: self.kind,
                    field: "cortical_thickness",
                    value: thickness,
                }
                .into());
            }
        }

        if !(self.areal_density.is_finite() && self.areal_density >= 0.0) {
            return Err(ConfigIssue::Negative {
                region: self.kind,
                field: "areal_density",
                value: self.areal_density,
            }
            .into());
        }

        if !(0.0..=1.0).contains(&self.variability) {
            return Err(ConfigIssue::VariabilityOutOfRange {
                region: self.kind,
                value: self.variability,
            }
            .into());
        }

        Ok(())
    }
}

/// Named parameter presets for the CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BonePreset {
    /// Full-disk cross-sections, low variability
    #[default]
    Default,
    /// Placement restricted to the cortical shell
    CorticalShell,
    /// Biased placement toward center or edge
    HighVariability,
}

impl BonePreset {
    /// Parse from string (for CLI)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" | "disk" => Some(Self::Default),
            "cortical" | "cortical-shell" | "shell" => Some(Self::CorticalShell),
            "high-variability" | "variable" => Some(Self::HighVariability),
            _ => None,
        }
    }

    /// Build the parameter set for this preset
    pub fn params(&self) -> BoneParams {
        match self {
            Self::Default => BoneParams::default(),
            Self::CorticalShell => BoneParams::cortical_shell(),
            Self::HighVariability => BoneParams::high_variability(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let params = BoneParams::default();
        assert!(params.validate().is_ok());
        assert!((params.percent_sum() - 100.0).abs() < 1e-9);
        assert_eq!(params.region(RegionKind::Diaphysis).outer_radius, 1.0);
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in [BonePreset::Default, BonePreset::CorticalShell, BonePreset::HighVariability] {
            assert!(preset.params().validate().is_ok(), "{:?}", preset);
        }
        assert_eq!(
            BoneParams::cortical_shell().region(RegionKind::Diaphysis).cortical_thickness,
            Some(0.45)
        );
    }

    #[test]
    fn test_percent_sum_rejected() {
        let mut params = BoneParams::default();
        params.region_mut(RegionKind::Diaphysis).percent = 49.5;

        match params.validate() {
            Err(DistributionError::InvalidConfiguration(ConfigIssue::PercentSum { sum })) => {
                assert!((sum - 99.5).abs() < 1e-9);
            }
            other => panic!("expected percent sum error, got {:?}", other),
        }
    }

    #[test]
    fn test_percent_sum_within_tolerance() {
        let mut params = BoneParams::default();
        params.region_mut(RegionKind::Diaphysis).percent = 50.005;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_non_positive_values_rejected() {
        let mut params = BoneParams::default();
        params.total_length = 0.0;
        assert!(matches!(
            params.validate(),
            Err(DistributionError::InvalidConfiguration(ConfigIssue::NonPositiveLength { .. }))
        ));

        let mut params = BoneParams::default();
        params.region_mut(RegionKind::DistalMetaphysis).outer_radius = -1.0;
        match params.validate() {
            Err(DistributionError::InvalidConfiguration(ConfigIssue::NonPositive { region, field, .. })) => {
                assert_eq!(region, RegionKind::DistalMetaphysis);
                assert_eq!(field, "outer_radius");
            }
            other => panic!("expected non-positive error, got {:?}", other),
        }
    }

    #[test]
    fn test_variability_out_of_range_rejected() {
        let mut params = BoneParams::default();
        params.region_mut(RegionKind::ProximalEpiphysis).variability = 1.5;
        assert!(matches!(
            params.validate(),
            Err(DistributionError::InvalidConfiguration(ConfigIssue::VariabilityOutOfRange { .. }))
        ));

        params.region_mut(RegionKind::ProximalEpiphysis).variability = f64::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_region_order_enforced() {
        let mut params = BoneParams::default();
        params.regions.swap(0, 4);
        assert!(matches!(
            params.validate(),
            Err(DistributionError::InvalidConfiguration(ConfigIssue::RegionOrder { position: 0, .. }))
        ));
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");

        let params = BoneParams::cortical_shell();
        params.to_json_file(&path).unwrap();
        let loaded = BoneParams::from_json_file(&path).unwrap();
        assert!((loaded.total_length - params.total_length).abs() < 1e-12);
        for (a, b) in loaded.regions.iter().zip(params.regions.iter()) {
            assert_eq!(a.kind, b.kind);
            assert!((a.percent - b.percent).abs() < 1e-12);
            assert!((a.cortical_thickness.unwrap() - b.cortical_thickness.unwrap()).abs() < 1e-12);
            assert!((a.variability - b.variability).abs() < 1e-12);
        }
    }

    #[test]
    fn test_thickness_optional_in_json() {
        let json = r#"{
            "total_length": 10.0,
            "regions": [
                {"kind": "proximal_epiphysis", "percent": 20, "outer_radius": 1, "areal_density": 10, "mean_size": 100, "variability": 0.1},
                {"kind": "proximal_metaphysis", "percent": 20, "outer_radius": 1, "areal_density": 10, "mean_size": 100, "variability": 0.1},
                {"kind": "diaphysis", "percent": 20, "outer_radius": 1, "cortical_thickness": 0.3, "areal_density": 10, "mean_size": 100, "variability": 0.1},
                {"kind": "distal_metaphysis", "percent": 20, "outer_radius": 1, "areal_density": 10, "mean_size": 100, "variability": 0.1},
                {"kind": "distal_epiphysis", "percent": 20, "outer_radius": 1, "areal_density": 10, "mean_size": 100, "variability": 0.1}
            ]
        }"#;
        let params: BoneParams = serde_json::from_str(json).unwrap();
        assert!(params.validate().is_ok());
        assert_eq!(params.region(RegionKind::Diaphysis).cortical_thickness, Some(0.3));
        assert_eq!(params.region(RegionKind::DistalEpiphysis).cortical_thickness, None);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(BonePreset::from_str("Cortical"), Some(BonePreset::CorticalShell));
        assert_eq!(BonePreset::from_str("variable"), Some(BonePreset::HighVariability));
        assert_eq!(BonePreset::from_str("femur"), None);
    }
}
