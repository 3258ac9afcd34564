//! Longitudinal decomposition of the bone into contiguous regions

use log::info;
use serde::Serialize;

use crate::density::{expected_count, MAX_STRUCTURES};
use crate::error::{ConfigIssue, DistributionError};
use crate::params::{BoneParams, RegionKind, RegionParams, PERCENT_SUM_TOLERANCE, REGION_COUNT};
use crate::policy::{LongitudinalPolicy, RadialPolicy};
use crate::transition::TransitionZone;

/// One resolved region: absolute extent plus the parameters that drive sampling.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Region {
    pub kind: RegionKind,
    pub start: f64,
    pub end: f64,
    pub length: f64,
    pub percent: f64,
    pub outer_radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cortical_thickness: Option<f64>,
    /// `max(0, outer_radius - cortical_thickness)`, zero for a full disk
    pub inner_radius: f64,
    pub areal_density: f64,
    pub mean_size: f64,
    pub variability: f64,
    pub radial_policy: RadialPolicy,
    pub longitudinal_policy: LongitudinalPolicy,
}

impl Region {
    /// Region name, as used in structure labels
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Shell thickness actually available for placement
    pub fn shell_width(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    /// Thickness treating a full disk as a shell as thick as its radius
    pub fn effective_thickness(&self) -> f64 {
        self.cortical_thickness.unwrap_or(self.outer_radius)
    }

    /// Whether a longitudinal coordinate lies in `[start, end]`
    pub fn contains_z(&self, z: f64) -> bool {
        z >= self.start && z <= self.end
    }
}

/// The whole bone: total length and its ordered regions
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoneGeometry {
    pub total_length: f64,
    pub regions: Vec<Region>,
}

impl BoneGeometry {
    /// Validate the parameters and resolve region boundaries
    pub fn build(params: &BoneParams) -> Result<Self, DistributionError> {
        let regions = build_regions(params.total_length, &params.regions)?;
        info!(
            "Resolved {} regions over {:.2} cm",
            regions.len(),
            params.total_length
        );
        Ok(Self {
            total_length: params.total_length,
            regions,
        })
    }

    pub fn region(&self, kind: RegionKind) -> &Region {
        &self.regions[kind.index()]
    }

    /// Region whose extent contains `z` (the later one on a shared boundary)
    pub fn region_at(&self, z: f64) -> Option<&Region> {
        self.regions.iter().rev().find(|r| r.contains_z(z))
    }

    /// Absolute positions of the internal boundaries
    pub fn boundaries(&self) -> Vec<f64> {
        self.regions.iter().skip(1).map(|r| r.start).collect()
    }

    /// Largest outer radius over all regions
    pub fn max_outer_radius(&self) -> f64 {
        self.regions.iter().map(|r| r.outer_radius).fold(0.0, f64::max)
    }
}

/// Validate the inputs and compute absolute region extents from relative
/// percentages.
///
/// Checks run in order: total length, region order and per-region fields,
/// the percentage sum, then the population of every region and seam against
/// `MAX_STRUCTURES`. Starts are accumulated from the previous end, so regions
/// are contiguous by construction; the final end is pinned to `total_length`.
pub fn build_regions(
    total_length: f64,
    inputs: &[RegionParams; REGION_COUNT],
) -> Result<Vec<Region>, DistributionError> {
    if !(total_length.is_finite() && total_length > 0.0) {
        return Err(ConfigIssue::NonPositiveLength { total_length }.into());
    }

    for (position, input) in inputs.iter().enumerate() {
        let expected = RegionKind::ALL[position];
        if input.kind != expected {
            return Err(ConfigIssue::RegionOrder {
                position,
                expected,
                found: input.kind,
            }
            .into());
        }
        input.validate()?;
    }

    let sum: f64 = inputs.iter().map(|s| s.percent).sum();
    if (sum - 100.0).abs() > PERCENT_SUM_TOLERANCE {
        return Err(ConfigIssue::PercentSum { sum }.into());
    }

    let mut regions = Vec::with_capacity(REGION_COUNT);
    let mut cursor = 0.0;

    for (i, input) in inputs.iter().enumerate() {
        let radial_policy = RadialPolicy::from_variability(input.variability).ok_or(
            ConfigIssue::VariabilityOutOfRange {
                region: input.kind,
                value: input.variability,
            },
        )?;
        let longitudinal_policy = LongitudinalPolicy::from_variability(input.variability).ok_or(
            ConfigIssue::VariabilityOutOfRange {
                region: input.kind,
                value: input.variability,
            },
        )?;

        let start = cursor;
        let end = if i == REGION_COUNT - 1 {
            total_length
        } else {
            start + total_length * input.percent / 100.0
        };
        cursor = end;

        let inner_radius = input
            .cortical_thickness
            .map(|t| (input.outer_radius - t).max(0.0))
            .unwrap_or(0.0);

        regions.push(Region {
            kind: input.kind,
            start,
            end,
            length: end - start,
            percent: input.percent,
            outer_radius: input.outer_radius,
            cortical_thickness: input.cortical_thickness,
            inner_radius,
            areal_density: input.areal_density,
            mean_size: input.mean_size,
            variability: input.variability,
            radial_policy,
            longitudinal_policy,
        });
    }

    check_populations(&regions, total_length)?;
    Ok(regions)
}

/// Reject regions and seams whose structure count exceeds `MAX_STRUCTURES`
fn check_populations(regions: &[Region], total_length: f64) -> Result<(), DistributionError> {
    for region in regions {
        let count = expected_count(region);
        if count > MAX_STRUCTURES {
            return Err(ConfigIssue::TooManyStructures {
                region: region.kind,
                transition: false,
                count,
            }
            .into());
        }
    }

    for pair in regions.windows(2) {
        let count = TransitionZone::between(&pair[0], &pair[1], total_length)
            .map(|zone| zone.expected_count())
            .unwrap_or(0);
        if count > MAX_STRUCTURES {
            return Err(ConfigIssue::TooManyStructures {
                region: pair[0].kind,
                transition: true,
                count,
            }
            .into());
        }
    }

    Ok(())
}
