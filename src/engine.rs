//! Distribution engine
//!
//! A linear pass over the regions: each region contributes exactly
//! `expected_count` structures, and each internal boundary contributes a
//! transition population. The result is a flat, unsorted population.

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::density::expected_count;
use crate::error::DistributionError;
use crate::geometry::{BoneGeometry, Region};
use crate::params::{BoneParams, RegionKind};
use crate::sampling::{place_longitudinal, place_radial, sample_size, REGULAR_SIZE_JITTER};
use crate::seeds::DistributionSeeds;
use crate::structure::{Position, Structure, StructureLabel};
use crate::transition;

/// Region populations above this size are reported as unusually large
const LARGE_REGION_COUNT: usize = 1_000_000;

/// Structure counts for one region
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionCount {
    pub kind: RegionKind,
    /// Structures placed inside the region itself
    pub regular: usize,
    /// Structures from the seam after this region (zero for the last region)
    pub transition_after: usize,
}

/// Result of one generation run
#[derive(Clone, Debug)]
pub struct Distribution {
    pub geometry: BoneGeometry,
    pub structures: Vec<Structure>,
    pub counts: Vec<RegionCount>,
}

impl Distribution {
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Total structures placed inside regions
    pub fn regular_total(&self) -> usize {
        self.counts.iter().map(|c| c.regular).sum()
    }

    /// Total structures placed in transition zones
    pub fn transition_total(&self) -> usize {
        self.counts.iter().map(|c| c.transition_after).sum()
    }

    /// Structures carrying the given label
    pub fn with_label(&self, label: StructureLabel) -> impl Iterator<Item = &Structure> {
        self.structures.iter().filter(move |s| s.label == label)
    }
}

/// Populate one region with its own structures
pub fn populate_region<R: Rng>(region: &Region, rng: &mut R) -> Vec<Structure> {
    let count = expected_count(region);
    if count == 0 {
        debug!("{}: empty region (cortical area or density is zero)", region.kind);
        return Vec::new();
    }
    if count > LARGE_REGION_COUNT {
        warn!("{}: generating {} structures", region.kind, count);
    }

    let label = StructureLabel::regular(region.kind);
    let mut structures = Vec::with_capacity(count);
    for _ in 0..count {
        let (x, y) = place_radial(rng, region.inner_radius, region.outer_radius, region.radial_policy);
        let dz = place_longitudinal(rng, region.length, region.longitudinal_policy);
        let z = (region.start + dz).min(region.end);
        let size = sample_size(rng, region.mean_size, REGULAR_SIZE_JITTER);
        structures.push(Structure {
            label,
            position: Position { x, y, z },
            size,
        });
    }
    structures
}

/// Generate the full population drawing every sample from one generator
pub fn generate<R: Rng>(geometry: &BoneGeometry, rng: &mut R) -> Distribution {
    run(geometry, |_| None, rng)
}

/// Generate with an independent generator per region and per seam
pub fn generate_seeded(geometry: &BoneGeometry, seeds: &DistributionSeeds) -> Distribution {
    let mut fallback = ChaCha8Rng::seed_from_u64(seeds.master);
    run(
        geometry,
        |stage| {
            let seed = match stage {
                Stage::Region(kind) => Some(seeds.region(kind)),
                Stage::Transition(index) => seeds.transition(index),
            };
            seed.map(ChaCha8Rng::seed_from_u64)
        },
        &mut fallback,
    )
}

/// Validate parameters, resolve geometry and generate from a master seed.
///
/// Nothing is generated when validation fails.
pub fn generate_from_params(params: &BoneParams, seed: u64) -> Result<Distribution, DistributionError> {
    let geometry = BoneGeometry::build(params)?;
    Ok(generate_seeded(&geometry, &DistributionSeeds::from_master(seed)))
}

#[derive(Clone, Copy)]
enum Stage {
    Region(RegionKind),
    Transition(usize),
}

/// Shared linear pass. `stage_rng` may supply a dedicated generator for a
/// stage; otherwise `rng` is used.
fn run<R, F>(geometry: &BoneGeometry, mut stage_rng: F, rng: &mut R) -> Distribution
where
    R: Rng,
    F: FnMut(Stage) -> Option<ChaCha8Rng>,
{
    let regions = &geometry.regions;
    let mut structures = Vec::new();
    let mut counts = Vec::with_capacity(regions.len());

    for (i, region) in regions.iter().enumerate() {
        let own = match stage_rng(Stage::Region(region.kind)) {
            Some(mut dedicated) => populate_region(region, &mut dedicated),
            None => populate_region(region, rng),
        };
        let regular = own.len();
        structures.extend(own);

        let mut transition_after = 0;
        if let Some(next) = regions.get(i + 1) {
            let seam = match stage_rng(Stage::Transition(i)) {
                Some(mut dedicated) => transition::blend(region, next, geometry.total_length, &mut dedicated),
                None => transition::blend(region, next, geometry.total_length, rng),
            };
            transition_after = seam.len();
            structures.extend(seam);
        }

        info!(
            "{}: {} structures ({} in following transition)",
            region.kind, regular, transition_after
        );
        counts.push(RegionCount {
            kind: region.kind,
            regular,
            transition_after,
        });
    }

    info!("Generated {} structures in total", structures.len());

    Distribution {
        geometry: geometry.clone(),
        structures,
        counts,
    }
}
