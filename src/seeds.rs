//! Seed management for distribution runs
//!
//! Every region and every transition zone draws from its own generator,
//! derived from one master seed. Changing one region's parameters therefore
//! leaves the other regions' structures untouched.
//!
//! Sub-seeds come from a fixed SplitMix64 mix rather than `std`'s hasher, so a
//! printed master seed reproduces the same population on any toolchain.

use crate::params::{RegionKind, REGION_COUNT};

/// Number of internal boundaries between regions
pub const TRANSITION_COUNT: usize = REGION_COUNT - 1;

/// Seeds for each sampling stage of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistributionSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// One seed per region, proximal to distal
    pub regions: [u64; REGION_COUNT],
    /// One seed per boundary; index `i` is the seam after region `i`
    pub transitions: [u64; TRANSITION_COUNT],
}

impl DistributionSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            regions: RegionKind::ALL.map(|kind| derive_seed(master, kind.index() as u64)),
            transitions: std::array::from_fn(|i| derive_seed(master, (REGION_COUNT + i) as u64)),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> DistributionSeedsBuilder {
        DistributionSeedsBuilder::new(master)
    }

    pub fn region(&self, kind: RegionKind) -> u64 {
        self.regions[kind.index()]
    }

    /// Seed for the seam following region `index`
    pub fn transition(&self, index: usize) -> Option<u64> {
        self.transitions.get(index).copied()
    }
}

impl Default for DistributionSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Builder for pinning individual seeds while deriving others from master
pub struct DistributionSeedsBuilder {
    seeds: DistributionSeeds,
}

impl DistributionSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: DistributionSeeds::from_master(master),
        }
    }

    /// Override one region's seed
    pub fn region(mut self, kind: RegionKind, seed: u64) -> Self {
        self.seeds.regions[kind.index()] = seed;
        self
    }

    /// Override the seed of the seam after region `index`
    pub fn transition(mut self, index: usize, seed: u64) -> Self {
        if let Some(slot) = self.seeds.transitions.get_mut(index) {
            *slot = seed;
        }
        self
    }

    pub fn build(self) -> DistributionSeeds {
        self.seeds
    }
}

/// SplitMix64 increment
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 output function
fn splitmix64(state: u64) -> u64 {
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Sub-seed for a stage: output `stage + 1` of a SplitMix64 stream started at `master`.
///
/// Regions use stages 0..5, seams 5..9.
fn derive_seed(master: u64, stage: u64) -> u64 {
    splitmix64(master.wrapping_add(GOLDEN_GAMMA.wrapping_mul(stage + 1)))
}

impl std::fmt::Display for DistributionSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DistributionSeeds {{ master: {}, regions: [", self.master)?;
        for (i, seed) in self.regions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", seed)?;
        }
        write!(f, "], transitions: [")?;
        for (i, seed) in self.transitions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", seed)?;
        }
        write!(f, "] }}")
    }
}
