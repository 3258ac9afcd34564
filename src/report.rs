//! Per-region statistics and the human-readable summary

use serde::Serialize;

use crate::density::{cortical_area, expected_count};
use crate::engine::Distribution;
use crate::params::RegionKind;

/// Statistics for one region
#[derive(Clone, Debug, Serialize)]
pub struct RegionSummary {
    pub kind: RegionKind,
    pub start: f64,
    pub end: f64,
    pub length: f64,
    pub percent: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub cortical_area: f64,
    pub areal_density: f64,
    pub expected_count: usize,
    /// Structures placed inside the region
    pub generated: usize,
    /// Transition structures labelled with this region
    pub transition_labelled: usize,
    pub mean_size: f64,
    pub variability: f64,
}

/// Summary of a whole run
#[derive(Clone, Debug, Serialize)]
pub struct DistributionSummary {
    pub total_length: f64,
    pub regions: Vec<RegionSummary>,
    pub total_cortical_area: f64,
    /// Sum of the regions' expected counts (transitions excluded)
    pub computed_total: usize,
    /// Everything generated, transitions included
    pub generated_total: usize,
    /// Structures per label, in order of first appearance
    pub label_counts: Vec<(String, usize)>,
}

impl DistributionSummary {
    pub fn from_distribution(dist: &Distribution) -> Self {
        let mut regions = Vec::with_capacity(dist.geometry.regions.len());
        for (region, count) in dist.geometry.regions.iter().zip(&dist.counts) {
            let transition_labelled = dist
                .structures
                .iter()
                .filter(|s| s.is_transition() && s.label.region == region.kind)
                .count();
            regions.push(RegionSummary {
                kind: region.kind,
                start: region.start,
                end: region.end,
                length: region.length,
                percent: region.percent,
                outer_radius: region.outer_radius,
                inner_radius: region.inner_radius,
                cortical_area: cortical_area(region),
                areal_density: region.areal_density,
                expected_count: expected_count(region),
                generated: count.regular,
                transition_labelled,
                mean_size: region.mean_size,
                variability: region.variability,
            });
        }

        let mut label_counts: Vec<(String, usize)> = Vec::new();
        for structure in &dist.structures {
            let label = structure.label.to_string();
            match label_counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, n)) => *n += 1,
                None => label_counts.push((label, 1)),
            }
        }

        Self {
            total_length: dist.geometry.total_length,
            total_cortical_area: regions.iter().map(|r| r.cortical_area).sum(),
            computed_total: regions.iter().map(|r| r.expected_count).sum(),
            generated_total: dist.structures.len(),
            regions,
            label_counts,
        }
    }

    /// Generated structures per unit cortical area
    pub fn mean_density(&self) -> f64 {
        if self.total_cortical_area > 0.0 {
            self.generated_total as f64 / self.total_cortical_area
        } else {
            0.0
        }
    }

    /// Render the plain-text report
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    fn write_text<W: std::fmt::Write>(&self, out: &mut W) -> std::fmt::Result {
        writeln!(out, "OSTEON DISTRIBUTION")?;
        writeln!(out, "{}", "=".repeat(50))?;
        writeln!(out)?;
        writeln!(out, "Total bone length: {:.2} cm", self.total_length)?;
        writeln!(out)?;

        for r in &self.regions {
            writeln!(out, "Region: {}", r.kind)?;
            writeln!(out, "  - Start: {:.2} cm", r.start)?;
            writeln!(out, "  - End: {:.2} cm", r.end)?;
            writeln!(out, "  - Length: {:.2} cm ({:.1}%)", r.length, r.percent)?;
            if r.inner_radius > 0.0 {
                writeln!(out, "  - Radius: {:.2} cm (inner {:.2} cm)", r.outer_radius, r.inner_radius)?;
            } else {
                writeln!(out, "  - Radius: {:.2} cm", r.outer_radius)?;
            }
            writeln!(out, "  - Cortical area: {:.2} cm²", r.cortical_area)?;
            writeln!(out, "  - Density: {:.0} structures/cm²", r.areal_density)?;
            writeln!(out, "  - Computed structures: {}", r.expected_count)?;
            writeln!(out, "  - Generated structures: {}", r.generated)?;
            writeln!(out, "  - Transition structures: {}", r.transition_labelled)?;
            writeln!(out, "  - Mean size: {:.1} µm", r.mean_size)?;
            writeln!(out, "  - Variability: {:.2}", r.variability)?;
            writeln!(out)?;
        }

        writeln!(out, "TOTALS")?;
        writeln!(out, "{}", "=".repeat(30))?;
        writeln!(out, "Total cortical area: {:.2} cm²", self.total_cortical_area)?;
        writeln!(out, "Computed structures: {}", self.computed_total)?;
        writeln!(out, "Generated structures: {}", self.generated_total)?;
        writeln!(out, "Mean density: {:.0} structures/cm²", self.mean_density())?;
        writeln!(out)?;

        writeln!(out, "DISTRIBUTION BY LABEL:")?;
        for (label, count) in &self.label_counts {
            let pct = if self.generated_total > 0 {
                100.0 * *count as f64 / self.generated_total as f64
            } else {
                0.0
            };
            writeln!(out, "  - {}: {} ({:.1}%)", label, count, pct)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for DistributionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_text(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::generate_from_params;
    use crate::params::BoneParams;

    fn summary() -> DistributionSummary {
        let mut params = BoneParams::cortical_shell();
        for region in params.regions.iter_mut() {
            region.areal_density /= 10.0;
        }
        let dist = generate_from_params(&params, 77).unwrap();
        DistributionSummary::from_distribution(&dist)
    }

    #[test]
    fn test_totals_consistent() {
        let s = summary();
        let generated: usize = s.regions.iter().map(|r| r.generated + r.transition_labelled).sum();
        assert_eq!(generated, s.generated_total);
        assert_eq!(s.label_counts.iter().map(|(_, n)| n).sum::<usize>(), s.generated_total);
        for r in &s.regions {
            assert_eq!(r.generated, r.expected_count);
        }
        assert_eq!(s.computed_total, s.regions.iter().map(|r| r.generated).sum::<usize>());
        assert!(s.mean_density() > 0.0);
    }

    #[test]
    fn test_labels_in_first_appearance_order() {
        let s = summary();
        assert_eq!(s.label_counts[0].0, "Proximal Epiphysis");
        assert!(s.label_counts.iter().any(|(l, _)| l == "Diaphysis (transition)"));
    }

    #[test]
    fn test_text_report() {
        let text = summary().to_text();
        assert!(text.contains("Total bone length: 45.00 cm"));
        assert!(text.contains("Region: Diaphysis"));
        assert!(text.contains("(inner 0.55 cm)"));
        assert!(text.contains("DISTRIBUTION BY LABEL:"));
    }

    #[test]
    fn test_display_matches_text() {
        let s = summary();
        let shown = format!("{}", s);
        assert_eq!(shown, s.to_text());
        assert!(shown.ends_with(")\n"));
    }
}
