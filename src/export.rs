//! Export of a distribution: CSV rows, a JSON document and a report bundle

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;
use serde::Serialize;

use crate::engine::Distribution;
use crate::error::ExportError;
use crate::geometry::BoneGeometry;
use crate::render::{export_png, RenderOptions};
use crate::report::DistributionSummary;
use crate::structure::{records_sorted_by_z, Structure, StructureRecord};

/// JSON document: resolved geometry plus every structure
#[derive(Serialize)]
pub struct DistributionDocument<'a> {
    pub bone: &'a BoneGeometry,
    pub structures: Vec<StructureRecord>,
}

/// Write one row per structure, sorted by z ascending
pub fn write_csv<P: AsRef<Path>>(structures: &[Structure], path: P) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records_sorted_by_z(structures) {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the geometry and the sorted structure list as pretty JSON
pub fn write_json<P: AsRef<Path>>(dist: &Distribution, path: P) -> Result<(), ExportError> {
    let document = DistributionDocument {
        bone: &dist.geometry,
        structures: records_sorted_by_z(&dist.structures),
    };
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.flush()?;
    Ok(())
}

/// Write the resolved geometry on its own
pub fn write_geometry<P: AsRef<Path>>(geometry: &BoneGeometry, path: P) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, geometry)?;
    writer.flush()?;
    Ok(())
}

/// Write the plain-text summary, stamped with the generation time
pub fn write_summary<P: AsRef<Path>>(summary: &DistributionSummary, path: P) -> Result<(), ExportError> {
    let mut file = File::create(path)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;
    file.write_all(summary.to_text().as_bytes())?;
    Ok(())
}

/// Write a complete report folder under `dir` and return its path.
///
/// The folder is named `osteon_report_<timestamp>` and holds
/// `structures.csv`, `configuration.json`, `summary.txt` and `profile.png`.
pub fn export_report<P: AsRef<Path>>(dist: &Distribution, dir: P) -> Result<PathBuf, ExportError> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let folder = dir.as_ref().join(format!("osteon_report_{}", stamp));
    fs::create_dir_all(&folder)?;

    write_csv(&dist.structures, folder.join("structures.csv"))?;
    write_geometry(&dist.geometry, folder.join("configuration.json"))?;
    write_summary(&DistributionSummary::from_distribution(dist), folder.join("summary.txt"))?;
    export_png(dist, folder.join("profile.png"), &RenderOptions::default())?;

    info!("Report written to {}", folder.display());
    Ok(folder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::generate_from_params;
    use crate::params::BoneParams;

    fn small() -> Distribution {
        let mut params = BoneParams::default();
        for region in params.regions.iter_mut() {
            region.areal_density /= 100.0;
        }
        generate_from_params(&params, 6).unwrap()
    }

    #[test]
    fn test_csv_sorted_with_header() {
        let dist = small();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&dist.structures, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["section_name", "position_x_cm", "position_y_cm", "position_z_cm", "size_um"]
        );

        let rows: Vec<StructureRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), dist.len());
        assert!(rows.windows(2).all(|w| w[0].position_z_cm <= w[1].position_z_cm));
    }

    #[test]
    fn test_json_document() {
        let dist = small();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&dist, &path).unwrap();

        let value: serde_json::Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(value["bone"]["total_length"], 45.0);
        assert_eq!(value["bone"]["regions"].as_array().unwrap().len(), 5);
        assert_eq!(value["bone"]["regions"][2]["kind"], "diaphysis");
        assert_eq!(value["structures"].as_array().unwrap().len(), dist.len());
    }

    #[test]
    fn test_report_bundle() {
        let dist = small();
        let dir = tempfile::tempdir().unwrap();
        let folder = export_report(&dist, dir.path()).unwrap();

        for name in ["structures.csv", "configuration.json", "summary.txt", "profile.png"] {
            assert!(folder.join(name).exists(), "missing {}", name);
        }
        let summary = fs::read_to_string(folder.join("summary.txt")).unwrap();
        assert!(summary.starts_with("Generated: "));
        assert!(summary.contains("OSTEON DISTRIBUTION"));
    }

    #[test]
    fn test_geometry_file_is_complete() {
        let dist = small();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geometry.json");
        write_geometry(&dist.geometry, &path).unwrap();

        let value: serde_json::Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(value["regions"].as_array().unwrap().len(), 5);
        assert_eq!(value["regions"][4]["end"], 45.0);
    }
}
