//! PNG visualization of a distribution.
//!
//! Left panel: longitudinal profile (z across, x up) with the bone outline
//! and region boundaries. Right panel: cross-section (x, y) of all structures.

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::engine::Distribution;
use crate::error::ExportError;
use crate::params::RegionKind;
use crate::structure::Structure;

const BACKGROUND: [u8; 3] = [255, 255, 255];
const OUTLINE: [u8; 3] = [160, 160, 160];
const BOUNDARY: [u8; 3] = [90, 90, 90];
const MARGIN: u32 = 16;

/// Image layout
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub profile_width: u32,
    pub height: u32,
    pub draw_outline: bool,
    pub draw_boundaries: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            profile_width: 1200,
            height: 400,
            draw_outline: true,
            draw_boundaries: true,
        }
    }
}

/// Base color per region
fn region_color(kind: RegionKind) -> [u8; 3] {
    match kind {
        RegionKind::ProximalEpiphysis => [31, 119, 180],
        RegionKind::ProximalMetaphysis => [44, 160, 44],
        RegionKind::Diaphysis => [214, 39, 40],
        RegionKind::DistalMetaphysis => [148, 103, 189],
        RegionKind::DistalEpiphysis => [255, 127, 14],
    }
}

fn structure_color(s: &Structure) -> [u8; 3] {
    let base = region_color(s.label.region);
    if s.is_transition() {
        lerp_color(base, BACKGROUND, 0.5)
    } else {
        base
    }
}

fn lerp_color(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t) as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t) as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t) as u8,
    ]
}

/// Maps bone coordinates into a pixel rectangle
struct Panel {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
}

impl Panel {
    /// `u` in [0, 1] across, `v` in [-1, 1] up
    fn pixel(&self, u: f64, v: f64) -> Option<(u32, u32)> {
        if !(0.0..=1.0).contains(&u) || !(-1.0..=1.0).contains(&v) {
            return None;
        }
        let px = self.x0 as f64 + u * (self.width - 1) as f64;
        let py = self.y0 as f64 + (1.0 - (v + 1.0) * 0.5) * (self.height - 1) as f64;
        Some((px.round() as u32, py.round() as u32))
    }
}

fn put(img: &mut RgbImage, p: Option<(u32, u32)>, color: [u8; 3]) {
    if let Some((x, y)) = p {
        if x < img.width() && y < img.height() {
            img.put_pixel(x, y, Rgb(color));
        }
    }
}

/// Render the two-panel image
pub fn render_distribution(dist: &Distribution, options: &RenderOptions) -> RgbImage {
    let height = options.height.max(2 * MARGIN + 2);
    let panel_h = height - 2 * MARGIN;
    let profile_w = options.profile_width.max(2 * MARGIN + 2) - 2 * MARGIN;
    let width = profile_w + panel_h + 4 * MARGIN;

    let mut img: RgbImage = ImageBuffer::from_pixel(width, height, Rgb(BACKGROUND));

    let geometry = &dist.geometry;
    let total = geometry.total_length;
    let max_r = geometry.max_outer_radius().max(f64::EPSILON) * 1.05;

    let profile = Panel { x0: MARGIN, y0: MARGIN, width: profile_w, height: panel_h };
    let section = Panel { x0: profile_w + 3 * MARGIN, y0: MARGIN, width: panel_h, height: panel_h };

    if options.draw_outline {
        for region in &geometry.regions {
            let steps = ((region.length / total) * profile_w as f64).ceil().max(1.0) as u32;
            for i in 0..=steps {
                let z = region.start + region.length * i as f64 / steps as f64;
                let u = z / total;
                for radius in [region.outer_radius, region.inner_radius] {
                    if radius <= 0.0 {
                        continue;
                    }
                    put(&mut img, profile.pixel(u, radius / max_r), OUTLINE);
                    put(&mut img, profile.pixel(u, -radius / max_r), OUTLINE);
                }
            }
        }
    }

    if options.draw_boundaries {
        for boundary in geometry.boundaries() {
            let u = boundary / total;
            for j in 0..panel_h {
                let v = 1.0 - 2.0 * j as f64 / (panel_h - 1).max(1) as f64;
                put(&mut img, profile.pixel(u, v), BOUNDARY);
            }
        }
    }

    for s in &dist.structures {
        let color = structure_color(s);
        put(&mut img, profile.pixel(s.position.z / total, s.position.x / max_r), color);
        let u = 0.5 * (s.position.x / max_r + 1.0);
        put(&mut img, section.pixel(u, s.position.y / max_r), color);
    }

    img
}

/// Render and save as PNG
pub fn export_png<P: AsRef<Path>>(
    dist: &Distribution,
    path: P,
    options: &RenderOptions,
) -> Result<(), ExportError> {
    render_distribution(dist, options).save(path)?;
    Ok(())
}
