//! Framebuffer-to-file and bitmap-texture-from-file encode/decode — grounded
//! on `kylejckson-PaintFE`'s `io.rs` (thin wrappers around the `image` crate,
//! errors surfaced as a typed result rather than unwrapped). PNG is the
//! default output container (spec §6 "`--output`, default `output.png`");
//! PPM P3 is kept as the original engine's native format for parity with
//! `original_source/src/ppm.cc`, deliberately WITHOUT its `normalize()`
//! dynamic-range rescale (spec §9).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::RenderError;

/// Writes an 8-bit RGB framebuffer (row-major, `width*height*3` bytes) to
/// `path`, inferring PNG vs. PPM from the extension; anything else falls
/// back to PNG.
pub fn write_framebuffer(path: &Path, width: u32, height: u32, pixels: &[u8]) -> Result<(), RenderError> {
    match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
        Some("ppm") => write_ppm(path, width, height, pixels),
        _ => write_png(path, width, height, pixels),
    }
}

fn write_png(path: &Path, width: u32, height: u32, pixels: &[u8]) -> Result<(), RenderError> {
    let buffer: RgbImage = ImageBuffer::from_raw(width, height, pixels.to_vec())
        .expect("framebuffer length must be width*height*3");
    buffer
        .save(path)
        .map_err(|e| match e {
            image::ImageError::IoError(io) => RenderError::OutputIo { path: path.to_path_buf(), source: io },
            other => RenderError::Encode(other),
        })
}

/// ASCII PPM (P3) — one header line, then `r g b` triples, matching the
/// original engine's `ppm.cc` output shape but never invoking its
/// `normalize()` rescale (spec §9: "no dynamic range rescale step exists").
fn write_ppm(path: &Path, width: u32, height: u32, pixels: &[u8]) -> Result<(), RenderError> {
    let file = File::create(path).map_err(|e| RenderError::OutputIo { path: path.to_path_buf(), source: e })?;
    let mut writer = BufWriter::new(file);
    let write_err = |e: std::io::Error| RenderError::OutputIo { path: path.to_path_buf(), source: e };

    writeln!(writer, "P3").map_err(write_err)?;
    writeln!(writer, "{} {}", width, height).map_err(write_err)?;
    writeln!(writer, "255").map_err(write_err)?;
    for chunk in pixels.chunks(3) {
        writeln!(writer, "{} {} {}", chunk[0], chunk[1], chunk[2]).map_err(write_err)?;
    }
    Ok(())
}

/// Decodes a bitmap/texmap pigment's backing image file, converting to RGB
/// (alpha, if any, is dropped — pigments carry their own `a` channel
/// separately).
pub fn load_rgb_image(path: &Path) -> Result<RgbImage, RenderError> {
    let dynamic = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) => RenderError::SceneIo { path: path.to_path_buf(), source: io },
        other => RenderError::Encode(other),
    })?;
    Ok(dynamic.to_rgb8())
}
