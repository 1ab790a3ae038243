//! Command-line surface (spec §6/§10.3) — grounded on `kylejckson-PaintFE`'s
//! `cli.rs` (`clap`-derive `Args` struct, a `run(args) -> ExitCode` entry
//! point, eprintln-on-failure-then-`ExitCode::FAILURE` shape) and on
//! `POPOBE97-node-forge-render-server`'s `anyhow::Context`-wrapped top-level
//! error path.
//!
//! `--poisson`/`--super-sample` are modeled as plain `Option` fields (clap
//! cannot itself express "last flag wins" the way `ArgGroup` expresses
//! "exactly one"), and resolved by scanning the raw argv for whichever flag
//! name appears later, per spec §6/§10.3. Unknown `--flags` are dropped with
//! a `warn!` before the pre-filtered argv reaches clap, since clap's default
//! posture (hard error on unrecognized flags) is stricter than the spec's
//! documented leniency.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};

use crate::camera::Camera;
use crate::color::Color;
use crate::image_io;
use crate::parser;
use crate::render::{self, RenderSettings};
use crate::sampling::AaMode;

const KNOWN_LONG_FLAGS: &[&str] = &[
    "input",
    "output",
    "width",
    "height",
    "poisson",
    "super-sample",
    "orthogonal",
    "light-rays",
    "light-area",
    "reflect-rays",
    "transmit-rays",
    "recurse",
    "debug",
    "help",
    "version",
];

/// Offline CSG ray tracer.
#[derive(Parser, Debug)]
#[command(name = "raytracer", about = "Renders a scene file to an image via recursive ray tracing")]
pub struct CliArgs {
    /// Scene description file to render.
    #[arg(short, long, value_name = "SCENE")]
    pub input: PathBuf,

    /// Output image path (PNG unless the extension is `.ppm`).
    #[arg(short, long, value_name = "FILE", default_value = "output.png")]
    pub output: PathBuf,

    #[arg(long, default_value_t = 800)]
    pub width: u32,

    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Poisson-disk minimum sample distance for sub-pixel anti-aliasing.
    #[arg(long)]
    pub poisson: Option<f64>,

    /// Regular N x N sub-pixel sample grid.
    #[arg(long = "super-sample")]
    pub super_sample: Option<u32>,

    /// Use an orthographic projection instead of perspective.
    #[arg(long)]
    pub orthogonal: bool,

    /// Per-axis area-light sample count (0 = a single point sample).
    #[arg(long = "light-rays", default_value_t = 0)]
    pub light_rays: u32,

    /// Side length (sqrt of area) of the jittered light-sampling square.
    #[arg(long = "light-area", default_value_t = 0.0)]
    pub light_area: f64,

    #[arg(long = "reflect-rays", default_value_t = 0)]
    pub reflect_rays: u32,

    #[arg(long = "transmit-rays", default_value_t = 0)]
    pub transmit_rays: u32,

    /// Maximum reflection/transmission recursion depth.
    #[arg(long, default_value_t = 10)]
    pub recurse: u32,

    /// Force debug-level logging regardless of `RUST_LOG`.
    #[arg(long)]
    pub debug: bool,
}

/// Drops `--flag`/`--flag=value` tokens whose flag name isn't in
/// [`KNOWN_LONG_FLAGS`], logging a `warn!` for each, before handing the
/// remaining argv to clap (spec §6: "unknown flags are ignored with a
/// warning to the diagnostic stream").
fn filter_known_args(raw: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(raw.len());
    for tok in raw {
        if let Some(rest) = tok.strip_prefix("--") {
            let name = rest.split('=').next().unwrap_or(rest);
            if !KNOWN_LONG_FLAGS.contains(&name) {
                warn!("ignoring unrecognized flag '{}'", tok);
                continue;
            }
        }
        out.push(tok.clone());
    }
    out
}

/// Resolves `--poisson`/`--super-sample` to whichever was given last on the
/// raw command line (spec §6/§10.3), defaulting to the single center sample.
fn resolve_aa_mode(raw: &[String], poisson: Option<f64>, super_sample: Option<u32>) -> AaMode {
    let poisson_idx = raw.iter().rposition(|a| a == "--poisson" || a.starts_with("--poisson="));
    let super_idx = raw.iter().rposition(|a| a == "--super-sample" || a.starts_with("--super-sample="));

    let use_super = match (poisson_idx, super_idx) {
        (Some(p), Some(s)) => s > p,
        (None, Some(_)) => true,
        (Some(_), None) => false,
        (None, None) => return AaMode::Center,
    };

    if use_super {
        AaMode::Grid(super_sample.unwrap_or(1).max(1))
    } else {
        AaMode::Poisson { min_distance: poisson.unwrap_or(0.1).max(1e-6), seed: 0 }
    }
}

/// Parses argv, renders the requested scene, and writes the output image.
/// Returns an OS exit code rather than a `Result` so `main` stays a one-liner
/// (spec §6: "exit 0 on success, 1 on missing input file or parse failure").
pub fn run(raw_args: Vec<String>) -> ExitCode {
    let filtered = filter_known_args(&raw_args);
    let args = match CliArgs::try_parse_from(filtered) {
        Ok(args) => args,
        Err(err) => {
            err.print().ok();
            return ExitCode::FAILURE;
        }
    };

    if args.debug {
        log::set_max_level(log::LevelFilter::Debug);
    }

    match execute(&args, &raw_args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Top-level pipeline: read → parse → render → encode. Returns `anyhow::Result`
/// so every fallible step can attach the offending path as context (spec
/// §10.1) without the library's own `RenderError` needing to carry that
/// context itself.
fn execute(args: &CliArgs, raw_args: &[String]) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading scene file '{}'", args.input.display()))?;

    let base_dir = args.input.parent().unwrap_or_else(|| std::path::Path::new("."));
    let (camera_spec, scene) = parser::parse_scene(&source, base_dir)
        .with_context(|| format!("parsing scene file '{}'", args.input.display()))?;
    info!(
        "scene parsed: {} shapes, {} lights, {} pigments, {} surfaces",
        scene.shapes.len(),
        scene.lights.len(),
        scene.pigments.len(),
        scene.surfaces.len()
    );

    let camera = Camera::new(
        camera_spec.eye,
        camera_spec.look_at,
        camera_spec.up,
        camera_spec.fov_degrees,
        args.width,
        args.height,
        args.orthogonal,
    );

    let settings = RenderSettings {
        aa_mode: resolve_aa_mode(raw_args, args.poisson, args.super_sample),
        light_rays: args.light_rays,
        light_area_side: args.light_area,
        reflect_rays: args.reflect_rays,
        transmit_rays: args.transmit_rays,
        max_depth: args.recurse,
        fallback_color: Color::BLACK,
    };

    info!("render started: {}x{}", args.width, args.height);
    let start = Instant::now();
    let pixels = render::render(&scene, &camera, &settings);
    info!("render finished in {:.2?}", start.elapsed());

    image_io::write_framebuffer(&args.output, args.width, args.height, &pixels)
        .with_context(|| format!("writing output image '{}'", args.output.display()))
}
