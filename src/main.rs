//! Binary entry point — parses argv, initializes logging, and hands off to
//! [`raytracer::cli::run`]. Kept a one-liner per `kylejckson-PaintFE`'s
//! `fn main` / `cli::run(args) -> ExitCode` split.

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    raytracer::cli::run(std::env::args().collect())
}
