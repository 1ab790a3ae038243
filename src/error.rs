//! Typed error seam between the scene parser / CLI and the render pipeline —
//! grounded on `POPOBE97-node-forge-render-server/src/renderer/camera.rs`'s
//! `anyhow`/typed-error-at-the-seam idiom, narrowed to a concrete
//! `thiserror` enum since this crate's error surface (spec §7) is small and
//! closed rather than a DSL-resolution graph.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not read scene file '{path}': {source}")]
    SceneIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write output image '{path}': {source}")]
    OutputIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scene file: {0}")]
    Parse(String),

    #[error("image encode error: {0}")]
    Encode(#[from] image::ImageError),
}
