//! Inktrace - raster-to-vector brand asset pipeline
//!
//! Converts raster or vector artwork into clean, embeddable SVG icons and
//! logos with palette metadata. This library exposes modules for
//! integration testing; the `inktrace` binary is the CLI front-end.

pub mod error;
pub mod models;
pub mod services;
pub mod svg;
