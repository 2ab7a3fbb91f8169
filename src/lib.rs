//! Turns a scanned cross-section into a gridded velocity model and lets the
//! user pick sources and stations on it.

pub mod colormap;
pub mod config;
pub mod error;
pub mod export;
pub mod gui;
pub mod picking;
pub mod raster;
pub mod transformation;
pub mod utils;

pub use error::{ModelError, Result};
