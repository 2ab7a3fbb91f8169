use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or exporting a velocity model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write velocity archive: {0}")]
    Npz(#[from] ndarray_npy::WriteNpzError),

    #[error("invalid value {value:?} for {field}: {reason}")]
    InvalidParameter {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("grid must have at least one sample along each axis (nx={nx}, nz={nz})")]
    EmptyGrid { nx: u32, nz: u32 },
}

pub type Result<T> = std::result::Result<T, ModelError>;
