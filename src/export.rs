use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use ndarray_npy::NpzWriter;

use crate::{
    error::{ModelError, Result},
    gui::pipeline::VelocityModel,
    picking::PickSession,
    utils::PickedPoint,
};

pub const SOURCE_LABEL: &str = "SRC";
pub const STATION_LABEL: &str = "ST";

/// Writes `vel`, `x` and `y` (the depth axis) into a compressed `.npz`
/// archive.
pub fn write_velocity_npz(path: &Path, model: &VelocityModel) -> Result<()> {
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let mut npz = NpzWriter::new_compressed(BufWriter::new(file));
    npz.add_array("vel", &model.vel)?;
    npz.add_array("x", &model.x)?;
    npz.add_array("y", &model.z)?;
    let mut writer = npz.finish()?;
    writer.flush().map_err(|source| io_error(path, source))?;
    Ok(())
}

/// Writes one `LABELi\tx\tz` row per point, numbered from 1.
pub fn write_points(path: &Path, label: &str, points: &[PickedPoint]) -> Result<()> {
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let mut out = BufWriter::new(file);
    for (i, point) in points.iter().enumerate() {
        writeln!(out, "{}", format_point_row(label, i + 1, point))
            .map_err(|source| io_error(path, source))?;
    }
    out.flush().map_err(|source| io_error(path, source))
}

pub fn format_point_row(label: &str, index: usize, point: &PickedPoint) -> String {
    format!("{label}{index}\t{:?}\t{:?}", point.x, point.z)
}

fn io_error(path: &Path, source: std::io::Error) -> ModelError {
    ModelError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Output paths as typed in the settings panel. Empty means "skip".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub velocity: String,
    pub sources: String,
    pub stations: String,
}

/// Files actually written by [`save_outputs`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub written: Vec<PathBuf>,
}

impl SaveReport {
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}

/// Writes every output whose path is set.
///
/// The point files are only written when their list is non-empty. An empty
/// report means the user had nothing to save.
pub fn save_outputs(
    paths: &OutputPaths,
    model: &VelocityModel,
    picks: &PickSession,
) -> Result<SaveReport> {
    let mut report = SaveReport::default();

    if let Some(path) = non_empty(&paths.velocity) {
        write_velocity_npz(path, model)?;
        report.written.push(path.to_path_buf());
    }

    let point_files = [
        (&paths.sources, SOURCE_LABEL, picks.sources()),
        (&paths.stations, STATION_LABEL, picks.stations()),
    ];
    for (path, label, points) in point_files {
        let Some(path) = non_empty(path) else {
            continue;
        };
        if points.is_empty() {
            continue;
        }
        write_points(path, label, points)?;
        report.written.push(path.to_path_buf());
    }

    for path in &report.written {
        tracing::info!("saved {}", path.display());
    }
    Ok(report)
}

fn non_empty(path: &str) -> Option<&Path> {
    let trimmed = path.trim();
    (!trimmed.is_empty()).then(|| Path::new(trimmed))
}
