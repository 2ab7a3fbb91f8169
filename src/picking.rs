use crate::{gui::pipeline::VelocityModel, utils::PickedPoint};

/// Which list a click on the model is appended to.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum PickMode {
    #[default]
    Idle,
    Source,
    Station,
}

/// Spatial bounds of the displayed model.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ModelExtent {
    pub x_min: f64,
    pub x_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl ModelExtent {
    pub fn of(model: &VelocityModel) -> Self {
        let grid = &model.grid;
        Self {
            x_min: grid.x_min,
            x_max: grid.x_max,
            z_min: grid.z_min,
            z_max: grid.z_max,
        }
    }

    /// Inclusive containment; reversed bounds (e.g. `x_min > x_max`) are
    /// handled.
    pub fn contains(&self, point: PickedPoint) -> bool {
        let within = |v: f64, a: f64, b: f64| v >= a.min(b) && v <= a.max(b);
        within(point.x, self.x_min, self.x_max) && within(point.z, self.z_min, self.z_max)
    }

    pub fn is_x_reversed(&self) -> bool {
        self.x_min > self.x_max
    }

    pub fn is_z_reversed(&self) -> bool {
        self.z_min > self.z_max
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.z_max - self.z_min
    }
}

/// Sources and stations picked on the current model.
#[derive(Debug, Default, Clone)]
pub struct PickSession {
    mode: PickMode,
    sources: Vec<PickedPoint>,
    stations: Vec<PickedPoint>,
}

impl PickSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> PickMode {
        self.mode
    }

    /// Redirects subsequent clicks. Points already picked are kept.
    pub fn arm(&mut self, mode: PickMode) {
        if self.mode != mode {
            tracing::debug!("pick mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Appends `point` to the armed list. Returns `false` when nothing is
    /// armed or the click fell outside the model.
    pub fn record(&mut self, point: PickedPoint, extent: &ModelExtent) -> bool {
        if !extent.contains(point) {
            return false;
        }

        let list = match self.mode {
            PickMode::Idle => return false,
            PickMode::Source => &mut self.sources,
            PickMode::Station => &mut self.stations,
        };
        list.push(point);
        tracing::debug!(
            "picked {:?} #{} at ({}, {})",
            self.mode,
            list.len(),
            point.x,
            point.z
        );
        true
    }

    /// Drops every pick and disarms. Called whenever the grid changes.
    pub fn reset(&mut self) {
        self.mode = PickMode::Idle;
        self.sources.clear();
        self.stations.clear();
    }

    pub fn sources(&self) -> &[PickedPoint] {
        &self.sources
    }

    pub fn stations(&self) -> &[PickedPoint] {
        &self.stations
    }
}
