use image::GrayImage;
use ndarray::{Array1, Array2};

use crate::{
    error::{ModelError, Result},
    raster::{gray_to_array, remap_to_range, resize_bicubic},
    transformation::intensity_range,
    utils::linspace,
};

pub const DEFAULT_UNIT: &str = "unitless";

/// Spatial sampling of the output model.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct GridParams {
    pub x_min: f64,
    pub x_max: f64,
    pub nx: u32,
    pub z_min: f64,
    pub z_max: f64,
    pub nz: u32,
}

impl GridParams {
    /// One cell per pixel, spanning `[0, width] x [0, height]`.
    pub fn from_image(width: u32, height: u32) -> Self {
        Self {
            x_min: 0.0,
            x_max: width as f64,
            nx: width,
            z_min: 0.0,
            z_max: height as f64,
            nz: height,
        }
    }

    pub fn x_axis(&self) -> Array1<f64> {
        linspace(self.x_min, self.x_max, self.nx as usize)
    }

    pub fn z_axis(&self) -> Array1<f64> {
        linspace(self.z_min, self.z_max, self.nz as usize)
    }
}

/// Everything the parameter tree edits.
#[derive(Debug, PartialEq, Clone)]
pub struct ModelParams {
    pub unit: String,
    pub min_color: f64,
    pub max_color: f64,
    pub grid: GridParams,
}

impl ModelParams {
    /// Defaults derived from the loaded image: its own intensity range and
    /// pixel grid.
    pub fn from_image(img: &GrayImage, unit: &str) -> Self {
        let (lo, hi) = intensity_range(img);
        Self {
            unit: unit.to_string(),
            min_color: lo as f64,
            max_color: hi as f64,
            grid: GridParams::from_image(img.width(), img.height()),
        }
    }

    /// Parses `text` into `field`.
    ///
    /// The caller regrids on [`EditOutcome::Regrid`]; a unit change only
    /// relabels the colorbar. Nothing is stored when parsing fails.
    pub fn apply_edit(&mut self, field: ParamField, text: &str) -> Result<EditOutcome> {
        let text = text.trim();
        if text == field.current_text(self) {
            return Ok(EditOutcome::Unchanged);
        }

        match field {
            ParamField::UnitColor => {
                self.unit = text.to_string();
                return Ok(EditOutcome::Relabel);
            }
            ParamField::MinColor => self.min_color = parse_float(field, text)?,
            ParamField::MaxColor => self.max_color = parse_float(field, text)?,
            ParamField::XGridNumber => self.grid.nx = parse_count(field, text)?,
            ParamField::ZGridNumber => self.grid.nz = parse_count(field, text)?,
            ParamField::XMin => self.grid.x_min = parse_float(field, text)?,
            ParamField::XMax => self.grid.x_max = parse_float(field, text)?,
            ParamField::ZMin => self.grid.z_min = parse_float(field, text)?,
            ParamField::ZMax => self.grid.z_max = parse_float(field, text)?,
        }

        Ok(EditOutcome::Regrid)
    }
}

/// Result of committing one parameter edit.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EditOutcome {
    Unchanged,
    Relabel,
    Regrid,
}

/// Rows of the parameter tree, grouped the way they are displayed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ParamField {
    UnitColor,
    MinColor,
    MaxColor,
    XGridNumber,
    ZGridNumber,
    XMin,
    XMax,
    ZMin,
    ZMax,
}

impl ParamField {
    pub const COLOR: [ParamField; 3] = [Self::UnitColor, Self::MinColor, Self::MaxColor];
    pub const GRID: [ParamField; 6] = [
        Self::XGridNumber,
        Self::ZGridNumber,
        Self::XMin,
        Self::XMax,
        Self::ZMin,
        Self::ZMax,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::UnitColor => "Unit Color",
            Self::MinColor => "Min Color",
            Self::MaxColor => "Max Color",
            Self::XGridNumber => "X Grid Number",
            Self::ZGridNumber => "Z Grid Number",
            Self::XMin => "X Min",
            Self::XMax => "X Max",
            Self::ZMin => "Z Min",
            Self::ZMax => "Z Max",
        }
    }

    pub fn current_text(self, params: &ModelParams) -> String {
        match self {
            Self::UnitColor => params.unit.clone(),
            Self::MinColor => format_value(params.min_color),
            Self::MaxColor => format_value(params.max_color),
            Self::XGridNumber => params.grid.nx.to_string(),
            Self::ZGridNumber => params.grid.nz.to_string(),
            Self::XMin => format_value(params.grid.x_min),
            Self::XMax => format_value(params.grid.x_max),
            Self::ZMin => format_value(params.grid.z_min),
            Self::ZMax => format_value(params.grid.z_max),
        }
    }
}

/// Shortest round-trip form, keeping a trailing `.0` on integral values.
pub fn format_value(v: f64) -> String {
    format!("{v:?}")
}

fn parse_float(field: ParamField, text: &str) -> Result<f64> {
    let value: f64 = text.parse().map_err(|e: std::num::ParseFloatError| {
        ModelError::InvalidParameter {
            field: field.label(),
            value: text.to_string(),
            reason: e.to_string(),
        }
    })?;
    if !value.is_finite() {
        return Err(ModelError::InvalidParameter {
            field: field.label(),
            value: text.to_string(),
            reason: "value must be finite".to_string(),
        });
    }
    Ok(value)
}

fn parse_count(field: ParamField, text: &str) -> Result<u32> {
    let value: u32 = text.parse().map_err(|e: std::num::ParseIntError| {
        ModelError::InvalidParameter {
            field: field.label(),
            value: text.to_string(),
            reason: e.to_string(),
        }
    })?;
    if value == 0 {
        return Err(ModelError::InvalidParameter {
            field: field.label(),
            value: text.to_string(),
            reason: "grid number must be positive".to_string(),
        });
    }
    Ok(value)
}

/// A velocity grid together with its sample axes.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityModel {
    /// `(nz, nx)` values, row 0 at `z[0]`.
    pub vel: Array2<f64>,
    pub x: Array1<f64>,
    pub z: Array1<f64>,
    /// Bounds the model was built on. Unlike the axes they keep their span
    /// when a grid number is 1.
    pub grid: GridParams,
    /// `false` while the model still shows raw image intensities.
    pub regridded: bool,
}

impl VelocityModel {
    pub fn nx(&self) -> usize {
        self.vel.ncols()
    }

    pub fn nz(&self) -> usize {
        self.vel.nrows()
    }

    /// `(min, max)` of the stored values, `(0, 0)` for an empty grid.
    pub fn value_range(&self) -> (f64, f64) {
        if self.vel.is_empty() {
            return (0.0, 0.0);
        }
        self.vel
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Resizes `image` onto the grid and stretches its intensities over
/// `[min_color, max_color]`.
pub fn build_velocity_model(image: &GrayImage, params: &ModelParams) -> Result<VelocityModel> {
    let GridParams { nx, nz, .. } = params.grid;
    if nx == 0 || nz == 0 {
        return Err(ModelError::EmptyGrid { nx, nz });
    }

    let resized = resize_bicubic(image, nx, nz);
    let vel = remap_to_range(&gray_to_array(&resized), params.min_color, params.max_color);

    tracing::debug!(
        "built {}x{} model over [{}, {}]",
        nx,
        nz,
        params.min_color,
        params.max_color
    );

    Ok(VelocityModel {
        vel,
        x: params.grid.x_axis(),
        z: params.grid.z_axis(),
        grid: params.grid,
        regridded: true,
    })
}

/// The model shown right after an image is loaded: raw intensities on the
/// default pixel grid.
pub fn initial_model(image: &GrayImage, params: &ModelParams) -> Result<VelocityModel> {
    let mut model = build_velocity_model(image, params)?;
    model.regridded = false;
    Ok(model)
}
