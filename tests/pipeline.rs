use image::{GrayImage, Luma};
use velmodel::{
    gui::pipeline::{
        build_velocity_model, initial_model, EditOutcome, GridParams, ModelParams, ParamField,
        DEFAULT_UNIT,
    },
    utils::linspace,
    ModelError,
};

fn section() -> GrayImage {
    GrayImage::from_fn(8, 4, |x, y| Luma([10 + (x * 20 + y * 5) as u8]))
}

#[test]
fn linspace_includes_both_ends() {
    let axis = linspace(0.0, 4.0, 5);
    assert_eq!(axis.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);

    assert_eq!(linspace(2.5, 9.0, 1).to_vec(), vec![2.5]);
    assert!(linspace(0.0, 1.0, 0).is_empty());

    let odd = linspace(0.0, 1.0, 7);
    assert_eq!(odd[6], 1.0);

    let down = linspace(10.0, -2.0, 4);
    assert_eq!(down.to_vec(), vec![10.0, 6.0, 2.0, -2.0]);
}

#[test]
fn single_sample_axis_keeps_grid_bounds() {
    let img = section();
    let mut params = ModelParams::from_image(&img, DEFAULT_UNIT);
    params.grid.nx = 1;
    params.grid.x_max = 8.0;

    let model = build_velocity_model(&img, &params).unwrap();

    assert_eq!(model.x.to_vec(), vec![0.0]);
    assert_eq!(model.grid.x_min, 0.0);
    assert_eq!(model.grid.x_max, 8.0);
    assert_eq!(model.grid, params.grid);
}

#[test]
fn defaults_follow_the_image() {
    let img = section();
    let params = ModelParams::from_image(&img, DEFAULT_UNIT);

    assert_eq!(params.unit, "unitless");
    assert_eq!(params.min_color, 10.0);
    assert_eq!(params.max_color, (10 + 7 * 20 + 3 * 5) as f64);
    assert_eq!(params.grid, GridParams::from_image(8, 4));
    assert_eq!(params.grid.x_max, 8.0);
    assert_eq!(params.grid.nz, 4);
}

#[test]
fn initial_model_shows_raw_intensities() {
    let img = section();
    let params = ModelParams::from_image(&img, DEFAULT_UNIT);
    let model = initial_model(&img, &params).unwrap();

    assert!(!model.regridded);
    assert_eq!(model.vel.dim(), (4, 8));
    for (x, y, p) in img.enumerate_pixels() {
        assert_eq!(model.vel[[y as usize, x as usize]], p[0] as f64);
    }
}

#[test]
fn regrid_resamples_and_rescales() {
    let img = section();
    let mut params = ModelParams::from_image(&img, DEFAULT_UNIT);
    params.min_color = 1.5;
    params.max_color = 6.0;
    params.grid = GridParams {
        x_min: 0.0,
        x_max: 100.0,
        nx: 5,
        z_min: 0.0,
        z_max: 30.0,
        nz: 3,
    };

    let model = build_velocity_model(&img, &params).unwrap();

    assert!(model.regridded);
    assert_eq!((model.nz(), model.nx()), (3, 5));
    assert_eq!(model.x.to_vec(), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    assert_eq!(model.z.to_vec(), vec![0.0, 15.0, 30.0]);

    let (lo, hi) = model.value_range();
    assert!((lo - 1.5).abs() < 1e-9);
    assert!((hi - 6.0).abs() < 1e-9);
}

#[test]
fn flat_image_regrids_to_min_color() {
    let img = GrayImage::from_pixel(6, 6, Luma([90]));
    let mut params = ModelParams::from_image(&img, DEFAULT_UNIT);
    params.min_color = 2.0;
    params.max_color = 5.0;
    params.grid.nx = 3;
    params.grid.nz = 2;

    let model = build_velocity_model(&img, &params).unwrap();
    assert!(model.vel.iter().all(|&v| v == 2.0));
}

#[test]
fn zero_sized_grid_is_rejected() {
    let img = section();
    let mut params = ModelParams::from_image(&img, DEFAULT_UNIT);
    params.grid.nx = 0;

    let err = build_velocity_model(&img, &params).unwrap_err();
    assert!(matches!(err, ModelError::EmptyGrid { nx: 0, nz: 4 }));
}

#[test]
fn edits_are_classified() {
    let img = section();
    let mut params = ModelParams::from_image(&img, DEFAULT_UNIT);

    assert_eq!(
        params.apply_edit(ParamField::UnitColor, "unitless").unwrap(),
        EditOutcome::Unchanged
    );
    assert_eq!(
        params.apply_edit(ParamField::UnitColor, "km/s").unwrap(),
        EditOutcome::Relabel
    );
    assert_eq!(params.unit, "km/s");

    assert_eq!(
        params.apply_edit(ParamField::XGridNumber, " 12 ").unwrap(),
        EditOutcome::Regrid
    );
    assert_eq!(params.grid.nx, 12);

    assert_eq!(
        params.apply_edit(ParamField::ZMax, "2.5e3").unwrap(),
        EditOutcome::Regrid
    );
    assert_eq!(params.grid.z_max, 2500.0);
}

#[test]
fn bad_edits_leave_params_untouched() {
    let img = section();
    let mut params = ModelParams::from_image(&img, DEFAULT_UNIT);
    let before = params.clone();

    assert!(params.apply_edit(ParamField::ZGridNumber, "0").is_err());
    assert!(params.apply_edit(ParamField::XGridNumber, "-3").is_err());
    assert!(params.apply_edit(ParamField::MinColor, "fast").is_err());
    assert!(params.apply_edit(ParamField::XMin, "inf").is_err());

    assert_eq!(params, before);
}

#[test]
fn current_text_round_trips_through_edit() {
    let img = section();
    let mut params = ModelParams::from_image(&img, DEFAULT_UNIT);

    for field in ParamField::COLOR.into_iter().chain(ParamField::GRID) {
        let text = field.current_text(&params);
        assert_eq!(params.apply_edit(field, &text).unwrap(), EditOutcome::Unchanged);
    }
    assert_eq!(ParamField::MinColor.current_text(&params), "10.0");
    assert_eq!(ParamField::XGridNumber.current_text(&params), "8");
}
