use ndarray::{array, Array2};
use velmodel::colormap::{display_image, jet, jet_r, normalize, render_model};

#[test]
fn jet_runs_blue_to_red() {
    assert_eq!(jet(0.0), [0, 0, 128]);
    assert_eq!(jet(0.5), [128, 255, 128]);
    assert_eq!(jet(1.0), [128, 0, 0]);
}

#[test]
fn jet_r_is_reversed() {
    assert_eq!(jet_r(0.0), jet(1.0));
    assert_eq!(jet_r(0.25), jet(0.75));
    assert_eq!(jet_r(2.0), jet(0.0));
}

#[test]
fn normalize_handles_flat_range() {
    assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
    assert_eq!(normalize(-1.0, 0.0, 10.0), 0.0);
    assert_eq!(normalize(3.0, 3.0, 3.0), 0.0);
}

#[test]
fn rendered_pixels_follow_row_major_order() {
    let values = array![[0.0, 1.0], [1.0, 0.0]];
    let pixels = render_model(&values, 0.0, 1.0);

    assert_eq!(pixels.len(), 4);
    assert_eq!(pixels[0], jet_r(0.0));
    assert_eq!(pixels[1], jet_r(1.0));
    assert_eq!(pixels[3], jet_r(0.0));
}

#[test]
fn display_image_keeps_small_models() {
    let values = array![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]];
    let img = display_image(&values, 0.0, 5.0, false, false, 8192);

    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(0, 0).0, jet_r(0.0));
    assert_eq!(img.get_pixel(2, 1).0, jet_r(1.0));
}

#[test]
fn display_image_shrinks_to_the_texture_limit() {
    let values = Array2::from_shape_fn((50, 1000), |(r, c)| (r + c) as f64);
    let img = display_image(&values, 0.0, 1049.0, false, false, 256);

    let (width, height) = img.dimensions();
    assert_eq!(width, 256);
    assert_eq!(height, 13);

    let tall = Array2::<f64>::zeros((5000, 1));
    let img = display_image(&tall, 0.0, 1.0, false, false, 100);
    assert_eq!(img.dimensions(), (1, 100));
}

#[test]
fn display_image_mirrors_reversed_axes() {
    let values = array![[0.0, 1.0], [2.0, 3.0]];

    let x_flipped = display_image(&values, 0.0, 3.0, true, false, 8192);
    assert_eq!(x_flipped.get_pixel(0, 0).0, jet_r(normalize(1.0, 0.0, 3.0)));
    assert_eq!(x_flipped.get_pixel(1, 0).0, jet_r(0.0));

    let z_flipped = display_image(&values, 0.0, 3.0, false, true, 8192);
    assert_eq!(z_flipped.get_pixel(0, 0).0, jet_r(normalize(2.0, 0.0, 3.0)));
    assert_eq!(z_flipped.get_pixel(1, 1).0, jet_r(normalize(1.0, 0.0, 3.0)));
}
