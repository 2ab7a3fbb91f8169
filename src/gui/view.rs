use egui::{Color32, Stroke};
use egui_plot::{MarkerShape, Plot, PlotImage, PlotPoint, Points};

use crate::{
    colormap::{display_image, jet_r},
    gui::{app::AppState, pipeline::VelocityModel},
    picking::{ModelExtent, PickMode},
    utils::PickedPoint,
};

const COLORBAR_STEPS: usize = 64;

/// Depth grows downward on screen, so the plot works with `y = -z`.
pub fn plot_to_model(point: PlotPoint) -> PickedPoint {
    PickedPoint::new(point.x, -point.y)
}

pub fn model_to_plot(point: &PickedPoint) -> [f64; 2] {
    [point.x, -point.z]
}

fn format_tick(value: f64) -> String {
    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn colorbar_title(app_state: &AppState, model: &VelocityModel) -> String {
    if model.regridded {
        format!("velocity ({})", app_state.params.unit)
    } else {
        format!("Image Color ({})", app_state.params.unit)
    }
}

fn refresh_texture(ctx: &egui::Context, app_state: &mut AppState) {
    let Some(model) = &app_state.model else {
        return;
    };
    let (lo, hi) = model.value_range();
    let extent = ModelExtent::of(model);
    let raster = display_image(
        &model.vel,
        lo,
        hi,
        extent.is_x_reversed(),
        extent.is_z_reversed(),
        app_state.max_texture_side,
    );
    let size = [raster.width() as usize, raster.height() as usize];
    let image = egui::ColorImage::from_rgb(size, raster.as_raw());
    app_state.texture = Some(ctx.load_texture(
        "velocity_model",
        image,
        egui::TextureOptions::NEAREST,
    ));
    app_state.texture_dirty = false;
}

/// Draws the model, the picked points and a horizontal colorbar. A click on
/// the model is forwarded to the pick session.
pub fn show_model(ui: &mut egui::Ui, app_state: &mut AppState) {
    if app_state.texture_dirty || app_state.texture.is_none() {
        refresh_texture(ui.ctx(), app_state);
    }
    let (Some(model), Some(texture)) = (&app_state.model, &app_state.texture) else {
        return;
    };

    let extent = ModelExtent::of(model);
    let center = PlotPoint::new(
        0.5 * (extent.x_min + extent.x_max),
        -0.5 * (extent.z_min + extent.z_max),
    );
    let size = egui::vec2(extent.width().abs() as f32, extent.height().abs() as f32);

    let sources: Vec<[f64; 2]> = app_state.picks.sources().iter().map(model_to_plot).collect();
    let stations: Vec<[f64; 2]> = app_state.picks.stations().iter().map(model_to_plot).collect();
    let (lo, hi) = model.value_range();
    let title = colorbar_title(app_state, model);
    let texture_id = texture.id();

    let colorbar_height = 48.0;
    let plot_height = (ui.available_height() - colorbar_height).max(100.0);

    let response = Plot::new("velocity_plot")
        .height(plot_height)
        .data_aspect(1.0)
        .x_axis_label("x")
        .y_axis_label("z")
        .y_axis_formatter(|mark, _max_chars, _range| format_tick(-mark.value))
        .label_formatter(|_name, value| format!("x = {:.3}\nz = {:.3}", value.x, -value.y))
        .show(ui, |plot_ui| {
            plot_ui.image(PlotImage::new(texture_id, center, size));
            plot_ui.points(
                Points::new(sources)
                    .shape(MarkerShape::Asterisk)
                    .radius(6.0)
                    .color(Color32::RED)
                    .name("Sources"),
            );
            plot_ui.points(
                Points::new(stations)
                    .shape(MarkerShape::Down)
                    .filled(true)
                    .radius(6.0)
                    .color(Color32::WHITE)
                    .name("Stations"),
            );
            plot_ui.pointer_coordinate()
        });

    if response.response.clicked() && app_state.picks.mode() != PickMode::Idle {
        if let Some(pointer) = response.inner {
            app_state.picks.record(plot_to_model(pointer), &extent);
        }
    }

    ui_colorbar(ui, &title, lo, hi);
}

fn ui_colorbar(ui: &mut egui::Ui, title: &str, lo: f64, hi: f64) {
    ui.vertical_centered(|ui| {
        ui.label(title);
        let width = (ui.available_width() * 0.8).max(50.0);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 12.0), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let step = rect.width() / COLORBAR_STEPS as f32;
        for i in 0..COLORBAR_STEPS {
            let t = (i as f64 + 0.5) / COLORBAR_STEPS as f64;
            let [r, g, b] = jet_r(t);
            let left = rect.left() + step * i as f32;
            let cell = egui::Rect::from_min_max(
                egui::pos2(left, rect.top()),
                egui::pos2(left + step + 0.5, rect.bottom()),
            );
            painter.rect_filled(cell, 0.0, Color32::from_rgb(r, g, b));
        }
        painter.rect_stroke(rect, 0.0, Stroke::new(1.0, ui.visuals().text_color()));

        ui.horizontal(|ui| {
            ui.set_width(width);
            ui.label(format!("{lo:.3}"));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{hi:.3}"));
            });
        });
    });
}
