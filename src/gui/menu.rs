use crate::{
    error::Result,
    export::SaveReport,
    gui::{app::AppState, pipeline::ParamField},
    picking::PickMode,
};

/// Outcome of the Save button, shown as a native message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved,
    NothingSaved,
    Failed(String),
}

impl Notice {
    pub fn from_save(result: Result<SaveReport>) -> Self {
        match result {
            Ok(report) if report.is_empty() => Notice::NothingSaved,
            Ok(_) => Notice::Saved,
            Err(e) => Notice::Failed(e.to_string()),
        }
    }

    pub fn text(&self) -> String {
        match self {
            Notice::Saved => "Save is completed.".to_string(),
            Notice::NothingSaved => "Check the input, maybe the path is empty".to_string(),
            Notice::Failed(reason) => format!("Save failed: {reason}"),
        }
    }

    pub fn show(&self) {
        let (level, title) = match self {
            Notice::Saved => (rfd::MessageLevel::Info, "Information"),
            Notice::NothingSaved => (rfd::MessageLevel::Warning, "Warning"),
            Notice::Failed(_) => (rfd::MessageLevel::Error, "Error"),
        };
        let _ = rfd::MessageDialog::new()
            .set_level(level)
            .set_title(title)
            .set_description(self.text())
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

/// Helper function to encapsulate the file loading logic.
pub fn ui_load_image_button(ui: &mut egui::Ui, app_state: &mut AppState) {
    if ui.button("Load Image...").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Image Files", &["png", "jpg", "jpeg"])
            .pick_file()
        {
            match app_state.load_image(&path) {
                Ok(()) => {
                    app_state.config.image_path = Some(path);
                    if let Err(e) = app_state.config.save() {
                        tracing::warn!("could not store config: {}", e);
                    }
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    app_state.error_msg = Some(e.to_string());
                }
            }
        }
    }
}

/// One text field plus a "..." button opening a save dialog.
fn ui_output_path_row(
    ui: &mut egui::Ui,
    path: &mut String,
    hint: &str,
    title: &str,
    extensions: &[&str],
) {
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(path)
                .hint_text(hint)
                .desired_width(200.0),
        );
        if ui.button("...").clicked() {
            if let Some(chosen) = rfd::FileDialog::new()
                .set_title(title)
                .add_filter("Format File", extensions)
                .save_file()
            {
                *path = chosen.display().to_string();
            }
        }
    });
}

fn ui_output_paths(ui: &mut egui::Ui, app_state: &mut AppState) {
    let arrow = if app_state.show_save_panel { "⏷" } else { "⏵" };
    if ui
        .button(format!("{arrow} Path of Output Data"))
        .clicked()
    {
        app_state.show_save_panel = !app_state.show_save_panel;
    }

    if !app_state.show_save_panel {
        return;
    }

    egui::Frame::group(ui.style()).show(ui, |ui| {
        let paths = &mut app_state.output_paths;
        ui_output_path_row(
            ui,
            &mut paths.sources,
            "Source (*.src) path",
            "Save source file",
            &["src", "dat"],
        );
        ui_output_path_row(
            ui,
            &mut paths.stations,
            "Station (*.stat) path",
            "Save station file",
            &["stat", "dat"],
        );
        ui_output_path_row(
            ui,
            &mut paths.velocity,
            "2D Velocity (*.vel2d) path",
            "Save 2D velocity file",
            &["vel2d"],
        );
    });
}

fn ui_param_rows(ui: &mut egui::Ui, app_state: &mut AppState, id: &str, fields: &[ParamField]) {
    egui::Grid::new(id)
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            for &field in fields {
                ui.label(field.label());
                let draft = app_state.param_drafts.entry(field).or_default();
                let response = ui.add(egui::TextEdit::singleline(draft).desired_width(100.0));
                if response.lost_focus() {
                    app_state.commit_edit(field);
                }
                ui.end_row();
            }
        });
}

fn ui_parameter_tree(ui: &mut egui::Ui, app_state: &mut AppState) {
    egui::CollapsingHeader::new("Color")
        .default_open(true)
        .show(ui, |ui| {
            ui_param_rows(ui, app_state, "color_params", &ParamField::COLOR);
        });
    egui::CollapsingHeader::new("Grid")
        .default_open(true)
        .show(ui, |ui| {
            ui_param_rows(ui, app_state, "grid_params", &ParamField::GRID);
        });
}

fn ui_pick_buttons(ui: &mut egui::Ui, app_state: &mut AppState) {
    let mode = app_state.picks.mode();
    ui.horizontal(|ui| {
        if ui
            .selectable_label(mode == PickMode::Source, "Pick Source")
            .clicked()
        {
            app_state.arm_picking(PickMode::Source);
        }
        if ui
            .selectable_label(mode == PickMode::Station, "Pick Station")
            .clicked()
        {
            app_state.arm_picking(PickMode::Station);
        }
    });
    ui.label(format!(
        "Sources: {}   Stations: {}",
        app_state.picks.sources().len(),
        app_state.picks.stations().len()
    ));
}

pub fn populate_settings_menu(app_state: &mut AppState, ui: &mut egui::Ui) {
    ui.heading("Settings");
    ui_load_image_button(ui, app_state);
    if let Some(path) = &app_state.image_path {
        ui.label(egui::RichText::new(path.display().to_string()).small());
    }

    ui.separator();
    ui_output_paths(ui, app_state);

    ui.separator();
    ui_parameter_tree(ui, app_state);

    if let Some(err) = &app_state.error_msg {
        ui.label(egui::RichText::new(err).color(ui.style().visuals.error_fg_color));
    }

    ui.separator();
    if ui.button("Execute").clicked() {
        app_state.execute();
    }
    ui_pick_buttons(ui, app_state);

    ui.separator();
    if ui.button("Save").clicked() {
        app_state.pending_notice = Some(Notice::from_save(app_state.save()));
    }
}

pub fn populate_upload_menu(app_state: &mut AppState, ui: &mut egui::Ui) {
    ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
        ui.add_space(ui.available_height() * 0.4);
        ui.heading("Velocity Model Builder");
        ui.label("Please load an image to begin.");
        ui.add_space(10.0);
        ui_load_image_button(ui, app_state);
        if let Some(err) = &app_state.error_msg {
            ui.label(egui::RichText::new(err).color(ui.style().visuals.error_fg_color));
        }
    });
}
