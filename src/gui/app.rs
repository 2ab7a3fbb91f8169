use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use egui_wgpu::wgpu;
use egui_wgpu::Renderer as EguiRenderer;
use egui_winit::winit::{
    self,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::Window,
};
use egui_winit::State as EguiState;
use image::GrayImage;

use crate::{
    colormap::DEFAULT_MAX_TEXTURE_SIDE,
    config::AppConfig,
    error::Result,
    export::{save_outputs, OutputPaths, SaveReport},
    gui::{
        menu::{populate_settings_menu, populate_upload_menu, Notice},
        pipeline::{
            build_velocity_model, initial_model, EditOutcome, GridParams, ModelParams, ParamField,
            VelocityModel,
        },
        view::show_model,
    },
    picking::{PickMode, PickSession},
    transformation::load_grayscale,
};

// This struct manages all the wgpu-related state.
struct RenderState {
    _window: Arc<Window>, // Store the Arc to keep the window alive
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    max_texture_side: usize,
}

impl RenderState {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter can present to this window")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no texture formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let max_texture_side = device.limits().max_texture_dimension_2d as usize;

        Ok(Self {
            _window: window,
            surface,
            device,
            queue,
            config,
            size,
            max_texture_side,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }
}

/// Everything the window shows and edits.
pub struct AppState {
    pub config: AppConfig,

    // --- Data ---
    pub image: Option<GrayImage>,
    pub image_path: Option<PathBuf>,
    pub params: ModelParams,
    pub model: Option<VelocityModel>,
    pub picks: PickSession,

    // --- Panel state ---
    /// Text buffers of the parameter tree, committed on focus loss.
    pub param_drafts: HashMap<ParamField, String>,
    pub output_paths: OutputPaths,
    pub show_save_panel: bool,
    pub error_msg: Option<String>,
    pub pending_notice: Option<Notice>,

    // --- Display ---
    pub texture: Option<egui::TextureHandle>,
    pub texture_dirty: bool,
    /// Largest texture side the GPU accepts. Bigger models are shrunk for
    /// display only.
    pub max_texture_side: usize,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let params = ModelParams {
            unit: config.default_unit.clone(),
            min_color: 0.0,
            max_color: 0.0,
            grid: GridParams::from_image(0, 0),
        };
        Self {
            config,
            image: None,
            image_path: None,
            params,
            model: None,
            picks: PickSession::new(),
            param_drafts: HashMap::new(),
            output_paths: OutputPaths::default(),
            show_save_panel: false,
            error_msg: None,
            pending_notice: None,
            texture: None,
            texture_dirty: false,
            max_texture_side: DEFAULT_MAX_TEXTURE_SIDE,
        }
    }

    pub fn load_image(&mut self, path: &Path) -> Result<()> {
        let gray = load_grayscale(path)?;
        self.set_image(gray)?;
        self.image_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Installs a new source image and resets every parameter to the
    /// image-derived defaults.
    pub fn set_image(&mut self, gray: GrayImage) -> Result<()> {
        let params = ModelParams::from_image(&gray, &self.config.default_unit);
        let model = initial_model(&gray, &params)?;
        self.image = Some(gray);
        self.params = params;
        self.model = Some(model);
        self.picks.reset();
        self.error_msg = None;
        self.texture_dirty = true;
        self.sync_drafts();
        Ok(())
    }

    /// Resets every text buffer to the committed parameter value.
    pub fn sync_drafts(&mut self) {
        for field in ParamField::COLOR.into_iter().chain(ParamField::GRID) {
            self.param_drafts
                .insert(field, field.current_text(&self.params));
        }
    }

    /// Commits the draft of one tree row.
    pub fn commit_edit(&mut self, field: ParamField) {
        let Some(text) = self.param_drafts.get(&field).cloned() else {
            return;
        };

        match self.params.apply_edit(field, &text) {
            Ok(EditOutcome::Unchanged) => {}
            Ok(EditOutcome::Relabel) => {
                self.picks.reset();
                self.error_msg = None;
            }
            Ok(EditOutcome::Regrid) => self.regrid(),
            Err(e) => {
                tracing::warn!("rejected edit: {}", e);
                self.error_msg = Some(e.to_string());
                self.param_drafts
                    .insert(field, field.current_text(&self.params));
            }
        }
    }

    /// Commits every draft, then recomputes the model. A draft that fails
    /// to parse leaves every parameter as it was.
    pub fn execute(&mut self) {
        let mut params = self.params.clone();
        for field in ParamField::COLOR.into_iter().chain(ParamField::GRID) {
            let Some(text) = self.param_drafts.get(&field) else {
                continue;
            };
            if let Err(e) = params.apply_edit(field, text) {
                tracing::warn!("rejected edit: {}", e);
                self.error_msg = Some(e.to_string());
                self.sync_drafts();
                return;
            }
        }
        self.params = params;
        self.regrid();
    }

    /// Rebuilds the model from the current parameters. Picks made on the
    /// previous grid are discarded.
    pub fn regrid(&mut self) {
        let Some(image) = &self.image else {
            return;
        };

        match build_velocity_model(image, &self.params) {
            Ok(model) => {
                tracing::info!(
                    "regridded to {}x{} over [{}, {}] {}",
                    model.nx(),
                    model.nz(),
                    self.params.min_color,
                    self.params.max_color,
                    self.params.unit
                );
                self.model = Some(model);
                self.picks.reset();
                self.error_msg = None;
                self.texture_dirty = true;
            }
            Err(e) => {
                tracing::warn!("regrid failed: {}", e);
                self.error_msg = Some(e.to_string());
            }
        }
        self.sync_drafts();
    }

    pub fn arm_picking(&mut self, mode: PickMode) {
        self.picks.arm(mode);
    }

    /// Writes every configured output. An empty report means nothing was
    /// written.
    pub fn save(&self) -> Result<SaveReport> {
        match &self.model {
            Some(model) => save_outputs(&self.output_paths, model, &self.picks),
            None => Ok(SaveReport::default()),
        }
    }
}

pub async fn run_app(config: AppConfig, image_path: Option<PathBuf>) -> anyhow::Result<()> {
    // --- Basic Setup ---
    let event_loop = EventLoop::new()?;
    let [width, height] = config.window_size;
    let window = Arc::new(
        winit::window::WindowBuilder::new()
            .with_title("Create Velocity Model")
            .with_inner_size(winit::dpi::LogicalSize::new(width, height))
            .build(&event_loop)?,
    );

    // --- State Initialization ---
    let mut render_state = RenderState::new(Arc::clone(&window)).await?;
    let mut app_state = AppState::new(config);
    app_state.max_texture_side = render_state.max_texture_side;

    if let Some(path) = image_path {
        if let Err(e) = app_state.load_image(&path) {
            tracing::error!("{}", e);
            app_state.error_msg = Some(e.to_string());
        }
    }

    // --- Egui Setup ---
    let egui_ctx = egui::Context::default();
    let mut egui_state = EguiState::new(
        egui_ctx.clone(),
        egui::ViewportId::ROOT,
        &window,
        None,
        Some(render_state.max_texture_side),
    );
    let mut egui_renderer = EguiRenderer::new(
        &render_state.device,
        render_state.config.format,
        None, // No depth buffer
        1,    // msaa_samples
    );

    // --- Event Loop ---
    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                let response = egui_state.on_window_event(&window, &event);
                if response.repaint {
                    window.request_redraw();
                }
                if response.consumed {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(physical_size) => {
                        render_state.resize(physical_size);
                    }
                    WindowEvent::RedrawRequested => {
                        // --- Egui Frame ---
                        let raw_input = egui_state.take_egui_input(&window);
                        egui_ctx.begin_frame(raw_input);

                        egui::SidePanel::left("settings_panel")
                            .resizable(false)
                            .show(&egui_ctx, |ui| {
                                if app_state.image.is_some() {
                                    populate_settings_menu(&mut app_state, ui);
                                } else {
                                    populate_upload_menu(&mut app_state, ui);
                                }
                            });

                        egui::CentralPanel::default().show(&egui_ctx, |ui| {
                            show_model(ui, &mut app_state);
                        });

                        let egui_output = egui_ctx.end_frame();
                        egui_state.handle_platform_output(&window, egui_output.platform_output);

                        let needs_repaint = egui_output
                            .viewport_output
                            .get(&egui::ViewportId::ROOT)
                            .is_some_and(|v| v.repaint_delay.is_zero());

                        // Texture updates must land before tessellating.
                        for (id, image_delta) in &egui_output.textures_delta.set {
                            egui_renderer.update_texture(
                                &render_state.device,
                                &render_state.queue,
                                *id,
                                image_delta,
                            );
                        }

                        let paint_jobs =
                            egui_ctx.tessellate(egui_output.shapes, egui_output.pixels_per_point);

                        for id in &egui_output.textures_delta.free {
                            egui_renderer.free_texture(id);
                        }

                        // --- Get Surface Texture for Drawing ---
                        let output_frame = match render_state.surface.get_current_texture() {
                            Ok(frame) => frame,
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                render_state.resize(render_state.size);
                                window.request_redraw();
                                return;
                            }
                            Err(e) => {
                                tracing::warn!("dropped frame: {:?}", e);
                                return;
                            }
                        };
                        let output_view = output_frame
                            .texture
                            .create_view(&wgpu::TextureViewDescriptor::default());

                        // --- Record Rendering Commands ---
                        let mut encoder = render_state
                            .device
                            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
                        let screen_descriptor = egui_wgpu::ScreenDescriptor {
                            size_in_pixels: [render_state.config.width, render_state.config.height],
                            pixels_per_point: egui_output.pixels_per_point,
                        };

                        let user_cmds = egui_renderer.update_buffers(
                            &render_state.device,
                            &render_state.queue,
                            &mut encoder,
                            &paint_jobs,
                            &screen_descriptor,
                        );
                        {
                            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: Some("Main Render Pass"),
                                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                    view: &output_view,
                                    resolve_target: None,
                                    ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Clear(wgpu::Color {
                                            r: 0.1,
                                            g: 0.1,
                                            b: 0.12,
                                            a: 1.0,
                                        }),
                                        store: wgpu::StoreOp::Store,
                                    },
                                })],
                                depth_stencil_attachment: None,
                                timestamp_writes: None,
                                occlusion_query_set: None,
                            });
                            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
                        }

                        // --- Submit and Present ---
                        render_state
                            .queue
                            .submit(user_cmds.into_iter().chain(std::iter::once(encoder.finish())));
                        output_frame.present();

                        // Native dialogs block, so they run between frames.
                        if let Some(notice) = app_state.pending_notice.take() {
                            notice.show();
                        }

                        if needs_repaint {
                            window.request_redraw();
                        }
                    }
                    _ => {}
                }
            }
            _ => (),
        }
    })?;

    Ok(())
}
