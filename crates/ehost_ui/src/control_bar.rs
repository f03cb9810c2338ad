//! Host toolbar rendered via egui across the top inset of the host window.
//!
//! Same split as any egui-on-wgpu integration, because
//! `egui_wgpu::Renderer::render()` needs a `RenderPass<'static>` while
//! `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run the toolbar UI, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! `render_frame()` runs all four against the host window's surface.

use std::path::Path;

use ehost_render::GpuContext;
use winit::window::Window;

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.11,
    g: 0.11,
    b: 0.12,
    a: 1.0,
};

/// What the toolbar shows this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlBarModel {
    pub project_label: String,
    /// Title set by the running project.
    pub title: String,
    pub status: String,
    pub can_start: bool,
    pub can_stop: bool,
    /// Logical points; matches the host's top inset.
    pub height: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ControlBarActions {
    pub start: bool,
    pub stop: bool,
}

/// Short label for the project source shown next to the buttons.
pub fn project_label(path: Option<&Path>) -> String {
    match path {
        Some(path) => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        None => "No project".to_string(),
    }
}

pub struct ControlBar {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    last_model: Option<ControlBarModel>,
    repaint: bool,
}

impl ControlBar {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        egui_ctx.set_visuals(egui::Visuals::dark());
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);
        log::debug!("Host toolbar using surface format {:?}", surface_format);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            last_model: None,
            repaint: true,
        }
    }

    /// Feeds a host window event to egui. Returns true when the toolbar consumed it.
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        self.repaint |= response.repaint;
        response.consumed
    }

    /// Whether egui asked for a repaint or `model` differs from the last frame drawn.
    pub fn needs_redraw(&self, model: &ControlBarModel) -> bool {
        self.repaint || self.last_model.as_ref() != Some(model)
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        model: &ControlBarModel,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        ControlBarActions,
    ) {
        let mut actions = ControlBarActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self
            .egui_ctx
            .run(raw_input, |ctx| draw(ctx, model, &mut actions));

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }

    /// Draws one frame of host chrome and presents it. Returns the button presses.
    pub fn render_frame(
        &mut self,
        gpu: &GpuContext,
        window: &Window,
        model: &ControlBarModel,
    ) -> ControlBarActions {
        let Some(frame) = gpu.acquire_frame() else {
            return ControlBarActions::default();
        };

        let (primitives, textures_delta, actions) = self.prepare(window, model);
        self.last_model = Some(model.clone());
        self.repaint = false;
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: gpu.extent(),
            pixels_per_point: window.scale_factor() as f32,
        };

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Host Chrome Encoder"),
            });

        self.upload(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &primitives,
            &textures_delta,
            &screen_descriptor,
        );

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Host Chrome Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(BACKGROUND),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.paint(&mut pass, &primitives, &screen_descriptor);
        }

        self.cleanup(&textures_delta);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        actions
    }
}

fn draw(ctx: &egui::Context, model: &ControlBarModel, actions: &mut ControlBarActions) {
    egui::TopBottomPanel::top("host_toolbar")
        .exact_height(model.height)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.strong(&model.project_label);
                ui.separator();
                if ui
                    .add_enabled(model.can_start, egui::Button::new("\u{25b6} Start"))
                    .clicked()
                {
                    actions.start = true;
                }
                if ui
                    .add_enabled(model.can_stop, egui::Button::new("\u{25a0} Stop"))
                    .clicked()
                {
                    actions.stop = true;
                }
                if !model.title.is_empty() {
                    ui.separator();
                    ui.label(&model.title);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(&model.status);
                });
            });
        });
}
