//! Egui control panel, available with the `egui` feature.
//!
//! The panel sits at the bottom of the window: Clear, the physics toggle and
//! one round swatch per palette color. It returns [`Command`]s instead of
//! mutating state, so the app applies them the same way as key presses.

use std::sync::Arc;
use winit::window::Window;

use crate::controls::{Command, Controls};
use crate::palette::Color;

/// Egui context, winit state and wgpu renderer.
pub struct EguiIntegration {
    pub ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Tessellated egui output for one frame.
pub struct EguiFrameOutput {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

impl EguiIntegration {
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        window: &Arc<Window>,
    ) -> Self {
        let ctx = egui::Context::default();

        let mut style = egui::Style::default();
        style.visuals = egui::Visuals::dark();
        style.visuals.window_shadow = egui::Shadow::NONE;
        style.visuals.popup_shadow = egui::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(device, output_format, None, 1, false);

        Self { ctx, state, renderer }
    }

    /// Feed a winit event to egui. Returns true if egui consumed it, in which
    /// case it must not reach the canvas.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// True while the pointer is over an egui widget.
    pub fn wants_pointer(&self) -> bool {
        self.ctx.wants_pointer_input() || self.ctx.is_pointer_over_area()
    }

    /// Build the control panel for this frame and return the clicked commands.
    pub fn run_panel(&mut self, window: &Window, controls: &Controls) -> (EguiFrameOutput, Vec<Command>) {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
        let commands = control_panel(&self.ctx, controls);
        let full_output = self.ctx.end_pass();

        self.state.handle_platform_output(window, full_output.platform_output);
        let paint_jobs = self.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        let output = EguiFrameOutput {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        };
        (output, commands)
    }

    /// Upload textures and buffers. Returns command buffers that must be
    /// submitted before the frame's main encoder.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output: &EguiFrameOutput,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &output.paint_jobs, screen_descriptor)
    }

    pub fn renderer(&self) -> &egui_wgpu::Renderer {
        &self.renderer
    }

    /// Free textures after the frame is presented.
    pub fn cleanup(&mut self, output: &EguiFrameOutput) {
        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

fn color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

fn control_panel(ctx: &egui::Context, controls: &Controls) -> Vec<Command> {
    let mut commands = Vec::new();

    egui::Area::new(egui::Id::new("fluid_controls"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Clear").clicked() {
                        commands.push(Command::Clear);
                    }
                    if ui.button(controls.physics_label()).clicked() {
                        commands.push(Command::TogglePhysics);
                    }

                    ui.separator();

                    for (index, swatch) in controls.palette().swatches().iter().enumerate() {
                        let selected = index == controls.selected_index();
                        let stroke = if selected {
                            egui::Stroke::new(2.0, egui::Color32::WHITE)
                        } else {
                            egui::Stroke::NONE
                        };
                        let button = egui::Button::new("")
                            .fill(color32(swatch.color))
                            .stroke(stroke)
                            .corner_radius(12.0)
                            .min_size(egui::vec2(24.0, 24.0));
                        if ui.add(button).on_hover_text(swatch.name).clicked() {
                            commands.push(Command::SelectColor(index));
                        }
                    }
                });
            });
        });

    commands
}
