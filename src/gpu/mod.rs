//! Window surface and presentation.
//!
//! The simulation paints on the CPU; the GPU only shows the result. Each
//! frame uploads the canvas and draws one fullscreen triangle, plus the egui
//! control panel when that feature is enabled.

#[cfg(feature = "egui")]
pub mod egui_integration;
mod present;

use std::sync::Arc;

use tracing::info;
use winit::window::Window;

use crate::canvas::{Backdrop, Canvas};
use crate::error::GpuError;
use present::PresentPass;

#[cfg(feature = "egui")]
use egui_integration::{EguiFrameOutput, EguiIntegration};

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    present: PresentPass,
    #[cfg(feature = "egui")]
    pub egui: EguiIntegration,
    #[cfg(feature = "egui")]
    overlay: Option<EguiFrameOutput>,
}

impl GpuState {
    /// Create a surface for `window` and a present pipeline sized for a
    /// `canvas_width × canvas_height` canvas.
    pub async fn new(
        window: Arc<Window>,
        canvas_width: u32,
        canvas_height: u32,
        backdrop: &Backdrop,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let adapter_info = adapter.get_info();
        info!(adapter = %adapter_info.name, backend = ?adapter_info.backend, "GPU initialized");

        // Canvas bytes are already display values, so skip sRGB encoding.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let present = PresentPass::new(&device, surface_format, canvas_width, canvas_height, backdrop);

        #[cfg(feature = "egui")]
        let egui = EguiIntegration::new(&device, surface_format, &window);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            present,
            #[cfg(feature = "egui")]
            egui,
            #[cfg(feature = "egui")]
            overlay: None,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface with its current size, after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Queue egui output to be drawn over the next frame.
    #[cfg(feature = "egui")]
    pub fn set_overlay(&mut self, output: EguiFrameOutput) {
        self.overlay = Some(output);
    }

    /// Upload `canvas` and present it.
    pub fn render(&mut self, canvas: &Canvas) -> Result<(), wgpu::SurfaceError> {
        self.present.upload(&self.device, &self.queue, canvas);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        #[cfg(feature = "egui")]
        let overlay = self.overlay.take();
        #[cfg(feature = "egui")]
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: overlay.as_ref().map_or(1.0, |o| o.pixels_per_point),
        };
        #[allow(unused_mut)]
        let mut extra_commands: Vec<wgpu::CommandBuffer> = Vec::new();
        #[cfg(feature = "egui")]
        {
            if let Some(overlay) = &overlay {
                extra_commands = self
                    .egui
                    .prepare(&self.device, &self.queue, &mut encoder, overlay, &screen);
            }
        }

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Present Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.present.draw(&mut render_pass);

            #[cfg(feature = "egui")]
            {
                if let Some(overlay) = &overlay {
                    self.egui
                        .renderer()
                        .render(&mut render_pass, &overlay.paint_jobs, &screen);
                }
            }
        }

        self.queue
            .submit(extra_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        #[cfg(feature = "egui")]
        {
            if let Some(overlay) = &overlay {
                self.egui.cleanup(overlay);
            }
        }

        Ok(())
    }
}
