//! GPU surface for the host window's chrome. The engine renders into the
//! embedded view on its own; nothing here touches that surface.
//!
//! The toolbar is a handful of egui quads, so the context asks for a low-power
//! adapter with downlevel limits and never fails a frame hard: a lost or
//! outdated surface is reconfigured and the frame skipped.

use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no GPU adapter can present to the host window")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface supports no texture formats")]
    NoSurfaceFormat,
}

/// A swapchain image acquired for one toolbar frame.
pub struct ChromeFrame {
    pub output: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl ChromeFrame {
    pub fn present(self) {
        self.output.present();
    }
}

pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
}

/// egui blends in gamma space and expects a non-sRGB target; fall back to
/// whatever the surface offers first.
pub fn chrome_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    const PREFERRED: [wgpu::TextureFormat; 2] = [
        wgpu::TextureFormat::Bgra8Unorm,
        wgpu::TextureFormat::Rgba8Unorm,
    ];
    PREFERRED
        .into_iter()
        .find(|format| formats.contains(format))
        .or_else(|| formats.first().copied())
}

/// Surface extent for a window size; a zero dimension (minimized) is not configurable.
pub fn surface_extent(size: PhysicalSize<u32>) -> Option<(u32, u32)> {
    (size.width > 0 && size.height > 0).then_some((size.width, size.height))
}

impl GpuContext {
    pub fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let (width, height) = surface_extent(window.inner_size()).unwrap_or((1, 1));
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;
        let info = adapter.get_info();
        log::info!("Toolbar renders on {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Host Chrome Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format =
            chrome_surface_format(&caps.formats).ok_or(GpuError::NoSurfaceFormat)?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::debug!("Toolbar surface {width}x{height} as {surface_format:?}");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            surface_format,
        })
    }

    /// Surface size in physical pixels.
    pub fn extent(&self) -> [u32; 2] {
        [self.config.width, self.config.height]
    }

    /// Follows a host window resize. Returns false when the size was ignored.
    pub fn resize(&mut self, size: PhysicalSize<u32>) -> bool {
        let Some((width, height)) = surface_extent(size) else {
            return false;
        };
        if [width, height] == self.extent() {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        true
    }

    /// Acquires the next swapchain image, or `None` when this frame should be skipped.
    pub fn acquire_frame(&self) -> Option<ChromeFrame> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Toolbar surface out of date; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return None;
            }
            Err(wgpu::SurfaceError::Timeout) => return None,
            Err(err) => {
                log::warn!("Toolbar frame skipped: {err}");
                return None;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Some(ChromeFrame { output, view })
    }
}
