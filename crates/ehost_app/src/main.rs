//! Embedded engine host -- main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler` with `ControlFlow::Poll`.
//! One pass of the loop:
//!
//!   1. native window events are adapted, translated, and forwarded to the engine
//!   2. `about_to_wait()` runs exactly one engine iteration while a project runs
//!   3. geometry notifications queued by the window context are delivered
//!   4. the toolbar mirrors the lifecycle and is redrawn when it changed
//!
//! The engine calls back into the display-server table during its iteration.
//! Those callbacks only touch the shared `WindowContext`, never `App`.
//!
//! Shutdown order on close: unload the project, destroy the engine instance,
//! close the windows, then leave the loop.

mod cli;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::Context as _;
use clap::Parser;
use ehost_core::abi::WindowEventKind;
use ehost_core::events::{EngineEvent, NativeEvent};
use ehost_core::geometry::Insets;
use ehost_core::lifecycle::{IterationOutcome, ProjectController, StartOutcome, StopReason};
use ehost_core::translate::translate;
use ehost_engine::args::engine_argv;
use ehost_engine::LibEngine;
use ehost_platform::{build_interface, NativeInputAdapter, PlatformConfig, Surface, WindowContext};
use ehost_render::GpuContext;
use ehost_ui::control_bar::project_label;
use ehost_ui::{ControlBar, ControlBarModel};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use cli::Cli;
use config::HostConfig;

/// Everything that exists only while the host window is open.
struct HostState {
    context: Rc<WindowContext>,
    gpu: GpuContext,
    chrome: ControlBar,
    adapter: NativeInputAdapter,
}

struct App {
    config: HostConfig,
    project: PathBuf,
    engine_argv: Vec<String>,
    /// Held until the display server is registered, then moved into the controller.
    engine: Option<LibEngine>,
    controller: Option<ProjectController<LibEngine>>,
    host: Option<HostState>,
    fatal: Option<anyhow::Error>,
    shut_down: bool,
}

impl App {
    fn new(
        config: HostConfig,
        project: PathBuf,
        engine_argv: Vec<String>,
        engine: LibEngine,
    ) -> Self {
        Self {
            config,
            project,
            engine_argv,
            engine: Some(engine),
            controller: None,
            host: None,
            fatal: None,
            shut_down: false,
        }
    }

    fn init_host(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let platform = PlatformConfig {
            title: self.config.title.clone(),
            width: self.config.width,
            height: self.config.height,
            insets: Insets {
                top: self.config.toolbar_height,
                left: self.config.side_inset,
                bottom: self.config.bottom_inset,
                right: self.config.side_inset,
            },
        };
        let context =
            WindowContext::init(event_loop, &platform).context("failed to create host window")?;
        let gpu = GpuContext::new(context.host_window().clone())
            .context("failed to initialize the toolbar renderer")?;
        let chrome = ControlBar::new(&gpu.device, gpu.surface_format, context.host_window());

        let mut engine = self
            .engine
            .take()
            .context("engine library was already handed to a controller")?;
        engine
            .register_display_server(build_interface(&context))
            .context("failed to register the display server")?;

        let mut controller = ProjectController::new(engine);
        controller
            .create_instance(&self.engine_argv)
            .context("failed to create the engine instance")?;
        controller.set_project_path(self.project.clone());

        self.host = Some(HostState {
            context,
            gpu,
            chrome,
            adapter: NativeInputAdapter::new(),
        });
        self.controller = Some(controller);

        if self.config.autostart {
            self.start_project();
        }
        self.sync_run_state();
        Ok(())
    }

    fn start_project(&mut self) {
        let (Some(controller), Some(host)) = (self.controller.as_mut(), self.host.as_ref()) else {
            return;
        };
        match controller.start() {
            Ok(StartOutcome::Started) => {
                host.context.set_run_state(true, controller.status());
                controller.forward(&EngineEvent::Resized(host.context.drawable_size()));
                if host.context.is_focused() {
                    controller.forward(&EngineEvent::Window(WindowEventKind::FocusIn));
                }
            }
            Ok(StartOutcome::AlreadyRunning | StartOutcome::LoadFailed) => {}
            Err(err) => log::warn!("Cannot start project: {err}"),
        }
    }

    fn stop_project(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.stop(StopReason::UserRequested);
        }
    }

    /// Translates a native event and pushes the results to the engine. Pointer
    /// state is tracked even while no project runs.
    fn forward_native(&mut self, event: NativeEvent) {
        let (Some(controller), Some(host)) = (self.controller.as_mut(), self.host.as_ref()) else {
            return;
        };
        let layout = host.context.layout();
        let context = &host.context;
        controller.dispatch(|| context.with_input(|input| translate(&event, &layout, input)));
    }

    fn flush_notifications(&mut self) {
        let (Some(controller), Some(host)) = (self.controller.as_mut(), self.host.as_ref()) else {
            return;
        };
        for event in host.context.take_notifications() {
            controller.forward(&event);
        }
    }

    fn pump_focus(&mut self) {
        let change = self
            .host
            .as_ref()
            .and_then(|host| host.context.take_focus_change());
        if let Some(focused) = change {
            log::debug!("Host focus {}", if focused { "gained" } else { "lost" });
            self.forward_native(NativeEvent::FocusChanged(focused));
        }
    }

    fn sync_run_state(&self) {
        if let (Some(controller), Some(host)) = (self.controller.as_ref(), self.host.as_ref()) {
            host.context
                .set_run_state(controller.is_running(), controller.status());
        }
    }

    fn chrome_model(&self) -> Option<ControlBarModel> {
        let (Some(host), Some(controller)) = (self.host.as_ref(), self.controller.as_ref()) else {
            return None;
        };
        Some(ControlBarModel {
            project_label: project_label(controller.project_path()),
            title: host.context.title(),
            status: host.context.status(),
            can_start: controller.can_start(),
            can_stop: controller.is_running(),
            height: self.config.toolbar_height as f32,
        })
    }

    fn redraw_chrome(&mut self) {
        let Some(model) = self.chrome_model() else {
            return;
        };
        let Some(host) = self.host.as_mut() else {
            return;
        };
        host.context.mark_realized();
        let actions = host
            .chrome
            .render_frame(&host.gpu, host.context.host_window(), &model);

        if actions.start {
            self.start_project();
        }
        if actions.stop {
            self.stop_project();
        }
        if actions.start || actions.stop {
            self.sync_run_state();
        }
    }

    /// Unload, destroy, then close the windows. Idempotent.
    fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if let Some(controller) = self.controller.as_mut() {
            log::info!("Shutting down engine");
            controller.shutdown();
        }
        if let Some(host) = self.host.take() {
            host.context.mark_closed();
            log::info!(
                "Closing host window ({} frames presented)",
                host.context.presented_frames()
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() || self.shut_down {
            return;
        }
        if let Err(err) = self.init_host(event_loop) {
            self.fatal = Some(err);
            self.shutdown();
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_none() {
            return;
        }
        self.pump_focus();

        if let Some(controller) = self.controller.as_mut() {
            if controller.iterate() == IterationOutcome::QuitRequested {
                log::info!("Project requested exit");
            }
        }
        self.flush_notifications();
        self.sync_run_state();

        // Block on native events while nothing is running.
        let running = self
            .controller
            .as_ref()
            .is_some_and(|controller| controller.is_running());
        event_loop.set_control_flow(if running {
            ControlFlow::Poll
        } else {
            ControlFlow::Wait
        });

        if self
            .controller
            .as_ref()
            .is_some_and(|controller| controller.close_requested())
        {
            self.shutdown();
            event_loop.exit();
            return;
        }

        if let (Some(model), Some(host)) = (self.chrome_model(), &self.host) {
            if host.chrome.needs_redraw(&model) {
                host.context.host_window().request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(host) = self.host.as_mut() else {
            return;
        };
        let Some(surface) = host.context.surface_of(window_id) else {
            return;
        };

        let egui_consumed = surface == Surface::Host
            && host
                .chrome
                .handle_window_event(host.context.host_window(), &event);

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                if let Some(controller) = self.controller.as_mut() {
                    controller.request_close();
                }
                return;
            }
            WindowEvent::Resized(size) => match surface {
                Surface::Host => {
                    host.gpu.resize(*size);
                    host.context.on_host_resized(*size);
                }
                Surface::RenderArea => host.context.mark_realized(),
            },
            WindowEvent::ScaleFactorChanged { scale_factor, .. } if surface == Surface::Host => {
                log::info!("Backing scale changed to {scale_factor}");
                host.context.on_scale_changed(*scale_factor);
            }
            WindowEvent::Focused(focused) => host.context.on_focus(surface, *focused),
            WindowEvent::RedrawRequested => {
                if surface == Surface::Host {
                    self.redraw_chrome();
                } else {
                    host.context.mark_realized();
                }
                return;
            }
            _ => {}
        }

        let native = if egui_consumed {
            None
        } else {
            let layout = host.context.layout();
            host.adapter.adapt(surface, &event, &layout)
        };
        if let Some(native) = native {
            self.forward_native(native);
        }
        self.flush_notifications();
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let DeviceEvent::MouseMotion { delta } = event else {
            return;
        };
        let Some(host) = self.host.as_ref() else {
            return;
        };
        if !host.context.mouse_mode().is_captured() {
            return;
        }
        let native = host.adapter.raw_motion(delta);
        self.forward_native(native);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

fn init_logging(level: Option<&str>) {
    let default = if cfg!(debug_assertions) { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = HostConfig::resolve(cli.config.as_deref())?;
    config.apply_cli(&cli);

    let project = cli::project_source(&cli.args).context(
        "no project given: pass --path <dir>, --main-pack <file>, or a project directory",
    )?;
    let program = std::env::args().next().unwrap_or_else(|| "ehost".to_string());
    let argv = engine_argv(&program, &cli.args);

    let library = config.engine_library_path();
    // SAFETY: the library is an engine build exporting the embedding entry points.
    let engine = unsafe { LibEngine::load(&library) }
        .with_context(|| format!("failed to load engine from {}", library.display()))?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, project, argv, engine);
    event_loop.run_app(&mut app).context("event loop error")?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    log::info!("Embedded engine host starting...");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
