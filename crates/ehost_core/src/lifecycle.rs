//! Project lifecycle: engine instance creation, project load/unload, start/stop
//! and quit propagation.
//!
//! ```text
//! NoInstance --create--> InstanceReady --start--> Loading --ok--> Running
//!                                                    \--fail--> Stopped
//! Running --stop(reason)--> Stopped --start--> Loading
//! Running | Stopped | InstanceReady --shutdown--> ShuttingDown --destroy--> NoInstance
//! ```
//!
//! Every stop path (user action, engine quit request, window close) goes through
//! [`ProjectController::stop`]. The window outlives a stopped project; only a close
//! request marks the host loop for termination.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::events::EngineEvent;

/// The embedded engine as seen by the host.
///
/// Implementations must not block: every method is called from the native
/// event-pump thread.
pub trait EngineBackend {
    type Instance;

    fn create_instance(&mut self, argv: &[String]) -> Option<Self::Instance>;
    fn destroy_instance(&mut self, instance: Self::Instance);
    fn load_project(&mut self, instance: &mut Self::Instance, path: &Path) -> bool;
    fn unload_project(&mut self, instance: &mut Self::Instance);
    /// Runs one engine frame. Returns true when the project asked to quit.
    fn iterate(&mut self, instance: &mut Self::Instance) -> bool;
    fn push_event(&mut self, instance: &mut Self::Instance, event: &EngineEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    NoInstance,
    InstanceReady,
    Loading,
    Running,
    Stopped,
    ShuttingDown,
}

impl LifecycleState {
    pub fn label(self) -> &'static str {
        match self {
            Self::NoInstance => "no instance",
            Self::InstanceReady => "ready",
            Self::Loading => "loading",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::ShuttingDown => "shutting down",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    UserRequested,
    ProjectRequestedExit,
    WindowClosed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserRequested => "stopped by user",
            Self::ProjectRequestedExit => "project requested exit",
            Self::WindowClosed => "window closed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    /// Load failed; the controller is `Stopped` and the status says why.
    LoadFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// No project running; the engine was not iterated.
    Idle,
    Continue,
    /// The engine asked to quit and the project has been stopped.
    QuitRequested,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("engine instance could not be created")]
    InstanceCreationFailed,
    #[error("an engine instance already exists")]
    InstanceExists,
    #[error("no engine instance")]
    NoInstance,
    #[error("no project path set")]
    NoProjectPath,
}

pub struct ProjectController<E: EngineBackend> {
    backend: E,
    instance: Option<E::Instance>,
    state: LifecycleState,
    project_path: Option<PathBuf>,
    status: String,
    close_requested: bool,
}

impl<E: EngineBackend> ProjectController<E> {
    pub fn new(backend: E) -> Self {
        Self {
            backend,
            instance: None,
            state: LifecycleState::NoInstance,
            project_path: None,
            status: String::new(),
            close_requested: false,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    pub fn has_instance(&self) -> bool {
        self.instance.is_some()
    }

    pub fn project_path(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    pub fn set_project_path(&mut self, path: impl Into<PathBuf>) {
        self.project_path = Some(path.into());
    }

    pub fn backend(&self) -> &E {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut E {
        &mut self.backend
    }

    /// True once a window close has been handled; the host loop exits after the current pass.
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Whether `start` would be accepted right now.
    pub fn can_start(&self) -> bool {
        self.project_path.is_some()
            && matches!(
                self.state,
                LifecycleState::InstanceReady | LifecycleState::Stopped
            )
    }

    pub fn create_instance(&mut self, argv: &[String]) -> Result<(), LifecycleError> {
        if self.instance.is_some() {
            return Err(LifecycleError::InstanceExists);
        }
        let instance = self
            .backend
            .create_instance(argv)
            .ok_or(LifecycleError::InstanceCreationFailed)?;
        self.instance = Some(instance);
        self.transition(LifecycleState::InstanceReady);
        self.status = "Ready".to_string();
        Ok(())
    }

    pub fn start(&mut self) -> Result<StartOutcome, LifecycleError> {
        if self.state == LifecycleState::Running {
            log::debug!("start ignored: project already running");
            return Ok(StartOutcome::AlreadyRunning);
        }
        let Some(path) = self.project_path.clone() else {
            self.status = "No project path set".to_string();
            log::warn!("start rejected: no project path set");
            return Err(LifecycleError::NoProjectPath);
        };
        let Some(instance) = self.instance.as_mut() else {
            return Err(LifecycleError::NoInstance);
        };
        if self.state == LifecycleState::ShuttingDown {
            return Err(LifecycleError::NoInstance);
        }

        self.state = LifecycleState::Loading;
        log::info!("Lifecycle: loading project '{}'", path.display());
        self.status = format!("Loading {}", path.display());

        if self.backend.load_project(instance, &path) {
            self.transition(LifecycleState::Running);
            self.status = format!("Running {}", path.display());
            Ok(StartOutcome::Started)
        } else {
            self.transition(LifecycleState::Stopped);
            self.status = format!("Failed to load project at {}", path.display());
            log::error!("{}", self.status);
            Ok(StartOutcome::LoadFailed)
        }
    }

    /// Unloads a running project. Returns false when nothing was running.
    pub fn stop(&mut self, reason: StopReason) -> bool {
        if self.state != LifecycleState::Running {
            return false;
        }
        if let Some(instance) = self.instance.as_mut() {
            self.backend.unload_project(instance);
        }
        self.transition(LifecycleState::Stopped);
        self.status = format!("Stopped: {reason}");
        log::info!("Project stopped ({reason})");
        true
    }

    /// Window close: stop the project and mark the host loop for termination.
    pub fn request_close(&mut self) {
        self.stop(StopReason::WindowClosed);
        self.close_requested = true;
    }

    /// Runs exactly one engine iteration when a project is running.
    pub fn iterate(&mut self) -> IterationOutcome {
        if self.state != LifecycleState::Running {
            return IterationOutcome::Idle;
        }
        let Some(instance) = self.instance.as_mut() else {
            return IterationOutcome::Idle;
        };
        if self.backend.iterate(instance) {
            self.stop(StopReason::ProjectRequestedExit);
            IterationOutcome::QuitRequested
        } else {
            IterationOutcome::Continue
        }
    }

    /// Input reaches the engine only while an instance exists and a project runs.
    pub fn should_forward_input(&self) -> bool {
        self.instance.is_some() && self.state == LifecycleState::Running
    }

    /// Pushes `event` to the engine if forwarding is allowed. Returns whether it was delivered.
    pub fn forward(&mut self, event: &EngineEvent) -> bool {
        if !self.should_forward_input() {
            log::trace!("dropping {event:?}: project not running");
            return false;
        }
        match self.instance.as_mut() {
            Some(instance) => {
                self.backend.push_event(instance, event);
                true
            }
            None => false,
        }
    }

    /// Runs `translate` unconditionally, then forwards what it produced if a
    /// project runs. Pointer state stays current while stopped, so a button
    /// released between stop and start is not reported as held afterwards.
    /// Returns how many events were delivered.
    pub fn dispatch(&mut self, translate: impl FnOnce() -> Vec<EngineEvent>) -> usize {
        let events = translate();
        let mut delivered = 0;
        for event in &events {
            if self.forward(event) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Stops any running project, then destroys the instance. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.instance.is_none() {
            return;
        }
        self.stop(StopReason::WindowClosed);
        self.transition(LifecycleState::ShuttingDown);
        if let Some(instance) = self.instance.take() {
            self.backend.destroy_instance(instance);
        }
        self.transition(LifecycleState::NoInstance);
        self.status = "Engine shut down".to_string();
    }

    fn transition(&mut self, next: LifecycleState) {
        if self.state != next {
            log::info!("Lifecycle: {} -> {}", self.state, next);
            self.state = next;
        }
    }
}
