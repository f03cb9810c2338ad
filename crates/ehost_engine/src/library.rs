//! Engine dynamic library: symbol resolution and the [`EngineBackend`] implementation.

use std::ffi::{c_char, c_int, c_void, CString};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use ehost_core::events::EngineEvent;
use ehost_core::lifecycle::EngineBackend;
use libloading::Library;

use crate::ffi::{DisplayServerInterface, RawEngineEvent};

type SetDisplayServerFn = unsafe extern "C" fn(*const DisplayServerInterface) -> bool;
type CreateInstanceFn = unsafe extern "C" fn(c_int, *const *const c_char) -> *mut c_void;
type DestroyInstanceFn = unsafe extern "C" fn(*mut c_void);
type LoadProjectFn = unsafe extern "C" fn(*mut c_void, *const c_char) -> bool;
type UnloadProjectFn = unsafe extern "C" fn(*mut c_void);
type IterationFn = unsafe extern "C" fn(*mut c_void) -> bool;
type PushEventFn = unsafe extern "C" fn(*mut c_void, *const RawEngineEvent);

#[derive(Debug, thiserror::Error)]
pub enum EngineLoadError {
    #[error("failed to load engine library {path:?}: {source}")]
    Library {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("engine library is missing symbol '{symbol}': {source}")]
    MissingSymbol {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },
    #[error("display server interface already registered")]
    AlreadyRegistered,
    #[error("engine rejected the display server interface")]
    DisplayServerRejected,
}

/// Live engine instance. Only valid between create and destroy.
#[derive(Debug)]
pub struct EngineInstance(NonNull<c_void>);

impl EngineInstance {
    fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

struct EngineApi {
    set_display_server: SetDisplayServerFn,
    create_instance: CreateInstanceFn,
    destroy_instance: DestroyInstanceFn,
    load_project: LoadProjectFn,
    unload_project: UnloadProjectFn,
    iteration: IterationFn,
    push_event: PushEventFn,
}

/// An engine loaded from a dynamic library.
pub struct LibEngine {
    api: EngineApi,
    display_server_registered: bool,
    // Keeps every pointer in `api` valid; declared last so it is dropped last.
    _library: Library,
}

impl LibEngine {
    /// Loads the engine library at `path` and resolves every entry point.
    ///
    /// # Safety
    ///
    /// Loading runs the library's initializers. The library must export the
    /// expected symbols with the signatures declared in this module.
    pub unsafe fn load(path: impl AsRef<Path>) -> Result<Self, EngineLoadError> {
        let path = path.as_ref();
        log::debug!("Loading engine library from {:?}", path);

        let library = Library::new(path).map_err(|source| EngineLoadError::Library {
            path: path.to_path_buf(),
            source,
        })?;

        let api = EngineApi {
            set_display_server: resolve(&library, "embed_set_display_server")?,
            create_instance: resolve(&library, "embed_create_instance")?,
            destroy_instance: resolve(&library, "embed_destroy_instance")?,
            load_project: resolve(&library, "embed_load_project")?,
            unload_project: resolve(&library, "embed_unload_project")?,
            iteration: resolve(&library, "embed_iteration")?,
            push_event: resolve(&library, "embed_push_event")?,
        };

        log::info!("Engine library loaded: {}", path.display());
        Ok(Self {
            api,
            display_server_registered: false,
            _library: library,
        })
    }

    /// Hands the capability table to the engine. Allowed exactly once, before the
    /// first instance is created.
    pub fn register_display_server(
        &mut self,
        interface: &'static DisplayServerInterface,
    ) -> Result<(), EngineLoadError> {
        if self.display_server_registered {
            return Err(EngineLoadError::AlreadyRegistered);
        }
        // SAFETY: the table is 'static and its userdata outlives the engine instance.
        let accepted = unsafe { (self.api.set_display_server)(interface) };
        if !accepted {
            return Err(EngineLoadError::DisplayServerRejected);
        }
        self.display_server_registered = true;
        log::info!("Display server interface registered");
        Ok(())
    }
}

/// # Safety
///
/// `T` must match the exported symbol's real signature.
unsafe fn resolve<T: Copy>(
    library: &Library,
    symbol: &'static str,
) -> Result<T, EngineLoadError> {
    let name = format!("{symbol}\0");
    library
        .get::<T>(name.as_bytes())
        .map(|sym| *sym)
        .map_err(|source| EngineLoadError::MissingSymbol { symbol, source })
}

fn to_cstrings(args: &[String]) -> Option<Vec<CString>> {
    args.iter()
        .map(|arg| CString::new(arg.as_str()).ok())
        .collect()
}

impl EngineBackend for LibEngine {
    type Instance = EngineInstance;

    fn create_instance(&mut self, argv: &[String]) -> Option<EngineInstance> {
        if !self.display_server_registered {
            log::error!(
                "Refusing to create an engine instance before the display server is registered"
            );
            return None;
        }
        let Some(owned) = to_cstrings(argv) else {
            log::error!("Engine arguments contain an interior NUL byte");
            return None;
        };
        let pointers: Vec<*const c_char> = owned.iter().map(|arg| arg.as_ptr()).collect();
        let argc = c_int::try_from(pointers.len()).ok()?;
        log::debug!("Creating engine instance with {:?}", argv);
        // SAFETY: `pointers` and the strings they point to live until the call returns.
        let raw = unsafe { (self.api.create_instance)(argc, pointers.as_ptr()) };
        NonNull::new(raw).map(EngineInstance)
    }

    fn destroy_instance(&mut self, instance: EngineInstance) {
        log::debug!("Destroying engine instance");
        // SAFETY: the instance came from create_instance and is consumed here.
        unsafe { (self.api.destroy_instance)(instance.as_ptr()) }
    }

    fn load_project(&mut self, instance: &mut EngineInstance, path: &Path) -> bool {
        let Ok(c_path) = CString::new(path.to_string_lossy().into_owned()) else {
            log::error!("Project path {:?} contains an interior NUL byte", path);
            return false;
        };
        // SAFETY: valid instance, NUL-terminated path alive for the call.
        unsafe { (self.api.load_project)(instance.as_ptr(), c_path.as_ptr()) }
    }

    fn unload_project(&mut self, instance: &mut EngineInstance) {
        // SAFETY: valid instance.
        unsafe { (self.api.unload_project)(instance.as_ptr()) }
    }

    fn iterate(&mut self, instance: &mut EngineInstance) -> bool {
        // SAFETY: valid instance; the engine calls back into the display server
        // table, which borrows nothing held across this call.
        unsafe { (self.api.iteration)(instance.as_ptr()) }
    }

    fn push_event(&mut self, instance: &mut EngineInstance, event: &EngineEvent) {
        let raw = RawEngineEvent::from(event);
        // SAFETY: valid instance; `raw` outlives the call.
        unsafe { (self.api.push_event)(instance.as_ptr(), &raw) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_library_reports_path() {
        let err = unsafe { LibEngine::load("/nonexistent/libengine-missing.so") }
            .err()
            .expect("loading a missing library must fail");
        match err {
            EngineLoadError::Library { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/libengine-missing.so"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_interior_nul_rejects_arguments() {
        assert!(to_cstrings(&["ok".to_string(), "bad\0arg".to_string()]).is_none());
        let owned = to_cstrings(&["--path".to_string(), "game".to_string()]).unwrap();
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[1].to_str().unwrap(), "game");
    }
}
