//! Engine-independent core of the embedded display-server host: the value
//! domains shared with the engine, pointer state, layout math, input
//! translation and the project lifecycle state machine.

pub use glam;

pub mod abi;
pub mod events;
pub mod geometry;
pub mod input;
pub mod keys;
pub mod lifecycle;
pub mod translate;

pub use abi::{ButtonMask, CursorShape, HandleType, ModifierFlags, MouseButton, MouseMode};
pub use events::{EngineEvent, NativeEvent};
pub use geometry::{Insets, Layout};
pub use input::InputState;
pub use lifecycle::{EngineBackend, LifecycleState, ProjectController, StopReason};
