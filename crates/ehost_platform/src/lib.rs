pub mod adapter;
pub mod cursor;
pub mod display_server;
pub mod handles;
pub mod keymap;
pub mod screens;
pub mod view_state;
pub mod window;

pub use adapter::{NativeInputAdapter, Surface};
pub use display_server::build_interface;
pub use view_state::ViewState;
pub use window::{PlatformConfig, PlatformError, WindowContext};
