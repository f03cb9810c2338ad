pub mod control_bar;

pub use control_bar::{ControlBar, ControlBarActions, ControlBarModel};
