//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod axis;
pub mod motion;
pub mod status;

pub use axis::{axis_task, AxisHardware, AxisSetup, CoilPin};
pub use motion::motion_task;
pub use status::status_task;
