//! Request handlers.

pub mod downloads;
pub mod health;
pub mod render_jobs;
pub mod transcribe;
pub mod uploads;

pub use downloads::*;
pub use health::*;
pub use render_jobs::*;
pub use transcribe::*;
pub use uploads::*;
