//! Core types shared across the installer.
//!
//! - [`error`] - the typed failure taxonomy and fatal-error display
//! - [`steps`] - the named step plan, per-step failure policies, and the
//!   runner both orchestrators drive their plans through

pub mod error;
pub mod steps;

pub use error::{PackupError, display_fatal};
pub use steps::{FailurePolicy, Step, StepReport, StepRunner, StepStatus};
