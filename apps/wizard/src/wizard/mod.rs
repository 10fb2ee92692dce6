//! The multi-step resume-data-assembly wizard.

pub mod forms;
pub mod handlers;
pub mod registry;
pub mod state;
pub mod validate;

pub use state::{Step, UploadStage, WizardError, WizardState};
