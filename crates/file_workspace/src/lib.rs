//! Client-side runtime for a project's file workspace: folder listings with search and sort,
//! concurrent uploads with estimated progress, debounced hover previews and popup placement.

pub mod collate;
pub mod config;
mod effect_executor;
pub mod error;
pub mod language;
pub mod model;
pub mod popup;
pub mod progress;
pub mod reducer;
pub mod registry;
pub mod snippet;
pub mod workspace;

pub use config::{load_workspace_config, save_workspace_config, PopupConfig, WorkspaceConfig};
pub use error::WorkspaceError;
pub use model::*;
pub use progress::{FixedStepProgress, NoProgressEstimate, ProgressEstimator, SimulatedProgress};
pub use reducer::{reduce_workspace, ReducerError, WorkspaceAction, WorkspaceEffect};
pub use workspace::{FileWorkspace, UploadBatchReport, UploadFailure};
