//! UI components for Codepad
//!
//! Each panel reads from [`AppState`](crate::state::AppState) and reports
//! what the user did; the app applies those actions.

mod activity_bar;
mod details_panel;
mod dialogs;
mod explorer;
mod modals;
mod status_bar;
mod tab_bar;

pub use activity_bar::{show_activity_bar, ActivityAction};
pub use details_panel::{show_details_panel, PanelDrag};
pub use dialogs::{show_delete_confirm, FileOperationDialog, FileOperationResult};
pub use explorer::{show_explorer, ExplorerAction};
pub use modals::{show_error_modal, show_restore_prompt, RestoreChoice};
pub use status_bar::show_status_bar;
pub use tab_bar::{show_tab_bar, TabAction};
