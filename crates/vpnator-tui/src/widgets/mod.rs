//! Custom widget components

mod confirm_dialog;
mod header;
mod message_log;
pub mod modal_overlay;
mod settings_form;
mod status_bar;

pub use confirm_dialog::ConfirmDialog;
pub use header::MainHeader;
pub use message_log::MessageLogView;
pub use settings_form::SettingsFormView;
pub use status_bar::StatusBar;
