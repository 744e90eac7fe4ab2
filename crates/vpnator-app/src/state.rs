//! Application state (Model in TEA pattern)

use vpnator_core::{SessionPhase, VpnProtocol};

use crate::config::{Settings, DEFAULT_ENDPOINT};
use crate::form::SettingsForm;
use crate::message_log::MessageLog;

/// Top-level UI mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Form and log
    #[default]
    Normal,
    /// Quit confirmation dialog is open
    ConfirmDialog,
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub form: SettingsForm,
    pub log: MessageLog,
    pub phase: SessionPhase,
    pub ui_mode: UiMode,
    pub settings: Settings,
    /// Resolved backend URL used for every session
    pub endpoint: String,
    /// Last form validation failure, shown until the next edit or submit
    pub form_error: Option<String>,
    quitting: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(Settings::default(), DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_settings(settings: Settings, endpoint: String) -> Self {
        let protocol: VpnProtocol = settings.form.default_protocol;
        Self {
            form: SettingsForm::new(protocol),
            log: MessageLog::new(),
            phase: SessionPhase::Idle,
            ui_mode: UiMode::Normal,
            settings,
            endpoint,
            form_error: None,
            quitting: false,
        }
    }

    /// A session is in flight; the form is locked.
    pub fn in_progress(&self) -> bool {
        self.phase.is_in_progress()
    }

    /// Quit, or open the confirmation dialog while a session runs.
    pub fn request_quit(&mut self) {
        if self.in_progress() && self.settings.behavior.confirm_quit {
            self.ui_mode = UiMode::ConfirmDialog;
        } else {
            self.quitting = true;
        }
    }

    pub fn confirm_quit(&mut self) {
        self.ui_mode = UiMode::Normal;
        self.quitting = true;
    }

    pub fn cancel_quit(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    pub fn force_quit(&mut self) {
        self.quitting = true;
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }
}
