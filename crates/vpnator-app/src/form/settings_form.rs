//! Server settings form
//!
//! Holds the protocol selector and the text inputs, decides which inputs are
//! visible for the selected protocol, and turns the inputs into a
//! [`ServerConfig`] on submit.

use std::fmt;

use vpnator_core::prelude::*;
use vpnator_core::{ServerConfig, VpnCredentials, VpnProtocol};

use super::field::{FieldId, FormField};

/// Inputs shown for every protocol, in focus order.
const BASE_FIELDS: [FieldId; 4] = [
    FieldId::Protocol,
    FieldId::RemoteAddress,
    FieldId::Username,
    FieldId::Password,
];

/// Inputs shown when the protocol needs its own VPN account.
const VPN_FIELDS: [FieldId; 2] = [FieldId::VpnUsername, FieldId::VpnPassword];

#[derive(Clone, PartialEq, Eq)]
pub struct SettingsForm {
    protocol: VpnProtocol,
    remote_address: FormField,
    username: FormField,
    password: FormField,
    vpn_username: FormField,
    vpn_password: FormField,
    focus: FieldId,
}

impl fmt::Debug for SettingsForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsForm")
            .field("protocol", &self.protocol)
            .field("remote_address", &self.remote_address.value())
            .field("username", &self.username.value())
            .field("vpn_username", &self.vpn_username.value())
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::new(VpnProtocol::default())
    }
}

impl SettingsForm {
    pub fn new(protocol: VpnProtocol) -> Self {
        Self {
            protocol,
            remote_address: FormField::new(),
            username: FormField::new(),
            password: FormField::new(),
            vpn_username: FormField::new(),
            vpn_password: FormField::new(),
            focus: FieldId::Protocol,
        }
    }

    pub fn protocol(&self) -> VpnProtocol {
        self.protocol
    }

    /// Select `protocol`. VPN credentials are dropped when it does not need them.
    pub fn set_protocol(&mut self, protocol: VpnProtocol) {
        self.protocol = protocol;
        if !protocol.requires_vpn_credentials() {
            self.vpn_username.clear();
            self.vpn_password.clear();
            if VPN_FIELDS.contains(&self.focus) {
                self.focus = FieldId::Password;
            }
        }
    }

    pub fn next_protocol(&mut self) {
        self.set_protocol(self.protocol.next());
    }

    pub fn prev_protocol(&mut self) {
        self.set_protocol(self.protocol.prev());
    }

    pub fn vpn_fields_visible(&self) -> bool {
        self.protocol.requires_vpn_credentials()
    }

    /// Inputs currently shown, in focus order.
    pub fn visible_fields(&self) -> Vec<FieldId> {
        let mut fields = BASE_FIELDS.to_vec();
        if self.vpn_fields_visible() {
            fields.extend(VPN_FIELDS);
        }
        fields
    }

    pub fn focus(&self) -> FieldId {
        self.focus
    }

    /// Move focus to `field` if it is visible.
    pub fn set_focus(&mut self, field: FieldId) {
        if self.visible_fields().contains(&field) {
            self.focus = field;
        }
    }

    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev(&mut self) {
        let len = self.visible_fields().len();
        self.step_focus(len - 1);
    }

    fn step_focus(&mut self, step: usize) {
        let fields = self.visible_fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(current + step) % fields.len()];
    }

    /// Text input for `id`. `None` for the protocol selector.
    pub fn field(&self, id: FieldId) -> Option<&FormField> {
        match id {
            FieldId::Protocol => None,
            FieldId::RemoteAddress => Some(&self.remote_address),
            FieldId::Username => Some(&self.username),
            FieldId::Password => Some(&self.password),
            FieldId::VpnUsername => Some(&self.vpn_username),
            FieldId::VpnPassword => Some(&self.vpn_password),
        }
    }

    fn field_mut(&mut self, id: FieldId) -> Option<&mut FormField> {
        match id {
            FieldId::Protocol => None,
            FieldId::RemoteAddress => Some(&mut self.remote_address),
            FieldId::Username => Some(&mut self.username),
            FieldId::Password => Some(&mut self.password),
            FieldId::VpnUsername => Some(&mut self.vpn_username),
            FieldId::VpnPassword => Some(&mut self.vpn_password),
        }
    }

    /// Set a text input directly. Ignored for the protocol selector.
    pub fn set_value(&mut self, id: FieldId, value: impl Into<String>) {
        if let Some(field) = self.field_mut(id) {
            field.set(value);
        }
    }

    /// Type a character into the focused input.
    pub fn input_char(&mut self, c: char) {
        let focus = self.focus;
        if let Some(field) = self.field_mut(focus) {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        if let Some(field) = self.field_mut(focus) {
            field.backspace();
        }
    }

    pub fn clear_focused(&mut self) {
        let focus = self.focus;
        if let Some(field) = self.field_mut(focus) {
            field.clear();
        }
    }

    /// Validate the visible inputs and build the request.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] naming the first input that is empty or contains
    /// whitespace. The backend splits the command line on spaces, so no value
    /// may contain one.
    pub fn submit(&self) -> Result<ServerConfig> {
        for id in self.visible_fields() {
            if let Some(field) = self.field(id) {
                validate(id, field.value())?;
            }
        }

        let mut config = ServerConfig::new(
            self.protocol,
            self.remote_address.value(),
            self.username.value(),
            self.password.value(),
        );
        if self.vpn_fields_visible() {
            config = config.with_vpn_credentials(VpnCredentials::new(
                self.vpn_username.value(),
                self.vpn_password.value(),
            ));
        }
        Ok(config)
    }
}

fn validate(id: FieldId, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(id.label(), "is required"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(Error::validation(id.label(), "must not contain spaces"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(protocol: VpnProtocol) -> SettingsForm {
        let mut form = SettingsForm::new(protocol);
        form.set_value(FieldId::RemoteAddress, "1.2.3.4");
        form.set_value(FieldId::Username, "bob");
        form.set_value(FieldId::Password, "secret");
        form
    }

    #[test]
    fn test_outline_hides_vpn_fields() {
        let form = SettingsForm::new(VpnProtocol::Outline);
        assert!(!form.vpn_fields_visible());
        assert_eq!(form.visible_fields().len(), 4);
    }

    #[test]
    fn test_openconnect_reveals_vpn_fields() {
        let form = SettingsForm::new(VpnProtocol::OpenConnect);
        assert!(form.vpn_fields_visible());
        assert_eq!(
            form.visible_fields(),
            vec![
                FieldId::Protocol,
                FieldId::RemoteAddress,
                FieldId::Username,
                FieldId::Password,
                FieldId::VpnUsername,
                FieldId::VpnPassword,
            ]
        );
    }

    #[test]
    fn test_submit_outline_has_no_vpn_credentials() {
        let config = filled(VpnProtocol::Outline).submit().unwrap();
        assert_eq!(config.protocol, VpnProtocol::Outline);
        assert_eq!(config.remote_address, "1.2.3.4");
        assert_eq!(config.username, "bob");
        assert_eq!(config.password, "secret");
        assert!(config.vpn_credentials.is_none());
    }

    #[test]
    fn test_submit_openconnect_carries_vpn_credentials() {
        let mut form = filled(VpnProtocol::OpenConnect);
        form.set_value(FieldId::VpnUsername, "vu");
        form.set_value(FieldId::VpnPassword, "vp");
        let config = form.submit().unwrap();
        assert_eq!(config.vpn_credentials, Some(VpnCredentials::new("vu", "vp")));
    }

    #[test]
    fn test_switching_away_from_openconnect_clears_vpn_credentials() {
        let mut form = filled(VpnProtocol::OpenConnect);
        form.set_value(FieldId::VpnUsername, "vu");
        form.set_value(FieldId::VpnPassword, "vp");

        form.set_protocol(VpnProtocol::Xray);
        assert!(form.field(FieldId::VpnUsername).unwrap().is_empty());
        assert!(form.field(FieldId::VpnPassword).unwrap().is_empty());

        // Switching back does not resurrect them.
        form.set_protocol(VpnProtocol::OpenConnect);
        assert!(form.field(FieldId::VpnUsername).unwrap().is_empty());
    }

    #[test]
    fn test_switching_protocol_moves_focus_off_hidden_field() {
        let mut form = SettingsForm::new(VpnProtocol::OpenConnect);
        form.set_focus(FieldId::VpnPassword);
        form.set_protocol(VpnProtocol::Outline);
        assert_eq!(form.focus(), FieldId::Password);
    }

    #[test]
    fn test_submit_rejects_missing_field() {
        let mut form = filled(VpnProtocol::Outline);
        form.set_value(FieldId::Username, "");
        let err = form.submit().unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "Username"));
    }

    #[test]
    fn test_submit_rejects_missing_vpn_field() {
        let mut form = filled(VpnProtocol::OpenConnect);
        form.set_value(FieldId::VpnUsername, "vu");
        let err = form.submit().unwrap_err();
        assert_eq!(err.to_string(), "VPN password: is required");
    }

    #[test]
    fn test_submit_rejects_whitespace() {
        let mut form = filled(VpnProtocol::Outline);
        form.set_value(FieldId::Password, "two words");
        let err = form.submit().unwrap_err();
        assert_eq!(err.to_string(), "Password: must not contain spaces");
    }

    #[test]
    fn test_focus_cycles_through_visible_fields() {
        let mut form = SettingsForm::new(VpnProtocol::Outline);
        assert_eq!(form.focus(), FieldId::Protocol);
        form.focus_next();
        assert_eq!(form.focus(), FieldId::RemoteAddress);
        form.focus_prev();
        form.focus_prev();
        assert_eq!(form.focus(), FieldId::Password);
        form.focus_next();
        assert_eq!(form.focus(), FieldId::Protocol);
    }

    #[test]
    fn test_set_focus_ignores_hidden_field() {
        let mut form = SettingsForm::new(VpnProtocol::Outline);
        form.set_focus(FieldId::VpnUsername);
        assert_eq!(form.focus(), FieldId::Protocol);
    }

    #[test]
    fn test_typing_edits_focused_field_only() {
        let mut form = SettingsForm::new(VpnProtocol::Outline);
        form.input_char('x');
        assert!(form.field(FieldId::RemoteAddress).unwrap().is_empty());

        form.set_focus(FieldId::Username);
        form.input_char('r');
        form.input_char('o');
        form.input_char('t');
        form.backspace();
        form.input_char('o');
        form.input_char('t');
        assert_eq!(form.field(FieldId::Username).unwrap().value(), "root");

        form.clear_focused();
        assert!(form.field(FieldId::Username).unwrap().is_empty());
    }

    #[test]
    fn test_protocol_cycling() {
        let mut form = SettingsForm::new(VpnProtocol::Outline);
        form.next_protocol();
        assert_eq!(form.protocol(), VpnProtocol::OpenConnect);
        form.prev_protocol();
        form.prev_protocol();
        assert_eq!(form.protocol(), VpnProtocol::Xray);
    }
}
