//! Single text input state

use std::fmt;

/// Identifies one input of the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Protocol,
    RemoteAddress,
    Username,
    Password,
    VpnUsername,
    VpnPassword,
}

impl FieldId {
    pub fn label(&self) -> &'static str {
        match self {
            FieldId::Protocol => "Protocol",
            FieldId::RemoteAddress => "Remote address",
            FieldId::Username => "Username",
            FieldId::Password => "Password",
            FieldId::VpnUsername => "VPN username",
            FieldId::VpnPassword => "VPN password",
        }
    }

    /// Rendered masked in the UI and redacted in logs.
    pub fn is_secret(&self) -> bool {
        matches!(self, FieldId::Password | FieldId::VpnPassword)
    }

    /// Accepts free text (everything but the protocol selector).
    pub fn is_text(&self) -> bool {
        !matches!(self, FieldId::Protocol)
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FieldId::Protocol => "",
            FieldId::RemoteAddress => "host or host:port",
            FieldId::Username => "SSH user",
            FieldId::Password => "SSH password",
            FieldId::VpnUsername => "VPN account user",
            FieldId::VpnPassword => "VPN account password",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current value of one text input plus the edits applied to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormField {
    value: String,
}

impl FormField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the whole value.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    /// Remove the last character.
    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Value as shown on screen: one bullet per character when `secret`.
    pub fn display(&self, secret: bool) -> String {
        if secret {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}
