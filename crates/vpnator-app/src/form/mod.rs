//! Settings form state: text inputs, protocol selector, validation.

pub mod field;
pub mod settings_form;

pub use field::{FieldId, FormField};
pub use settings_form::SettingsForm;
