//! Contact form validation
//!
//! Rules run in order and the first failure wins:
//!
//! 1. a required field with an empty (trimmed) value
//! 2. an email field whose value is not `local@domain.tld` shaped
//! 3. a message outside the configured length bounds
//!
//! Lengths count characters, not bytes. A failing field gets the `error`
//! class and an inline `<field>-error` element right after it; both go away
//! on the field's next input event.

use std::sync::LazyLock;

use folio_layout::page::{ElementId, LayoutSource, Page};
use regex::Regex;
use thiserror::Error;

use crate::config::FormConfig;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Shape of an email address accepted by the form
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Why a field failed validation; the display text is shown to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("This field is required.")]
    Required,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Message must be at least {min} characters.")]
    TooShort { min: usize },
    #[error("Message must be at most {max} characters.")]
    TooLong { max: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Email,
    Message,
}

/// One form control and the rules that apply to it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: ElementId,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<ElementId>, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            required,
        }
    }

    /// Derive the spec of a live form control
    ///
    /// `type="email"` makes an email field; a control named `message` is
    /// length-checked. A `required` attribute or a name listed in
    /// `required_names` makes it required.
    pub fn from_layout<L: LayoutSource + ?Sized>(
        layout: &L,
        id: &ElementId,
        required_names: &[String],
    ) -> Self {
        let name = layout
            .attribute(id, "name")
            .unwrap_or_else(|| id.as_str().to_string());
        let kind = if layout.attribute(id, "type").as_deref() == Some("email") {
            FieldKind::Email
        } else if name == "message" {
            FieldKind::Message
        } else {
            FieldKind::Text
        };
        let required = layout.attribute(id, "required").is_some()
            || required_names.iter().any(|n| *n == name);
        Self::new(id.clone(), kind, required)
    }
}

/// Message length bounds, inclusive, in characters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LengthPolicy {
    pub min: usize,
    pub max: usize,
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self { min: 10, max: 500 }
    }
}

impl LengthPolicy {
    pub fn check(&self, value: &str) -> Result<(), FieldError> {
        let len = value.chars().count();
        if len < self.min {
            Err(FieldError::TooShort { min: self.min })
        } else if len > self.max {
            Err(FieldError::TooLong { max: self.max })
        } else {
            Ok(())
        }
    }
}

/// Outcome of validating one field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldValidation {
    pub valid: bool,
    pub message: Option<String>,
}

impl From<Result<(), FieldError>> for FieldValidation {
    fn from(result: Result<(), FieldError>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                message: None,
            },
            Err(err) => Self {
                valid: false,
                message: Some(err.to_string()),
            },
        }
    }
}

/// Validates form controls and keeps their inline errors in step
#[derive(Debug, Clone)]
pub struct FormValidator {
    form: ElementId,
    lengths: LengthPolicy,
    required_names: Vec<String>,
}

impl FormValidator {
    pub fn new(form: impl Into<ElementId>, lengths: LengthPolicy) -> Self {
        Self {
            form: form.into(),
            lengths,
            required_names: Vec::new(),
        }
    }

    pub fn from_config(form: impl Into<ElementId>, config: &FormConfig) -> Self {
        Self::new(
            form,
            LengthPolicy {
                min: config.message_min,
                max: config.message_max,
            },
        )
        .with_required(config.required_fields.iter().cloned())
    }

    pub fn with_required(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.required_names.extend(names);
        self
    }

    pub fn form(&self) -> &ElementId {
        &self.form
    }

    pub fn lengths(&self) -> LengthPolicy {
        self.lengths
    }

    /// Pure rule check on a value
    pub fn check(&self, spec: &FieldSpec, value: &str) -> Result<(), FieldError> {
        let value = value.trim();
        if value.is_empty() {
            return if spec.required {
                Err(FieldError::Required)
            } else {
                Ok(())
            };
        }
        match spec.kind {
            FieldKind::Email if !is_valid_email(value) => Err(FieldError::InvalidEmail),
            FieldKind::Message => self.lengths.check(value),
            _ => Ok(()),
        }
    }

    pub fn validate(&self, spec: &FieldSpec, value: &str) -> FieldValidation {
        self.check(spec, value).into()
    }

    /// Every control of the form, in document order
    pub fn fields<L: LayoutSource + ?Sized>(&self, layout: &L) -> Vec<FieldSpec> {
        layout
            .form_fields(&self.form)
            .iter()
            .map(|id| FieldSpec::from_layout(layout, id, &self.required_names))
            .collect()
    }

    /// Validate one live field and show or clear its inline error
    pub fn validate_field<P: Page + ?Sized>(&self, field: &ElementId, page: &mut P) -> FieldValidation {
        let spec = FieldSpec::from_layout(&*page, field, &self.required_names);
        let value = page.value(field).unwrap_or_default();
        let result = self.check(&spec, &value);
        match &result {
            Ok(()) => self.clear_error(field, page),
            Err(err) => self.show_error(field, err, page),
        }
        result.into()
    }

    /// Validate every field; true when all pass
    pub fn validate_form<P: Page + ?Sized>(&self, page: &mut P) -> bool {
        let fields = page.form_fields(&self.form);
        let mut valid = true;
        for field in &fields {
            valid &= self.validate_field(field, page).valid;
        }
        tracing::debug!(fields = fields.len(), valid, "form validated");
        valid
    }

    pub fn show_error<P: Page + ?Sized>(&self, field: &ElementId, error: &FieldError, page: &mut P) {
        if !page.exists(field) {
            return;
        }
        let indicator = error_element(field);
        let parent = page.exists(&self.form).then(|| self.form.clone());
        page.create_element(&indicator, "span", parent.as_ref(), Some(field));
        page.add_class(&indicator, "field-error");
        page.set_text(&indicator, &error.to_string());
        page.add_class(field, "error");
        page.set_attribute(field, "aria-invalid", "true");
    }

    pub fn clear_error<P: Page + ?Sized>(&self, field: &ElementId, page: &mut P) {
        page.remove_element(&error_element(field));
        page.remove_class(field, "error");
        page.remove_attribute(field, "aria-invalid");
    }

    /// Reset every field value and inline error
    pub fn reset<P: Page + ?Sized>(&self, page: &mut P) {
        for field in page.form_fields(&self.form) {
            page.set_value(&field, "");
            self.clear_error(&field, page);
        }
    }
}

/// Id of the inline error element attached to `field`
pub fn error_element(field: &ElementId) -> ElementId {
    ElementId::new(format!("{field}-error"))
}
