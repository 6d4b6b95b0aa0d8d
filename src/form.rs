//! Field tree: the normalized, renderable form definition

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::value::Scalar;

// =============================================================================
// Field Kind
// =============================================================================

/// The control type of a field
///
/// Serialized as the HTML input type. `Unrecognized` only arises when a
/// caller-supplied form is decoded; the validator rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Password,
    Number,
    Tel,
    Url,
    Date,
    Time,
    DateTime,
    Month,
    Week,
    Textarea,
    Select,
    Checkbox,
    Radio,
    File,
    Hidden,
    Object,
    Array,
    Unrecognized(String),
}

impl FieldKind {
    /// All recognized kinds
    pub const ALL: [FieldKind; 19] = [
        FieldKind::Text,
        FieldKind::Email,
        FieldKind::Password,
        FieldKind::Number,
        FieldKind::Tel,
        FieldKind::Url,
        FieldKind::Date,
        FieldKind::Time,
        FieldKind::DateTime,
        FieldKind::Month,
        FieldKind::Week,
        FieldKind::Textarea,
        FieldKind::Select,
        FieldKind::Checkbox,
        FieldKind::Radio,
        FieldKind::File,
        FieldKind::Hidden,
        FieldKind::Object,
        FieldKind::Array,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Number => "number",
            FieldKind::Tel => "tel",
            FieldKind::Url => "url",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::DateTime => "datetime-local",
            FieldKind::Month => "month",
            FieldKind::Week => "week",
            FieldKind::Textarea => "textarea",
            FieldKind::Select => "select",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::File => "file",
            FieldKind::Hidden => "hidden",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
            FieldKind::Unrecognized(other) => other,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, FieldKind::Unrecognized(_))
    }

    /// text, email, password, url, tel, textarea
    pub fn is_text_like(&self) -> bool {
        matches!(
            self,
            FieldKind::Text
                | FieldKind::Email
                | FieldKind::Password
                | FieldKind::Url
                | FieldKind::Tel
                | FieldKind::Textarea
        )
    }

    /// date, time, datetime, month, week
    pub fn is_date_like(&self) -> bool {
        matches!(
            self,
            FieldKind::Date | FieldKind::Time | FieldKind::DateTime | FieldKind::Month | FieldKind::Week
        )
    }

    /// checkbox, radio, select
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldKind::Checkbox | FieldKind::Radio | FieldKind::Select)
    }

    /// Kinds allowed to carry nested fields
    pub fn is_container(&self) -> bool {
        matches!(self, FieldKind::Object | FieldKind::Array)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(FieldKind::ALL
            .iter()
            .find(|kind| kind.as_str() == s)
            .cloned()
            .unwrap_or_else(|| FieldKind::Unrecognized(s.to_string())))
    }
}

impl From<String> for FieldKind {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

// =============================================================================
// Options, Validation, Conditionals
// =============================================================================

/// A choice for select, radio or checkbox fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: Scalar,
}

impl FieldOption {
    /// Option whose label is the stringified value
    pub fn from_value(value: Scalar) -> Self {
        Self {
            label: value.to_string(),
            value,
        }
    }
}

/// Validation rules attached to a field
///
/// Exclusive and inclusive numeric bounds share `min`/`max`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
}

impl Validation {
    /// A block with only `required` set
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// True when no rule at all is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn has_length_bounds(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }

    /// min, max or step
    pub fn has_numeric_bounds(&self) -> bool {
        self.min.is_some() || self.max.is_some() || self.step.is_some()
    }

    pub fn has_item_bounds(&self) -> bool {
        self.min_items.is_some() || self.max_items.is_some()
    }
}

/// Alternate child fields shown depending on another field's value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionalField {
    /// Name of the sibling field that gates visibility
    pub condition: String,
    /// Value that triggers the `then` branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    #[serde(default)]
    pub then: Vec<Field>,
    #[serde(rename = "else", default, skip_serializing_if = "Vec::is_empty")]
    pub otherwise: Vec<Field>,
}

// =============================================================================
// Field & Form
// =============================================================================

/// A single renderable form control
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Scalar>,
    /// Fixed value (from `const`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// Nested fields for object and array kinds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<ConditionalField>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help_text: String,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_conditional(mut self, conditional: ConditionalField) -> Self {
        self.conditional = Some(conditional);
        self
    }

    /// Whether the field carries `required = true`
    pub fn is_required(&self) -> bool {
        self.validation.as_ref().is_some_and(|v| v.required)
    }

    /// Mark the field required, creating the validation block if needed
    pub fn set_required(&mut self) {
        self.validation.get_or_insert_with(Validation::default).required = true;
    }
}

/// A complete form definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Form {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Decode a form definition from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every structural invariant; see [`crate::validate`]
    pub fn validate(&self) -> Result<()> {
        crate::validate::FormValidator::new().validate(self)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}
