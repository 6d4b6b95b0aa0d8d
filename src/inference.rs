//! Type Inference
//!
//! Maps one schema node to exactly one [`FieldKind`]. Rules, highest
//! precedence first:
//!
//! 1. Non-empty `enum`: radio for small enums, select otherwise
//! 2. Non-null `const`: hidden
//! 3. Declared `type` (first non-`"null"` entry of a union)
//! 4. No `type`: object if `properties`, array if `items`, else text
//!
//! Rules 1 and 2 win even over an explicit `object`/`array` type.

use crate::config::ConvertConfig;
use crate::form::FieldKind;
use crate::schema::Schema;

/// Infer the field kind using default thresholds
pub fn infer_kind(schema: &Schema) -> FieldKind {
    infer_kind_with(schema, &ConvertConfig::default())
}

/// Infer the field kind using the thresholds in `config`
pub fn infer_kind_with(schema: &Schema, config: &ConvertConfig) -> FieldKind {
    if !schema.enum_values.is_empty() {
        return enum_kind(schema.enum_values.len(), config);
    }

    if schema.const_value.is_some() {
        return FieldKind::Hidden;
    }

    match schema.declared_types() {
        Some(types) => match types.into_iter().find(|t| *t != "null") {
            Some(type_name) => map_type_name(type_name, schema, config),
            None => FieldKind::Text,
        },
        None => {
            if schema.properties.is_some() {
                FieldKind::Object
            } else if schema.items.is_some() {
                FieldKind::Array
            } else {
                FieldKind::Text
            }
        }
    }
}

/// Radio for at most `radio_max_options` entries, select beyond
pub fn enum_kind(option_count: usize, config: &ConvertConfig) -> FieldKind {
    if option_count <= config.radio_max_options {
        FieldKind::Radio
    } else {
        FieldKind::Select
    }
}

fn map_type_name(type_name: &str, schema: &Schema, config: &ConvertConfig) -> FieldKind {
    match type_name {
        "string" => string_kind(schema, config),
        "number" | "integer" => FieldKind::Number,
        "boolean" => FieldKind::Checkbox,
        "array" => FieldKind::Array,
        "object" => FieldKind::Object,
        _ => FieldKind::Text,
    }
}

fn string_kind(schema: &Schema, config: &ConvertConfig) -> FieldKind {
    match schema.format.as_deref() {
        Some("email") => FieldKind::Email,
        Some("uri") | Some("url") => FieldKind::Url,
        Some("date") => FieldKind::Date,
        Some("time") => FieldKind::Time,
        Some("date-time") => FieldKind::DateTime,
        Some("password") => FieldKind::Password,
        _ => match schema.max_length {
            Some(max) if max > config.textarea_threshold => FieldKind::Textarea,
            _ => FieldKind::Text,
        },
    }
}
