//! Schema → Form conversion
//!
//! Walks a [`Schema`] tree and builds the equivalent [`Form`] field tree.
//! Properties are always emitted in lexicographic order of their names, so
//! the same schema converts to the same form on every run.
//!
//! The converter never validates its output; call [`Form::validate`] before
//! handing the result to a renderer.

use tracing::{debug, trace};

use crate::config::ConvertConfig;
use crate::error::{FormError, Result};
use crate::form::{ConditionalField, Field, FieldKind, FieldOption, Form, Validation};
use crate::inference::infer_kind_with;
use crate::schema::Schema;
use crate::value::Scalar;

/// Name given to the synthetic child describing array items
pub const ARRAY_ITEM_NAME: &str = "item";

/// Convert a root schema with default settings
pub fn convert_form(schema: Option<&Schema>) -> Result<Form> {
    SchemaConverter::default().convert_form(schema)
}

/// Converts schema trees into form trees
#[derive(Debug, Clone, Default)]
pub struct SchemaConverter {
    config: ConvertConfig,
}

impl SchemaConverter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert a root schema into a form
    ///
    /// An object-style root (one with `properties`) yields one field per
    /// property; any other root yields a single anonymous field.
    pub fn convert_form(&self, schema: Option<&Schema>) -> Result<Form> {
        let schema = schema.ok_or_else(|| FormError::structural("schema cannot be nil"))?;

        let fields = if schema.properties.is_some() {
            self.convert_properties(schema)
        } else {
            self.convert("", Some(schema)).into_iter().collect()
        };

        debug!(fields = fields.len(), "converted schema to form");

        Ok(Form {
            title: schema.title.clone().unwrap_or_default(),
            description: schema.description.clone().unwrap_or_default(),
            action: String::new(),
            method: Some(self.config.method.clone()),
            fields,
        })
    }

    /// Convert `parent`'s properties into sibling fields, marking the ones
    /// it lists as required
    pub fn convert_properties(&self, parent: &Schema) -> Vec<Field> {
        parent
            .properties
            .iter()
            .flatten()
            .filter_map(|(name, schema)| {
                let mut field = self.convert(name, schema.as_ref())?;
                if parent.is_required(name) {
                    field.set_required();
                }
                Some(field)
            })
            .collect()
    }

    /// Convert a single schema node; a null schema produces no field
    pub fn convert(&self, name: &str, schema: Option<&Schema>) -> Option<Field> {
        let Some(schema) = schema else {
            trace!(field = name, "skipping null sub-schema");
            return None;
        };

        let kind = infer_kind_with(schema, &self.config);

        let mut field = Field {
            label: schema.title.clone().unwrap_or_default(),
            description: schema.description.clone().unwrap_or_default(),
            default: schema.default.clone(),
            read_only: schema.read_only.unwrap_or(false),
            deprecated: schema.deprecated.unwrap_or(false),
            validation: self.build_validation(schema),
            ..Field::new(name, kind.clone())
        };

        if !schema.enum_values.is_empty() {
            field.options = schema.enum_values.iter().cloned().map(FieldOption::from_value).collect();
        } else if let Some(value) = &schema.const_value {
            field.value = Some(value.clone());
        }

        match kind {
            FieldKind::Object => {
                field.fields = self.convert_properties(schema);
            }
            FieldKind::Array => {
                if let Some(item) = self.convert(ARRAY_ITEM_NAME, schema.items.as_deref()) {
                    field.fields = vec![item];
                }
                if schema.min_items.is_some() || schema.max_items.is_some() {
                    let validation = field.validation.get_or_insert_with(Validation::default);
                    validation.min_items = schema.min_items;
                    validation.max_items = schema.max_items;
                }
            }
            _ => {}
        }

        if schema.if_schema.is_some() {
            field.conditional = self.build_conditional(schema);
        }

        Some(field)
    }

    /// Copy string and numeric keywords into a validation block
    ///
    /// Exclusive bounds overwrite inclusive ones. Returns `None` rather than
    /// an empty block when no keyword is present.
    fn build_validation(&self, schema: &Schema) -> Option<Validation> {
        let pattern = schema.pattern.clone().filter(|p| !p.is_empty());
        let validation = Validation {
            min_length: schema.min_length,
            max_length: schema.max_length,
            pattern_error: pattern.as_ref().map(|_| self.config.pattern_error.clone()),
            pattern,
            min: schema.exclusive_minimum.or(schema.minimum),
            max: schema.exclusive_maximum.or(schema.maximum),
            step: schema.multiple_of,
            ..Validation::default()
        };

        (!validation.is_empty()).then_some(validation)
    }

    /// Build the conditional block from `if`/`then`/`else`
    ///
    /// The gating field is the lexicographically smallest property of the
    /// `if` schema. Without one, no conditional is attached.
    fn build_conditional(&self, schema: &Schema) -> Option<ConditionalField> {
        let if_schema = schema.if_schema.as_deref()?;
        let (condition, condition_schema) = if_schema.properties.as_ref()?.iter().next()?;

        Some(ConditionalField {
            condition: condition.clone(),
            value: condition_schema.as_ref().and_then(trigger_value),
            then: self.convert_branch(schema.then_schema.as_deref()),
            otherwise: self.convert_branch(schema.else_schema.as_deref()),
        })
    }

    fn convert_branch(&self, branch: Option<&Schema>) -> Vec<Field> {
        branch.map(|schema| self.convert_properties(schema)).unwrap_or_default()
    }
}

/// `const`, or the sole entry of a one-element `enum`
fn trigger_value(schema: &Schema) -> Option<Scalar> {
    match (&schema.const_value, schema.enum_values.as_slice()) {
        (Some(value), _) => Some(value.clone()),
        (None, [only]) => Some(only.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    fn form_of(value: serde_json::Value) -> Form {
        convert_form(Some(&schema(value))).unwrap()
    }

    #[test]
    fn test_nil_schema() {
        let err = convert_form(None).unwrap_err();
        assert!(matches!(err, FormError::Structural(_)));
        assert_eq!(err.to_string(), "schema cannot be nil");
    }

    #[test]
    fn test_form_metadata() {
        let form = form_of(json!({
            "title": "User Form",
            "description": "A form for user information",
            "type": "object",
            "properties": {"email": {"type": "string"}}
        }));
        assert_eq!(form.title, "User Form");
        assert_eq!(form.description, "A form for user information");
        assert_eq!(form.method.as_deref(), Some("POST"));
        assert!(form.action.is_empty());
    }

    #[test]
    fn test_required_properties() {
        let form = form_of(json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "title": "Name"},
                "age": {"type": "integer", "title": "Age"}
            },
            "required": ["name"]
        }));
        assert_eq!(form.fields.len(), 2);
        let name = form.fields.iter().find(|f| f.name == "name").unwrap();
        assert!(name.is_required());
        assert_eq!(name.validation, Some(Validation::required()));
        let age = form.fields.iter().find(|f| f.name == "age").unwrap();
        assert!(age.validation.is_none());
    }

    #[test]
    fn test_required_merges_into_existing_validation() {
        let form = form_of(json!({
            "properties": {"code": {"type": "string", "minLength": 2}},
            "required": ["code", "missing"]
        }));
        let validation = form.fields[0].validation.as_ref().unwrap();
        assert!(validation.required);
        assert_eq!(validation.min_length, Some(2));
    }

    #[test]
    fn test_property_order_is_lexicographic() {
        let form = form_of(json!({
            "properties": {
                "zeta": {"type": "string"},
                "alpha": {"type": "string"},
                "Mid": {"type": "string"},
                "beta": {"type": "string"}
            }
        }));
        let names: Vec<_> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Mid", "alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_null_property_is_omitted() {
        let form = form_of(json!({
            "properties": {"a": null, "b": {"type": "boolean"}},
            "required": ["a"]
        }));
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.fields[0].name, "b");
        assert_eq!(form.fields[0].kind, FieldKind::Checkbox);
    }

    #[test]
    fn test_single_field_root() {
        let form = form_of(json!({"type": "string", "title": "Name"}));
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.fields[0].name, "");
        assert_eq!(form.fields[0].kind, FieldKind::Text);
        assert_eq!(form.fields[0].label, "Name");
    }

    #[test]
    fn test_metadata_copy() {
        let form = form_of(json!({
            "properties": {
                "nick": {
                    "type": "string",
                    "title": "Nickname",
                    "description": "What friends call you",
                    "default": "bob",
                    "readOnly": true,
                    "deprecated": true
                }
            }
        }));
        let field = &form.fields[0];
        assert_eq!(field.label, "Nickname");
        assert_eq!(field.description, "What friends call you");
        assert_eq!(field.default, Some(Scalar::from("bob")));
        assert!(field.read_only);
        assert!(field.deprecated);
    }

    #[test]
    fn test_enum_options() {
        let form = form_of(json!({"type": "integer", "enum": [1, 2.5, 3]}));
        let field = &form.fields[0];
        assert_eq!(field.kind, FieldKind::Radio);
        let labels: Vec<_> = field.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "2.5", "3"]);
        assert_eq!(field.options[1].value, Scalar::Number(2.5));
    }

    #[test]
    fn test_const_becomes_hidden() {
        let form = form_of(json!({"properties": {"version": {"type": "string", "const": "v2"}}}));
        let field = &form.fields[0];
        assert_eq!(field.kind, FieldKind::Hidden);
        assert_eq!(field.value, Some(Scalar::from("v2")));
    }

    #[test]
    fn test_string_validation() {
        let form = form_of(json!({"type": "string", "minLength": 3, "maxLength": 20, "pattern": "^[a-z]+$"}));
        let validation = form.fields[0].validation.as_ref().unwrap();
        assert_eq!(validation.min_length, Some(3));
        assert_eq!(validation.max_length, Some(20));
        assert_eq!(validation.pattern.as_deref(), Some("^[a-z]+$"));
        assert_eq!(validation.pattern_error.as_deref(), Some("Invalid format"));
        assert!(!validation.required);
    }

    #[test]
    fn test_empty_pattern_is_skipped() {
        let form = form_of(json!({"type": "string", "pattern": ""}));
        assert!(form.fields[0].validation.is_none());

        let form = form_of(json!({"type": "string", "pattern": "", "maxLength": 4}));
        let validation = form.fields[0].validation.as_ref().unwrap();
        assert!(validation.pattern.is_none());
        assert!(validation.pattern_error.is_none());
        assert_eq!(validation.max_length, Some(4));
    }

    #[test]
    fn test_non_scalar_defaults_still_convert() {
        let form = form_of(json!({
            "properties": {
                "tags": {"type": "array", "items": {"type": "string"}, "default": []},
                "meta": {"type": "object", "properties": {"k": {"type": "string"}}, "default": {}},
                "name": {"type": "string", "default": "anon"}
            }
        }));
        let names: Vec<_> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["meta", "name", "tags"]);
        assert!(form.fields[0].default.is_none());
        assert_eq!(form.fields[1].default, Some(Scalar::from("anon")));
        assert!(form.fields[2].default.is_none());
        assert_eq!(form.fields[2].fields[0].kind, FieldKind::Text);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_numeric_validation_collapses_exclusive_bounds() {
        let form = form_of(json!({
            "type": "number",
            "minimum": 0,
            "exclusiveMinimum": 1,
            "maximum": 10,
            "multipleOf": 0.5
        }));
        let validation = form.fields[0].validation.as_ref().unwrap();
        assert_eq!(validation.min, Some(1.0));
        assert_eq!(validation.max, Some(10.0));
        assert_eq!(validation.step, Some(0.5));
    }

    #[test]
    fn test_no_keywords_means_no_validation() {
        let form = form_of(json!({"type": "number"}));
        assert!(form.fields[0].validation.is_none());
    }

    #[test]
    fn test_nested_object() {
        let form = form_of(json!({
            "properties": {
                "address": {
                    "type": "object",
                    "properties": {
                        "street": {"type": "string"},
                        "city": {"type": "string"}
                    },
                    "required": ["city"]
                }
            }
        }));
        let address = &form.fields[0];
        assert_eq!(address.kind, FieldKind::Object);
        let names: Vec<_> = address.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["city", "street"]);
        assert!(address.fields[0].is_required());
        assert!(!address.fields[1].is_required());
    }

    #[test]
    fn test_array_items_and_bounds() {
        let form = form_of(json!({
            "properties": {
                "tags": {
                    "type": "array",
                    "items": {"type": "string", "maxLength": 30},
                    "minItems": 1,
                    "maxItems": 5
                }
            }
        }));
        let tags = &form.fields[0];
        assert_eq!(tags.kind, FieldKind::Array);
        assert_eq!(tags.fields.len(), 1);
        assert_eq!(tags.fields[0].name, ARRAY_ITEM_NAME);
        assert_eq!(tags.fields[0].validation.as_ref().unwrap().max_length, Some(30));
        let validation = tags.validation.as_ref().unwrap();
        assert_eq!(validation.min_items, Some(1));
        assert_eq!(validation.max_items, Some(5));
    }

    #[test]
    fn test_item_bounds_ignored_outside_arrays() {
        let form = form_of(json!({"type": "string", "minItems": 1}));
        assert!(form.fields[0].validation.is_none());
    }

    #[test]
    fn test_enum_on_object_suppresses_children() {
        let form = form_of(json!({
            "properties": {
                "choice": {
                    "type": "object",
                    "enum": ["a", "b"],
                    "properties": {"x": {"type": "string"}}
                }
            }
        }));
        let field = &form.fields[0];
        assert_eq!(field.kind, FieldKind::Radio);
        assert!(field.fields.is_empty());
    }

    #[test]
    fn test_conditional() {
        let form = form_of(json!({
            "properties": {
                "account": {
                    "type": "object",
                    "properties": {"kind": {"type": "string"}},
                    "if": {"properties": {"kind": {"const": "company"}, "country": {}}},
                    "then": {"properties": {"vat": {"type": "string"}}, "required": ["vat"]},
                    "else": {"properties": {"birthday": {"type": "string", "format": "date"}}}
                }
            }
        }));
        let conditional = form.fields[0].conditional.as_ref().unwrap();
        // "country" < "kind"
        assert_eq!(conditional.condition, "country");
        assert!(conditional.value.is_none());
        assert_eq!(conditional.then.len(), 1);
        assert!(conditional.then[0].is_required());
        assert_eq!(conditional.otherwise[0].kind, FieldKind::Date);
    }

    #[test]
    fn test_conditional_trigger_value() {
        let form = form_of(json!({
            "type": "boolean",
            "if": {"properties": {"subscribe": {"const": true}}},
            "then": {"properties": {"email": {"type": "string", "format": "email"}}}
        }));
        let conditional = form.fields[0].conditional.as_ref().unwrap();
        assert_eq!(conditional.condition, "subscribe");
        assert_eq!(conditional.value, Some(Scalar::Bool(true)));
        assert!(conditional.otherwise.is_empty());

        let single_enum = form_of(json!({
            "if": {"properties": {"plan": {"enum": ["pro"]}}}
        }));
        let conditional = single_enum.fields[0].conditional.as_ref().unwrap();
        assert_eq!(conditional.value, Some(Scalar::from("pro")));
        assert!(conditional.then.is_empty());
    }

    #[test]
    fn test_conditional_without_condition_is_dropped() {
        let form = form_of(json!({
            "type": "string",
            "if": {"type": "string"},
            "then": {"properties": {"x": {"type": "string"}}}
        }));
        assert!(form.fields[0].conditional.is_none());

        let empty = form_of(json!({"type": "string", "if": {"properties": {}}}));
        assert!(empty.fields[0].conditional.is_none());
    }

    #[test]
    fn test_custom_config() {
        let converter = SchemaConverter::new(ConvertConfig {
            method: "GET".to_string(),
            pattern_error: "Does not match".to_string(),
            ..ConvertConfig::default()
        });
        let form = converter
            .convert_form(Some(&schema(json!({"type": "string", "pattern": "^x"}))))
            .unwrap();
        assert_eq!(form.method.as_deref(), Some("GET"));
        assert_eq!(
            form.fields[0].validation.as_ref().unwrap().pattern_error.as_deref(),
            Some("Does not match")
        );
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let input = schema(json!({
            "properties": {
                "c": {"type": "string"},
                "a": {"type": "object", "properties": {"y": {}, "x": {}}},
                "b": {"enum": [1, 2, 3, 4, 5]}
            }
        }));
        let first = convert_form(Some(&input)).unwrap();
        let second = convert_form(Some(&input)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }
}
