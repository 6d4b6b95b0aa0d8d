//! Form Validation Engine
//!
//! Certifies that a [`Form`] is internally consistent before it is rendered.
//! The walk is depth-first and stops at the first violation.
//!
//! ## Traversal
//!
//! For each field, in list order:
//! 1. name pattern and reserved words, then registration in the enclosing scope
//! 2. kind, options and validation rules
//! 3. nested `fields`, in a fresh scope
//! 4. the conditional: its `condition` is resolved against the enclosing
//!    scope, then `then` and `else` are each walked in a fresh scope
//!
//! A field registers its own name before its conditional is checked, so a
//! conditional may reference any earlier sibling. It may not reference the
//! field it is attached to.

use std::collections::HashSet;

use regex::Regex;
use tracing::{debug, trace};

use crate::error::{FormError, Result};
use crate::form::{ConditionalField, Field, FieldKind, FieldOption, Form, Validation};

/// Names that clash with form controls when rendered (compared case-insensitively)
pub const RESERVED_NAMES: [&str; 6] = ["submit", "reset", "button", "form", "fieldset", "legend"];

/// Accepted values for [`Form::method`] (compared case-insensitively)
pub const HTTP_METHODS: [&str; 7] = ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

const FIELD_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_.-]*$";

/// Validate a form with a fresh validator
pub fn validate_form(form: &Form) -> Result<()> {
    FormValidator::new().validate(form)
}

// =============================================================================
// Scope
// =============================================================================

/// Field names registered at one nesting level
///
/// Every object/array body and every conditional branch gets its own scope;
/// scopes never see each other's names.
#[derive(Debug, Default)]
pub struct Scope {
    names: HashSet<String>,
}

impl Scope {
    /// Register a name; returns false if it was already present
    pub fn register(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Validates form trees; holds no state between calls
pub struct FormValidator {
    name_pattern: Regex,
}

impl Default for FormValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FormValidator {
    pub fn new() -> Self {
        Self {
            name_pattern: Regex::new(FIELD_NAME_PATTERN).expect("field name pattern is valid"),
        }
    }

    /// Check every invariant, returning the first violation found
    pub fn validate(&self, form: &Form) -> Result<()> {
        let result = self.validate_form(form);
        match &result {
            Ok(()) => debug!(fields = form.fields.len(), "form is valid"),
            Err(err) => debug!(path = err.path().unwrap_or(""), error = %err, "form validation failed"),
        }
        result
    }

    fn validate_form(&self, form: &Form) -> Result<()> {
        if form.fields.is_empty() {
            return Err(FormError::structural("form must have at least one field"));
        }

        if let Some(method) = form.method.as_deref().filter(|m| !m.is_empty()) {
            if !HTTP_METHODS.contains(&method.to_uppercase().as_str()) {
                return Err(FormError::constraint(
                    "method",
                    format!(
                        "invalid HTTP method: {} (must be one of: {})",
                        method,
                        HTTP_METHODS.join(", ")
                    ),
                ));
            }
        }

        self.validate_scope(&form.fields, "fields")
    }

    /// Walk sibling fields in a fresh scope; `prefix` is the list's path
    fn validate_scope(&self, fields: &[Field], prefix: &str) -> Result<()> {
        trace!(prefix, count = fields.len(), "entering scope");
        let mut scope = Scope::default();
        for (i, field) in fields.iter().enumerate() {
            let path = format!("{}[{}]", prefix, i);
            self.validate_field(field, &mut scope, &path)?;
        }
        Ok(())
    }

    fn validate_field(&self, field: &Field, scope: &mut Scope, path: &str) -> Result<()> {
        self.validate_name(&field.name, path)?;

        if !field.name.is_empty() && !scope.register(&field.name) {
            return Err(FormError::name(
                path,
                format!("duplicate field name '{}' at the same level", field.name),
            ));
        }

        if !field.kind.is_recognized() {
            return Err(FormError::kind(path, format!("invalid field type '{}'", field.kind)));
        }

        validate_options(&field.kind, &field.options, path)?;

        if let Some(validation) = &field.validation {
            validate_rules(validation, &field.kind, path)?;
        }

        if !field.fields.is_empty() {
            if !field.kind.is_container() {
                return Err(FormError::kind(
                    path,
                    format!(
                        "fields with nested Fields must have type 'object' or 'array', got '{}'",
                        field.kind
                    ),
                ));
            }
            self.validate_scope(&field.fields, &format!("{}.fields", path))?;
        }

        if let Some(conditional) = &field.conditional {
            self.validate_conditional(field, conditional, scope, path)?;
        }

        Ok(())
    }

    /// Empty names are allowed (anonymous single-field forms)
    fn validate_name(&self, name: &str, path: &str) -> Result<()> {
        if name.is_empty() {
            return Ok(());
        }

        if !self.name_pattern.is_match(name) {
            return Err(FormError::name(
                path,
                format!(
                    "invalid field name '{}' (must start with letter/underscore and contain only letters, digits, underscores, hyphens, and dots)",
                    name
                ),
            ));
        }

        if RESERVED_NAMES.contains(&name.to_lowercase().as_str()) {
            return Err(FormError::name(
                path,
                format!("field name '{}' is reserved and cannot be used", name),
            ));
        }

        Ok(())
    }

    fn validate_conditional(
        &self,
        field: &Field,
        conditional: &ConditionalField,
        scope: &Scope,
        path: &str,
    ) -> Result<()> {
        if conditional.condition.is_empty() {
            return Err(FormError::reference(
                path,
                "conditional field must specify a condition field name",
            ));
        }

        if conditional.condition == field.name {
            return Err(FormError::reference(
                path,
                format!("conditional field cannot reference itself ('{}')", field.name),
            ));
        }

        if !scope.contains(&conditional.condition) {
            return Err(FormError::reference(
                path,
                format!("conditional field references non-existent field '{}'", conditional.condition),
            ));
        }

        self.validate_scope(&conditional.then, &format!("{}.conditional.then", path))?;
        self.validate_scope(&conditional.otherwise, &format!("{}.conditional.else", path))
    }
}

// =============================================================================
// Per-field rules
// =============================================================================

fn validate_options(kind: &FieldKind, options: &[FieldOption], path: &str) -> Result<()> {
    match kind {
        FieldKind::Select | FieldKind::Radio => {
            if options.is_empty() {
                return Err(FormError::constraint(
                    path,
                    format!("field type '{}' requires at least one option", kind),
                ));
            }
            ensure_unique_options(options, path)
        }
        FieldKind::Checkbox => ensure_unique_options(options, path),
        _ if kind.is_text_like() || kind.is_date_like() || *kind == FieldKind::Number => {
            if options.is_empty() {
                Ok(())
            } else {
                Err(FormError::constraint(
                    path,
                    format!("field type '{}' cannot have options", kind),
                ))
            }
        }
        _ => Ok(()),
    }
}

/// Option values must differ once stringified
fn ensure_unique_options(options: &[FieldOption], path: &str) -> Result<()> {
    let mut seen = HashSet::with_capacity(options.len());
    for (i, option) in options.iter().enumerate() {
        let value = option.value.to_string();
        if !seen.insert(value.clone()) {
            return Err(FormError::constraint(
                path,
                format!("duplicate option value '{}' at options[{}]", value, i),
            ));
        }
    }
    Ok(())
}

fn validate_rules(validation: &Validation, kind: &FieldKind, path: &str) -> Result<()> {
    validate_bounds(validation, path)?;
    validate_applicability(validation, kind, path)
}

fn validate_bounds(v: &Validation, path: &str) -> Result<()> {
    let err = |message: String| -> Result<()> { Err(FormError::constraint(path, message)) };

    if v.min_length.is_some_and(|n| n < 0) {
        return err("validation.minLength cannot be negative".to_string());
    }
    if v.max_length.is_some_and(|n| n < 0) {
        return err("validation.maxLength cannot be negative".to_string());
    }
    if let (Some(min), Some(max)) = (v.min_length, v.max_length) {
        if min > max {
            return err(format!(
                "validation.minLength ({}) cannot be greater than maxLength ({})",
                min, max
            ));
        }
    }

    if let (Some(min), Some(max)) = (v.min, v.max) {
        if min > max {
            return err(format!("validation.min ({}) cannot be greater than max ({})", min, max));
        }
    }

    if v.min_items.is_some_and(|n| n < 0) {
        return err("validation.minItems cannot be negative".to_string());
    }
    if v.max_items.is_some_and(|n| n < 0) {
        return err("validation.maxItems cannot be negative".to_string());
    }
    if let (Some(min), Some(max)) = (v.min_items, v.max_items) {
        if min > max {
            return err(format!(
                "validation.minItems ({}) cannot be greater than maxItems ({})",
                min, max
            ));
        }
    }

    if let Some(step) = v.step {
        // NaN fails too
        if !(step > 0.0) {
            return err(format!("validation.step must be positive, got {}", step));
        }
    }

    Ok(())
}

/// Length bounds belong to text-like kinds, numeric bounds to `number` and
/// item bounds to `array`. `required` and `pattern` fit every kind.
fn validate_applicability(v: &Validation, kind: &FieldKind, path: &str) -> Result<()> {
    let not_applicable = |rules: &str| -> Result<()> {
        Err(FormError::constraint(
            path,
            format!("validation rules {} are not applicable for field type '{}'", rules, kind),
        ))
    };

    let length = !kind.is_text_like();
    let numeric = *kind != FieldKind::Number;
    let items = *kind != FieldKind::Array;

    if length && v.has_length_bounds() {
        return not_applicable("minLength/maxLength");
    }
    if numeric && v.has_numeric_bounds() {
        return not_applicable("min/max/step");
    }
    if items && v.has_item_bounds() {
        return not_applicable("minItems/maxItems");
    }

    Ok(())
}
