//! Form From Schema
//!
//! Converts JSON Schema documents into normalized, renderable form
//! definitions, and certifies that a form definition is internally consistent
//! before it is used to emit markup.
//!
//! ## Features
//!
//! - **Type Inference**: each schema node maps to exactly one of 19 field kinds
//! - **Deterministic Conversion**: properties are emitted in lexicographic order
//! - **Conditionals**: `if`/`then`/`else` become gated alternate field lists
//! - **Validation**: per-scope name, kind, option and bound invariants, first error wins
//!
//! ## Pipeline
//!
//! ```text
//! JSON bytes ──decode──▶ Schema ──convert──▶ Form ──validate──▶ renderer
//! ```
//!
//! The converter does not validate; callers that mutate or receive forms
//! must run [`Form::validate`] before rendering.

pub mod config;
pub mod convert;
pub mod error;
pub mod form;
pub mod inference;
pub mod schema;
pub mod validate;
pub mod value;

pub use config::{ConvertConfig, FormConfig, OutputFormat};
pub use convert::{convert_form, SchemaConverter};
pub use error::{FormError, Result};
pub use form::{ConditionalField, Field, FieldKind, FieldOption, Form, Validation};
pub use inference::{infer_kind, infer_kind_with};
pub use schema::{Schema, SchemaType};
pub use validate::{validate_form, FormValidator};
pub use value::Scalar;

/// Decode a JSON Schema document and convert it into a form
///
/// The returned form is NOT validated.
pub fn from_json_schema(bytes: &[u8]) -> Result<Form> {
    let schema = Schema::from_slice(bytes)?;
    convert_form(Some(&schema))
}
