//! Crate-wide error taxonomy.
//!
//! Configuration and shape-mismatch errors fail the registration that
//! raised them; only the item codec binding is best-effort (logged and
//! skipped by the builder, never surfaced through this type).

use thiserror::Error;

/// Result alias used throughout the compiler.
pub type ForgeResult<T> = Result<T, ForgeError>;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("invalid canonical name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("property '{name}' has an empty value domain")]
    EmptyDomain { name: String },

    #[error("property '{name}' mixes {first} and {second} values in one domain")]
    MixedDomain {
        name: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("property '{name}' is already declared on this definition")]
    DuplicateProperty { name: String },

    #[error("block instance factory is not set; call instance() before register()")]
    MissingFactory,

    #[error("definition '{name}' declares {count} state properties but no custom state codec; the stateless default would drop state")]
    MissingCodec { name: String, count: usize },

    #[error("{recipe} recipe applied to a block without the {recipe} capability")]
    ShapeMismatch { recipe: &'static str },

    #[error("serialized block state is missing '{name}'")]
    MissingState { name: String },

    #[error("state '{name}': expected a {expected} value, found {found}")]
    StateType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("state '{name}' value {value} is outside {min}..={max}")]
    StateRange {
        name: String,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("invalid {what} value '{value}'")]
    InvalidEnum { what: &'static str, value: String },

    #[error("palette already holds a different state for {name} meta {meta}")]
    PaletteConflict { name: String, meta: u32 },

    #[error("tag encoding failed: {message}")]
    Encode { message: String },

    #[error("descriptor decode failed: {message}")]
    Descriptor { message: String },
}
