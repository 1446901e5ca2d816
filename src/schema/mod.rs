//! Record schema subsystem
//!
//! Defines, per entity type, the ordered field list used for serialization
//! and the constraints applied when a record is constructed.
//!
//! # Design Principles
//!
//! - One static schema per entity type
//! - Validation before any storage I/O
//! - Every violation reported, not just the first
//! - No coercion between field types

mod errors;
mod types;
mod validator;

pub use errors::{SchemaResult, ValidationError, Violation, VALIDATION_FAILED};
pub use types::{
    Constraint, EntityKind, FieldDef, FieldType, FieldValue, Schema, DATE_FORMAT, ID_COLUMN,
    MATCH_SCHEMA, REPORT_SCHEMA, TEAM_SCHEMA,
};
pub use validator::SchemaValidator;
