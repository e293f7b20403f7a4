//! Shared utilities and types for feature modules
//!
//! # Contents
//!
//! - **validation**: Field validators used by every command
//! - **error_helpers**: Database constraint-violation classification
//! - **identity**: "Next id" display helpers
//! - **test_helpers**: Test fixtures and utilities (test-only)

pub mod error_helpers;
pub mod identity;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use identity::{next_id, IdSequence, NextIdError, NextIdResponse};
pub use validation::{
    validate_accuracy, validate_coordinates, validate_required_text, CoordinateValue,
    CoordinatesValidationError,
};
