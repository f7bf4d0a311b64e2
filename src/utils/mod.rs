//! Utility modules
//!
//! This module contains common utilities used throughout the crate,
//! including error handling, logging setup, validation and date helpers.

pub mod dates;
pub mod errors;
pub mod helpers;
pub mod logging;
pub mod validation;

pub use errors::{ActionResult, CampusEventsError, ErrorKind, Result};
pub use validation::ValidationErrors;
