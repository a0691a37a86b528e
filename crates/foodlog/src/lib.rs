//! `foodlog` - a local food log with on-device persistence
//!
//! This library holds the food record model, the stores that persist the
//! collection, the form controller that validates and saves entries, and the
//! list view that searches and groups them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod images;
pub mod list;
pub mod logging;
pub mod record;
pub mod state;
pub mod store;

pub use config::Config;
pub use controller::{Confirm, DeleteOutcome, FormController};
pub use error::{Error, Result};
pub use form::{FoodForm, FormError};
pub use list::{filter_by_name, ListView};
pub use logging::init_logging;
pub use record::{Category, FoodRecord, RecordId};
pub use state::AppState;
pub use store::{Backend, RecordStore};
