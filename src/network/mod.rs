//! Core network store module
//!
//! This module contains the in-memory city/road/budget state and the
//! file synchronization layer. It can be driven from the console menu
//! or tested directly without any interactive input.

mod error;
mod storage;
mod store;
mod types;

pub use error::NetworkError;
pub use storage::Storage;
pub use store::NetworkStore;
pub use types::{is_valid_budget, is_valid_city_name, BUDGET_MAX, MAX_CITIES};
