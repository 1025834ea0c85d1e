//! Road Ledger Library
//!
//! Records cities, the roads connecting them, and per-road budgets,
//! persisting the state as two flat text tables that survive restarts.

pub mod network;
