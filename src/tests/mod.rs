//! Cross-module tests.
//!
//! These drive the gallery through ingestion, store, persistence and view
//! together, the way the browser build wires them.

mod scenario_tests;
