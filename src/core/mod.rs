//! Core viewer logic.
//!
//! - `controller`: fetch, classify and publish view state per identifier

pub mod controller;

pub use controller::{View, ViewController, ViewState};
