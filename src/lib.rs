//! Grid-battery curtailment dispatch simulator.
//!
//! Replays an hourly market dataset through a charge/hold/discharge
//! policy, tracking battery state of charge and realized revenue.

pub mod battery;
pub mod config;
pub mod error;
pub mod finance;
pub mod io;
pub mod market;
pub mod report;
/// Dispatch policy and the sequential driver.
pub mod sim;
