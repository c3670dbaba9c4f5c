//! Dispatch policy and the sequential simulation driver.

pub mod policy;
pub mod simulator;

pub use policy::{DispatchAction, decide};
pub use simulator::{DEFAULT_UNIT_DISCHARGE_MWH, DispatchSimulator, TracePoint};
