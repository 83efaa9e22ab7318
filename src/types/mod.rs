//! Shared data structures for offshore weather-window planning
//!
//! This module defines the types flowing through the service:
//! - `HourlyObservation` / `ForecastBundle`: the normalized forecast series
//! - `LimitSet` / `Thresholds`: per-operation safety bounds
//! - `OperationType` / `OperationStatus`: the six activity categories and
//!   their go/no-go verdicts
//! - `WeatherWindow`: contiguous safe spans produced by the engine
//! - Storm / earthquake / buoy types: environmental display data

mod environment;
mod observation;
mod operations;
mod thresholds;
mod window;

pub use environment::*;
pub use observation::*;
pub use operations::*;
pub use thresholds::*;
pub use window::*;
