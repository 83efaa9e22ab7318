//! Weather-window evaluation engine
//!
//! The core of the service: pure, synchronous functions that evaluate an
//! hourly forecast series against per-operation limit sets.
//!
//! - [`is_within_limits`]: one observation vs one limit set
//! - [`compute_windows`]: segment a series into maximal contiguous safe runs
//! - [`summarize_operations`]: go/no-go/unknown across all six operations
//! - [`proximity_band`] / [`bands_for`]: safe/caution/exceeded banding for
//!   dashboards
//!
//! Nothing here performs I/O or reads ambient state — the registry and the
//! series are explicit parameters, so calls are deterministic and safe to
//! fan out across threads.

mod evaluate;
mod windows;

pub use evaluate::*;
pub use windows::*;
