//! API route handlers
//!
//! Request handling for the operations dashboard: forecast and weather
//! windows, environment feeds (storms, seismic, buoys), persisted settings,
//! exports, and system status. All handlers are thin — they read shared
//! state, call the pure engine/report functions, and wrap the result in
//! the response envelope.

mod environment;
mod forecast;
mod reports;
mod settings;
mod status;

pub use environment::*;
pub use forecast::*;
pub use reports::*;
pub use settings::*;
pub use status::*;
