//! Export surfaces: CSV downloads and the printable HTML report.
//!
//! Everything here is pure string assembly over already-fetched data; the
//! API layer wraps these in download responses and the offline binary
//! writes them to disk.

pub mod csv;
pub mod html;

pub use csv::{buoy_csv, buoy_filename, weather_csv, weather_filename, windows_csv, windows_filename};
pub use html::forecast_report;
