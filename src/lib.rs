//! highcharts-rs: typed Highcharts configuration for Rust.
//!
//! Build chart options as Rust values, render them as JavaScript object
//! literals or JSON, read existing literals back, merge configurations, and
//! render charts to images through a Highcharts export server.

pub mod api;
pub mod core;
pub mod error;
#[cfg(feature = "export-server")]
pub mod export;
pub mod extensions;
pub mod options;
pub mod telemetry;

pub use api::{Chart, ChartConstructor, SharedOptions};
pub use core::{CallbackFunction, ConfigObject, CopyPolicy, JavaScriptClass, JsValue, Nullable};
pub use error::{ChartError, ChartResult};
pub use options::Options;
