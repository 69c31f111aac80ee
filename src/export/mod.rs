//! Client for the Highcharts export server, which renders charts to images.

pub mod config;
pub mod request;
pub mod server;

pub use config::ExportServerConfig;
pub use request::{ExportRequest, ExportResources};
pub use server::{ExportServer, ExportedChart};

pub use crate::options::ExportFormat;
