pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
pub mod services;

pub use domain::{DuplicateRecord, ScanConfig, ScanSummary};
pub use services::{DuplicateIndex, ScanService};
