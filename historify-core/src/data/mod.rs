//! Access to the dashboard backend.

pub mod http;
pub mod provider;
pub mod sample;

pub use http::HttpApi;
pub use provider::{ApiError, DashboardApi};
pub use sample::{SampleApi, SAMPLE_BACKTEST_ID};
