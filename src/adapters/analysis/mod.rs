//! Analysis Client Adapters.
//!
//! - `HttpAnalysisClient` - reqwest client for the remote analysis service
//! - `MockAnalysisClient` - Configurable mock for testing

mod http_client;
mod mock_client;

pub use http_client::HttpAnalysisClient;
pub use mock_client::MockAnalysisClient;
