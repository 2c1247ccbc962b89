pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::ApiError;
pub use services::api_client::{AnalysisBackend, AnalysisClient, ApiConfig};
pub use services::flow::{AnalysisSession, FlowState};
