pub mod api_client;
pub mod flow;
pub mod presenter;
pub mod render;
pub mod theme;
