pub mod analytics_service;
pub mod complaint_service;
pub mod inference_service;
pub mod mock_data;
pub mod user_service;

pub use mock_data::RandomSource;
