pub mod action;
pub mod analytics;
pub mod complaint;
pub mod feedback;
pub mod ml_data;
pub mod user;

pub use action::*;
pub use analytics::*;
pub use complaint::*;
pub use feedback::*;
pub use ml_data::*;
pub use user::*;
