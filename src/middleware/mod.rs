pub mod role;

pub use role::{RequireRole, ROLE_HEADER};
