// Services layer - Business logic shared across stores and APIs
pub mod password;
pub mod token_service;

pub use token_service::{SessionError, TokenService};
