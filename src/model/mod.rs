pub mod auth;
pub mod catalog;
pub mod global_error;
pub mod ticket;

pub use auth::{AuthResponse, Claims, LoginRequest, RegisterRequest, UserResponse};
pub use global_error::{AppError, ErrorCode, ErrorKind};
