pub mod jwt;
pub mod middleware;

pub use jwt::JwtUtils;
pub use middleware::AuthMiddleware;
