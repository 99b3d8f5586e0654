//! Session authentication and authorization

pub mod jwt;
pub mod middleware;
pub mod session;

pub use jwt::{DecodeError, JwtService, SessionClaims, SessionUser};
pub use middleware::{extract_token, session_middleware};
pub use session::Session;
