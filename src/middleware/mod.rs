/// Middleware module
///
/// Bearer-token authentication for the protected scopes.

mod jwt_middleware;

pub use jwt_middleware::JwtMiddleware;
