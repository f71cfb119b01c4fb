/// Authentication module
///
/// Password hashing, access-token minting/verification, refresh-token
/// lifecycle and the login/refresh facade.

mod claims;
mod jwt;
mod password;
mod refresh_token;
mod service;

pub use claims::Claims;
pub use jwt::{TokenIssuer, REFRESH_TOKEN_BYTES};
pub use password::{hash_password, verify_password, HASH_COST, MAX_PASSWORD_BYTES};
pub use refresh_token::TokenLifecycle;
pub use service::{AuthService, LoginOutcome};
