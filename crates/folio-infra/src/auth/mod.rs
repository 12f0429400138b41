//! Identity verification implementations.

mod jwt;

pub use jwt::{JwtConfig, JwtTokenService};
