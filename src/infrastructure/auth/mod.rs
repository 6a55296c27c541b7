//! Authentication infrastructure module
//!
//! This module provides JWT session tokens for user authentication.

mod jwt;

pub use jwt::{IssuedToken, JwtClaims, JwtConfig, JwtGenerator, JwtService, JWT_SECRET_ENV};
