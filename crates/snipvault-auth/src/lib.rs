//! # snipvault-auth
//!
//! Identity collaborator for SnipVault. Resolves a caller's bearer
//! credential to a stable [`OwnerId`](snipvault_core::types::OwnerId); every
//! snippet and folder operation trusts that identity for authorization.
//!
//! ## Modules
//!
//! - `jwt`: HS256 token creation and validation

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
