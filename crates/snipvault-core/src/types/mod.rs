//! Core type definitions used across the SnipVault workspace.

pub mod id;

pub use id::*;
