//! Share link entities.

pub mod model;

pub use model::ShareLink;
