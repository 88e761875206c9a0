//! Carts

pub mod admin;
pub mod data;
pub mod errors;
pub mod lifecycle;
pub mod models;
mod repositories;
pub mod service;

pub use admin::*;
pub use errors::CartsServiceError;
pub use service::*;
