//! Carts

pub(crate) mod errors;
mod handlers;
pub(crate) mod items;
pub(crate) mod responses;

pub(crate) use handlers::{delete, get, get_or_create};
