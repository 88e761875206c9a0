//! Admin

mod handlers;
pub(crate) mod middleware;
pub(crate) mod token;

pub(crate) use handlers::{delete, export, index, restore};
