//! Cart Items

mod handlers;

pub(crate) use handlers::{clear, create, delete, update};
