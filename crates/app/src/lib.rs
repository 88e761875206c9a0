//! Cart lifecycle domain and persistence modules.

pub mod context;
pub mod database;
pub mod domain;
pub mod uuids;

pub use domain::carts;

#[cfg(test)]
mod test;
