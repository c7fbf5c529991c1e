//! Route handlers for the broker's HTTP surface.

pub mod health;
pub mod login;
pub mod types;
