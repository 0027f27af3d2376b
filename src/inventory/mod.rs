//! Inventory bundle context: items grouped into collections, with the same
//! command/query split as the users context.

pub mod commands;
pub mod queries;
pub mod repository;
