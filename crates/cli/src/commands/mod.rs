//! CLI Commands

pub mod address;
pub mod candidate;
pub mod indexing;
pub mod session;
