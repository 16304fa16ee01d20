// Public library interface for photogrid-rs
// This allows the debug CLI tool to use the core modules

pub mod cache;
pub mod gallery;
pub mod layout;
pub mod photo;
pub mod ratio;
