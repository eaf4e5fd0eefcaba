//! poolbench library — application logic for the pool benchmark binary.

pub mod app;
pub mod config;
