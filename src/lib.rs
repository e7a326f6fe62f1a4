// src/lib.rs
pub mod analysis;
pub mod boundary;
pub mod data;
pub mod error;
pub mod model;
pub mod render;
pub mod utils;
