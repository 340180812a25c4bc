pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod locator;
pub mod response;
pub mod tree;
