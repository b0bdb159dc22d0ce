pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod merge;
pub mod model;
pub mod resources;
pub mod strapi;
