#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod document;
pub mod formats;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod pdf;
pub mod profile;
pub mod render;
