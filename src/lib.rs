#[macro_use]
extern crate rust_i18n;

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod utils;

// Initialize i18n
i18n!("locales", fallback = "en");
