pub mod bot;
pub mod config;
pub mod exchange;
pub mod logging;
pub mod menu;
