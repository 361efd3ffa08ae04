pub mod api;
pub mod app;
pub mod audio;
pub mod cli;
pub mod clients;
pub mod config;
pub mod global;
pub mod workflow;
