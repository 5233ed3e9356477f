pub mod app;
pub mod config;
pub mod events;
pub mod form;
pub mod openai;
pub mod prompt;
pub mod topics;
pub mod ui;
