pub mod answers;
pub mod bot;
pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod registrar;
pub mod responder;

pub use bot::run;
