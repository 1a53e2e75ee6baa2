pub mod command;
pub mod core;
pub mod indices;
pub mod parser;
