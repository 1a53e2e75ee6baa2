pub mod config;
pub mod generator;
pub mod logger;
pub mod visualization;
