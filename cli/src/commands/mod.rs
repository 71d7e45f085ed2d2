pub mod config;
pub mod debug;
pub mod pipe;
pub mod serve;
