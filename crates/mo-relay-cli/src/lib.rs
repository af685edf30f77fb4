#![doc = include_str!("../README.md")]

pub mod bridge;
pub mod commands;
pub mod core;
pub mod relay;
pub mod translate;
pub mod utils;
