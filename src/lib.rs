#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod api;
pub mod backup;
pub mod cli;
pub mod prelude;
pub mod quantity;
pub mod tables;
