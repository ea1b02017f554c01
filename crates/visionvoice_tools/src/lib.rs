#![forbid(unsafe_code)]

pub mod order_cli;
