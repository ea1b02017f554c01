#![forbid(unsafe_code)]

pub mod cart;
pub mod order_turn;
