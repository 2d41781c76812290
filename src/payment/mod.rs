// src/payment/mod.rs

pub mod audit;
pub mod gateway;
pub mod signature;
