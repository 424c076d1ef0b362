// src/utils/mod.rs

pub mod csv;
pub mod jwt;
