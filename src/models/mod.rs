// src/models/mod.rs

pub mod answer;
pub mod attempt;
pub mod exam;
pub mod question;
pub mod result;
