// src/formats/mod.rs

pub mod imd;
