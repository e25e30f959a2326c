// lib.rs
pub mod compare;
pub mod error;
pub mod faidx;
pub mod genome;
pub mod gff;
pub mod stats;
pub mod timing;
