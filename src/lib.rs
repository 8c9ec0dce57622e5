// Photomark watermarking library

pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod resample;
pub mod sources;
pub mod watermark;
