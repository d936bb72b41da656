//! Data types shared by the detector, parsers, normalizer and merge engine.

pub mod config;
pub mod event;
pub mod report;
pub mod vehicle;
