//! Presentation layer: turns widget state into a `FilterSelection` and
//! renders whatever the pipeline produced.

pub mod panels;
pub mod plot;
pub mod tables;
