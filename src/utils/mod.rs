//! Utility functions shared by the store and the pipeline

pub mod logging;
