pub mod config;
pub mod ensemble;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod matches;
pub mod predictor;
pub mod repository;
pub mod scoring;
pub mod secondary;
pub mod store;
pub mod summary;
