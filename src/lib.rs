//! Wind power prediction service.
//!
//! Predicts wind-farm output from weather conditions with a pretrained linear
//! model and searches a weather-station table for the most productive site
//! near a given point.

pub mod api;
pub mod config;
pub mod domain;
pub mod ml;
pub mod optimizer;
pub mod service;
pub mod telemetry;
pub mod weather;
