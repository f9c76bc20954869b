pub mod analysis;
pub mod cancel;
pub mod config;
pub mod error;
pub mod generator;
pub mod heuristics;
pub mod models;
pub mod prize;
pub mod scoring;
pub mod search;
pub mod simulation;
pub mod statistics;
pub mod validator;
