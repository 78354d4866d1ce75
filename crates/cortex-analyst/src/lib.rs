pub mod backend;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod providers;
pub mod render;
pub mod semantic_model;
pub mod state;
