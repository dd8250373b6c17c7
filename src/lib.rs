pub mod constants;
pub mod data_backend;
pub mod data_types;
pub mod db_operations;
pub mod errors;
pub mod favorites;
pub mod meal_pipeline;
pub mod render;
pub mod session;
pub mod shared_main;
