pub mod models;
pub mod protocol;
pub mod repositories;
pub mod services;
