pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod forms;
pub mod models;
pub mod seed;
pub mod services;
