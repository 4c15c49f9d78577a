pub mod app_db;
pub mod app_lists;
pub mod checksum;
pub mod config;
pub mod domains;
pub mod install;
pub mod logging;
pub mod package;
pub mod route_registry;
pub mod settings;
pub mod url_model;
