pub mod catalog_config;
pub mod default_config;
