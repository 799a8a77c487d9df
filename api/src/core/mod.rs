pub mod app_state;
pub mod cors;
pub mod movie_table;
