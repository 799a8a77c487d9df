pub mod tmdb_service;
