pub mod health_route;
pub mod movies;
pub mod search_movies;
