pub mod search_movies_request;
pub mod search_movies_route;
