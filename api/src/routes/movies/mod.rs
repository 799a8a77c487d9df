pub mod list_movies_route;
pub mod movie_changes_route;
pub mod upsert_movie_route;
