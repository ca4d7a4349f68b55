pub mod games_repository;
pub mod reviews_repository;
