pub(crate) mod engagement_repository;
pub(crate) mod friendship_repository;
pub(crate) mod post_repository;
pub(crate) mod repositories;
pub(crate) mod token_repository;
pub(crate) mod user_repository;
