use std::sync::Arc;

use anyhow::Result;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::auth_service::AuthService;
use application::engagement_service::EngagementService;
use application::feed_service::FeedService;
use application::friend_service::FriendService;
use application::post_service::PostService;
use data::repositories::postgres::engagement_repository::PostgresEngagementRepository;
use data::repositories::postgres::friendship_repository::PostgresFriendshipRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::token_repository::PostgresTokenRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url).await?;
    run_migrations(&pool).await?;

    let jwt = JwtService::new(
        &settings.jwt_secret,
        settings.access_ttl_seconds,
        settings.refresh_ttl_seconds,
    );

    let auth_service = Arc::new(AuthService::new(
        PostgresUserRepository::new(pool.clone()),
        PostgresTokenRepository::new(pool.clone()),
        jwt,
    ));
    let post_service = Arc::new(PostService::new(PostgresPostRepository::new(pool.clone())));
    let feed_service = Arc::new(FeedService::new(PostgresPostRepository::new(pool.clone())));
    let engagement_service = Arc::new(EngagementService::new(
        PostgresEngagementRepository::new(pool.clone()),
        PostgresPostRepository::new(pool.clone()),
    ));
    let friend_service = Arc::new(FriendService::new(PostgresFriendshipRepository::new(
        pool.clone(),
    )));

    let state = AppState::new(
        pool,
        auth_service,
        post_service,
        feed_service,
        engagement_service,
        friend_service,
    );

    server::run_http(&settings, state).await
}
