use sqlx::PgPool;
use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::engagement_service::EngagementService;
use crate::application::feed_service::FeedService;
use crate::application::friend_service::FriendService;
use crate::application::post_service::PostService;
use crate::data::repositories::postgres::engagement_repository::PostgresEngagementRepository;
use crate::data::repositories::postgres::friendship_repository::PostgresFriendshipRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::token_repository::PostgresTokenRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

pub(crate) type PgAuthService = AuthService<PostgresUserRepository, PostgresTokenRepository>;
pub(crate) type PgPostService = PostService<PostgresPostRepository>;
pub(crate) type PgFeedService = FeedService<PostgresPostRepository>;
pub(crate) type PgEngagementService =
    EngagementService<PostgresEngagementRepository, PostgresPostRepository>;
pub(crate) type PgFriendService = FriendService<PostgresFriendshipRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) pool: PgPool,
    pub(crate) auth_service: Arc<PgAuthService>,
    pub(crate) post_service: Arc<PgPostService>,
    pub(crate) feed_service: Arc<PgFeedService>,
    pub(crate) engagement_service: Arc<PgEngagementService>,
    pub(crate) friend_service: Arc<PgFriendService>,
}

impl AppState {
    pub(crate) fn new(
        pool: PgPool,
        auth_service: Arc<PgAuthService>,
        post_service: Arc<PgPostService>,
        feed_service: Arc<PgFeedService>,
        engagement_service: Arc<PgEngagementService>,
        friend_service: Arc<PgFriendService>,
    ) -> Self {
        Self {
            pool,
            auth_service,
            post_service,
            feed_service,
            engagement_service,
            friend_service,
        }
    }
}
