use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::feed_service::{FeedPage, PageMeta};
use crate::domain::post::FeedPost;
use crate::domain::user::UserSummary;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::CurrentUser;

/// Out-of-range values are accepted here and clamped by the feed
/// service, never rejected.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct FeedQuery {
    pub(crate) page: Option<u32>,
    pub(crate) per_page: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserSummaryDto {
    pub(crate) id: i64,
    pub(crate) username: String,
}

impl From<UserSummary> for UserSummaryDto {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id,
            username: summary.username,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FeedPostDto {
    pub(crate) id: i64,
    pub(crate) content: String,
    pub(crate) image_url: Option<String>,
    pub(crate) author: UserSummaryDto,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) likes_count: i64,
    pub(crate) comments_count: i64,
    pub(crate) is_liked: bool,
}

impl From<FeedPost> for FeedPostDto {
    fn from(post: FeedPost) -> Self {
        Self {
            id: post.id,
            content: post.content,
            image_url: post.image_url,
            author: post.author.into(),
            created_at: post.created_at,
            updated_at: post.updated_at,
            likes_count: post.likes_count,
            comments_count: post.comments_count,
            is_liked: post.is_liked,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PaginationDto {
    pub(crate) page: u32,
    pub(crate) per_page: u32,
    pub(crate) total_pages: u32,
    pub(crate) total_posts: i64,
    pub(crate) has_next: bool,
    pub(crate) has_prev: bool,
}

impl From<PageMeta> for PaginationDto {
    fn from(meta: PageMeta) -> Self {
        Self {
            page: meta.page,
            per_page: meta.per_page,
            total_pages: meta.total_pages,
            total_posts: meta.total_posts,
            has_next: meta.has_next,
            has_prev: meta.has_prev,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FeedResponseDto {
    pub(crate) posts: Vec<FeedPostDto>,
    pub(crate) pagination: PaginationDto,
}

impl From<FeedPage> for FeedResponseDto {
    fn from(page: FeedPage) -> Self {
        Self {
            posts: page.posts.into_iter().map(FeedPostDto::from).collect(),
            pagination: page.meta.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CuratedFeedResponseDto {
    pub(crate) posts: Vec<FeedPostDto>,
}

#[utoipa::path(
    get,
    path = "/api/feed",
    tag = "feed",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("page" = Option<u32>, Query, description = "Page number (values < 1 read as 1)"),
        ("per_page" = Option<u32>, Query, description = "Posts per page (clamped to 1..=100)")
    ),
    responses(
        (status = 200, description = "Global feed page", body = FeedResponseDto),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn global_feed(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<FeedQuery>,
) -> AppResult<(StatusCode, Json<FeedResponseDto>)> {
    let page = state
        .feed_service
        .global_feed(current_user.user_id, query.page, query.per_page)
        .await?;

    Ok((StatusCode::OK, Json(FeedResponseDto::from(page))))
}

#[utoipa::path(
    get,
    path = "/api/curatedFeed",
    tag = "feed",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Posts by the viewer's friends", body = CuratedFeedResponseDto),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn curated_feed(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<(StatusCode, Json<CuratedFeedResponseDto>)> {
    let posts = state
        .feed_service
        .curated_feed(current_user.user_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(CuratedFeedResponseDto {
            posts: posts.into_iter().map(FeedPostDto::from).collect(),
        }),
    ))
}
