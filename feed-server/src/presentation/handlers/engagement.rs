use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::comment::{AddCommentRequest, Comment};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::feed::UserSummaryDto;
use crate::presentation::middleware::auth::CurrentUser;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LikeToggleDto {
    pub(crate) is_liked: bool,
    pub(crate) likes_count: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct AddCommentDto {
    #[validate(length(min = 1, max = 5000))]
    pub(crate) content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author: UserSummaryDto,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author: comment.author.into(),
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentsResponseDto {
    pub(crate) comments: Vec<CommentDto>,
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    tag = "engagement",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Like toggled", body = LikeToggleDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn toggle_like(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<LikeToggleDto>)> {
    let result = state
        .engagement_service
        .toggle_like(current_user.user_id, id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(LikeToggleDto {
            is_liked: result.is_liked,
            likes_count: result.likes_count,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments",
    tag = "engagement",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Comments, newest first", body = CommentsResponseDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_comments(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<CommentsResponseDto>)> {
    let comments = state.engagement_service.list_comments(id).await?;

    Ok((
        StatusCode::OK,
        Json(CommentsResponseDto {
            comments: comments.into_iter().map(CommentDto::from).collect(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    tag = "engagement",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = AddCommentDto,
    responses(
        (status = 201, description = "Comment created", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn add_comment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(dto): Json<AddCommentDto>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    dto.validate()?;
    let req = AddCommentRequest {
        content: dto.content,
    };

    let comment = state
        .engagement_service
        .add_comment(current_user.user_id, id, req)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentDto::from(comment))))
}
