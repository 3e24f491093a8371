use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::feed::UserSummaryDto;
use crate::presentation::middleware::auth::CurrentUser;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct AddFriendDto {
    pub(crate) friend_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FriendsResponseDto {
    pub(crate) friends: Vec<UserSummaryDto>,
}

#[utoipa::path(
    get,
    path = "/api/friends",
    tag = "friends",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The viewer's friends", body = FriendsResponseDto),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_friends(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<(StatusCode, Json<FriendsResponseDto>)> {
    let friends = state
        .friend_service
        .list_friends(current_user.user_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(FriendsResponseDto {
            friends: friends.into_iter().map(UserSummaryDto::from).collect(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/friends",
    tag = "friends",
    security(
        ("bearer_auth" = [])
    ),
    request_body = AddFriendDto,
    responses(
        (status = 201, description = "Friendship created"),
        (status = 400, description = "Self-friendship or malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Already friends"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn add_friend(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(dto): Json<AddFriendDto>,
) -> AppResult<StatusCode> {
    state
        .friend_service
        .add_friend(current_user.user_id, dto.friend_id)
        .await?;

    Ok(StatusCode::CREATED)
}
