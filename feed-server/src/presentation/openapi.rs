use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::auth::{
    AuthResponseDto, LoginDto, RefreshResponseDto, RegisterDto, UserDto,
};
use crate::presentation::handlers::engagement::{
    AddCommentDto, CommentDto, CommentsResponseDto, LikeToggleDto,
};
use crate::presentation::handlers::feed::{
    CuratedFeedResponseDto, FeedPostDto, FeedQuery, FeedResponseDto, PaginationDto, UserSummaryDto,
};
use crate::presentation::handlers::friends::{AddFriendDto, FriendsResponseDto};
use crate::presentation::handlers::posts::{CreatePostDto, PostDto, UpdatePostDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::auth::refresh,
        crate::presentation::handlers::auth::logout,
        crate::presentation::handlers::auth::me,
        crate::presentation::handlers::feed::global_feed,
        crate::presentation::handlers::feed::curated_feed,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::engagement::toggle_like,
        crate::presentation::handlers::engagement::list_comments,
        crate::presentation::handlers::engagement::add_comment,
        crate::presentation::handlers::friends::list_friends,
        crate::presentation::handlers::friends::add_friend
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            RefreshResponseDto,
            UserDto,
            FeedQuery,
            FeedResponseDto,
            CuratedFeedResponseDto,
            FeedPostDto,
            PaginationDto,
            UserSummaryDto,
            CreatePostDto,
            UpdatePostDto,
            PostDto,
            LikeToggleDto,
            AddCommentDto,
            CommentDto,
            CommentsResponseDto,
            AddFriendDto,
            FriendsResponseDto
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and credential lifecycle"),
        (name = "feed", description = "Global and friends-only feeds"),
        (name = "posts", description = "Post CRUD"),
        (name = "engagement", description = "Likes and comments"),
        (name = "friends", description = "Friendship graph")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
