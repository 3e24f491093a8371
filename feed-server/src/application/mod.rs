pub(crate) mod auth_service;
pub(crate) mod engagement_service;
pub(crate) mod feed_service;
pub(crate) mod friend_service;
pub(crate) mod post_service;
