pub(crate) mod auth;
pub(crate) mod engagement;
pub(crate) mod feed;
pub(crate) mod friends;
pub(crate) mod posts;
