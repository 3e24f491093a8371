use crate::data::post_repository::{Pagination, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::FeedPost;

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageMeta {
    pub(crate) page: u32,
    pub(crate) per_page: u32,
    pub(crate) total_pages: u32,
    pub(crate) total_posts: i64,
    pub(crate) has_next: bool,
    pub(crate) has_prev: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct FeedPage {
    pub(crate) posts: Vec<FeedPost>,
    pub(crate) meta: PageMeta,
}

pub(crate) struct FeedService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> FeedService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Every post, newest first, annotated for the viewer. A page past
    /// the end comes back empty rather than failing.
    pub(crate) async fn global_feed(
        &self,
        viewer_id: i64,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<FeedPage, DomainError> {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let pagination = Pagination {
            page,
            page_size: per_page,
        };
        let posts = self.repo.list_feed(viewer_id, pagination).await?;
        let total = self.repo.total_posts().await?;

        Ok(FeedPage {
            posts,
            meta: page_meta(page, per_page, total),
        })
    }

    /// Posts authored by the viewer's friends only. No friends means an
    /// empty feed, not an error.
    pub(crate) async fn curated_feed(&self, viewer_id: i64) -> Result<Vec<FeedPost>, DomainError> {
        self.repo.list_friends_feed(viewer_id).await
    }
}

fn page_meta(page: u32, per_page: u32, total_posts: i64) -> PageMeta {
    let total_pages = (total_posts.max(0) as u64).div_ceil(per_page as u64) as u32;

    PageMeta {
        page,
        per_page,
        total_pages,
        total_posts,
        has_next: page < total_pages,
        has_prev: page > 1 && total_pages > 0,
    }
}
