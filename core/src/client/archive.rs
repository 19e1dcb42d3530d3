use super::{parse_envelope, PastusClient, OK};
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ArchiveFilter, ArchivePost, Page, SortOrder};

/// The archive screen always asks for pages of this size.
pub const ARCHIVE_PAGE_SIZE: u32 = 20;

impl PastusClient {
    pub fn build_archive_posts(&self, filter: ArchiveFilter, sort: SortOrder, page: u32) -> HttpRequest {
        let url = self.url_with_query(
            "/users/me/posts",
            &[
                ("filter", filter.as_str().to_string()),
                ("sort", sort.as_str().to_string()),
                ("page", page.to_string()),
                ("size", ARCHIVE_PAGE_SIZE.to_string()),
            ],
        );
        self.request(HttpMethod::Get, url)
    }

    pub fn parse_archive_posts(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<Page<ArchivePost>>, ApiError> {
        parse_envelope(&response, OK)
    }
}
