use super::{parse_envelope, parse_json, check_status, PastusClient, CREATED, NO_CONTENT, OK};
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    LikeState, Page, PostDetail, PostDraft, PostSummary, PostUpdate, SearchQuery, SearchResults,
    Tag,
};

impl PastusClient {
    pub fn build_list_posts(&self, page: u32, size: u32) -> HttpRequest {
        let url = self.url_with_query(
            "/posts",
            &[("page", page.to_string()), ("size", size.to_string())],
        );
        self.request(HttpMethod::Get, url)
    }

    pub fn build_trending_posts(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.url("/posts/trending"))
    }

    pub fn build_search_posts(&self, query: &SearchQuery) -> HttpRequest {
        let mut pairs = Vec::with_capacity(5);
        if let Some(keyword) = &query.keyword {
            pairs.push(("keyword", keyword.clone()));
        }
        if !query.tags.is_empty() {
            let tags = query
                .tags
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("tags", tags));
        }
        pairs.push(("page", query.page.to_string()));
        pairs.push(("size", query.size.to_string()));
        pairs.push(("sort", query.sort.as_str().to_string()));
        self.request(HttpMethod::Get, self.url_with_query("/posts/search", &pairs))
    }

    pub fn build_get_post(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Get, self.url(&format!("/posts/{id}")))
    }

    pub fn build_post_tags(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Get, self.url(&format!("/posts/{id}/tags")))
    }

    pub fn build_create_post(&self, draft: &PostDraft) -> Result<HttpRequest, ApiError> {
        draft.validate()?;
        self.json_request(HttpMethod::Post, "/posts", draft)
    }

    pub fn build_update_post(&self, id: u64, update: &PostUpdate) -> Result<HttpRequest, ApiError> {
        update.validate()?;
        self.json_request(HttpMethod::Patch, &format!("/posts/{id}"), update)
    }

    pub fn build_replace_post(&self, id: u64, draft: &PostDraft) -> Result<HttpRequest, ApiError> {
        draft.validate()?;
        self.json_request(HttpMethod::Put, &format!("/posts/{id}"), draft)
    }

    pub fn build_delete_post(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Delete, self.url(&format!("/posts/{id}")))
    }

    pub fn build_toggle_like(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Post, self.url(&format!("/posts/{id}/like")))
    }

    pub fn build_trending_tags(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.url("/tags/trending"))
    }

    pub fn parse_list_posts(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<Page<PostSummary>>, ApiError> {
        parse_envelope(&response, OK)
    }

    pub fn parse_trending_posts(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<Vec<PostSummary>>, ApiError> {
        parse_envelope(&response, OK)
    }

    pub fn parse_search_posts(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<SearchResults>, ApiError> {
        parse_envelope(&response, OK)
    }

    pub fn parse_get_post(&self, response: HttpResponse) -> Result<Envelope<PostDetail>, ApiError> {
        parse_envelope(&response, OK)
    }

    pub fn parse_post_tags(&self, response: HttpResponse) -> Result<Envelope<Vec<Tag>>, ApiError> {
        parse_envelope(&response, OK)
    }

    pub fn parse_create_post(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<PostDetail>, ApiError> {
        parse_envelope(&response, CREATED)
    }

    pub fn parse_update_post(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<PostDetail>, ApiError> {
        parse_envelope(&response, OK)
    }

    /// Only an exact 204 counts as deleted.
    pub fn parse_delete_post(&self, response: HttpResponse) -> Result<Envelope<()>, ApiError> {
        check_status(&response, NO_CONTENT)?;
        Ok(Envelope::new(response.status, ()))
    }

    pub fn parse_toggle_like(&self, response: HttpResponse) -> Result<LikeState, ApiError> {
        parse_json(&response, OK)
    }

    pub fn parse_trending_tags(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<Vec<String>>, ApiError> {
        parse_envelope(&response, OK)
    }
}
