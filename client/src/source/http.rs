//! Services backed by the real backend.

use async_trait::async_trait;
use pastus_core::types::{
    AccountDetail, AccountLookup, AccountUpdate, ArchiveFilter, ArchivePost, Availability,
    LikeState, LoginRequest, LoginResponse, Notification, Page, PostDetail, PostDraft, PostSummary,
    PostUpdate, SearchQuery, SearchResults, SignupRequest, SortOrder, Tag, TokenAction,
    TokenReceipt, TokenRequest, UserDashboard, VerifyCodeRequest,
};
use pastus_core::{Envelope, PastusClient};

use super::{
    check_base_url, ApiResult, ArchiveSource, AuthSource, NotificationSource, PostSource,
    TokenSource, UserSource,
};
use crate::error::ClientError;
use crate::storage::Credentials;
use crate::transport::HttpTransport;

/// Builds each request with `PastusClient`, runs it through `HttpTransport`
/// and hands the response back to the matching parser.
#[derive(Debug, Clone)]
pub struct HttpSource {
    api: PastusClient,
    transport: HttpTransport,
}

impl HttpSource {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ClientError> {
        check_base_url(base_url)?;
        Ok(Self {
            api: PastusClient::new(base_url),
            transport: HttpTransport::new(credentials)?,
        })
    }
}

#[async_trait]
impl AuthSource for HttpSource {
    async fn login(&self, input: &LoginRequest) -> ApiResult<Envelope<LoginResponse>> {
        let response = self.transport.execute(self.api.build_login(input)?).await?;
        self.api.parse_login(response)
    }

    async fn signup(&self, input: &SignupRequest) -> ApiResult<Envelope<()>> {
        let response = self.transport.execute(self.api.build_signup(input)?).await?;
        self.api.parse_signup(response)
    }

    async fn check_login_id(&self, login_id: &str) -> ApiResult<Availability> {
        let request = self.api.build_check_login_id(login_id)?;
        let response = self.transport.execute(request).await?;
        self.api.parse_check_login_id(response)
    }

    async fn check_phone(&self, phone_number: &str) -> ApiResult<Availability> {
        let request = self.api.build_check_phone(phone_number)?;
        let response = self.transport.execute(request).await?;
        self.api.parse_check_phone(response)
    }

    async fn find_account(&self, input: &AccountLookup) -> ApiResult<Envelope<()>> {
        let request = self.api.build_find_account(input)?;
        let response = self.transport.execute(request).await?;
        self.api.parse_find_account(response)
    }

    async fn verify_code(&self, input: &VerifyCodeRequest) -> ApiResult<Envelope<()>> {
        let request = self.api.build_verify_code(input)?;
        let response = self.transport.execute(request).await?;
        self.api.parse_verify_code(response)
    }
}

#[async_trait]
impl PostSource for HttpSource {
    async fn list_posts(&self, page: u32, size: u32) -> ApiResult<Envelope<Page<PostSummary>>> {
        let response = self.transport.execute(self.api.build_list_posts(page, size)).await?;
        self.api.parse_list_posts(response)
    }

    async fn trending_posts(&self) -> ApiResult<Envelope<Vec<PostSummary>>> {
        let response = self.transport.execute(self.api.build_trending_posts()).await?;
        self.api.parse_trending_posts(response)
    }

    async fn search_posts(&self, query: &SearchQuery) -> ApiResult<Envelope<SearchResults>> {
        let response = self.transport.execute(self.api.build_search_posts(query)).await?;
        self.api.parse_search_posts(response)
    }

    async fn get_post(&self, id: u64) -> ApiResult<Envelope<PostDetail>> {
        let response = self.transport.execute(self.api.build_get_post(id)).await?;
        self.api.parse_get_post(response)
    }

    async fn post_tags(&self, id: u64) -> ApiResult<Envelope<Vec<Tag>>> {
        let response = self.transport.execute(self.api.build_post_tags(id)).await?;
        self.api.parse_post_tags(response)
    }

    async fn create_post(&self, draft: &PostDraft) -> ApiResult<Envelope<PostDetail>> {
        let request = self.api.build_create_post(draft)?;
        let response = self.transport.execute(request).await?;
        self.api.parse_create_post(response)
    }

    async fn update_post(&self, id: u64, update: &PostUpdate) -> ApiResult<Envelope<PostDetail>> {
        let request = self.api.build_update_post(id, update)?;
        let response = self.transport.execute(request).await?;
        self.api.parse_update_post(response)
    }

    async fn replace_post(&self, id: u64, draft: &PostDraft) -> ApiResult<Envelope<PostDetail>> {
        let request = self.api.build_replace_post(id, draft)?;
        let response = self.transport.execute(request).await?;
        self.api.parse_update_post(response)
    }

    async fn delete_post(&self, id: u64) -> ApiResult<Envelope<()>> {
        let response = self.transport.execute(self.api.build_delete_post(id)).await?;
        self.api.parse_delete_post(response)
    }

    async fn toggle_like(&self, id: u64) -> ApiResult<LikeState> {
        let response = self.transport.execute(self.api.build_toggle_like(id)).await?;
        self.api.parse_toggle_like(response)
    }

    async fn trending_tags(&self) -> ApiResult<Envelope<Vec<String>>> {
        let response = self.transport.execute(self.api.build_trending_tags()).await?;
        self.api.parse_trending_tags(response)
    }
}

#[async_trait]
impl UserSource for HttpSource {
    async fn dashboard(&self) -> ApiResult<Envelope<UserDashboard>> {
        let response = self.transport.execute(self.api.build_dashboard()).await?;
        self.api.parse_dashboard(response)
    }

    async fn account_detail(&self) -> ApiResult<Envelope<AccountDetail>> {
        let response = self.transport.execute(self.api.build_account_detail()).await?;
        self.api.parse_account_detail(response)
    }

    async fn update_account(&self, update: &AccountUpdate) -> ApiResult<Envelope<AccountDetail>> {
        let request = self.api.build_update_account(update)?;
        let response = self.transport.execute(request).await?;
        self.api.parse_update_account(response)
    }
}

#[async_trait]
impl ArchiveSource for HttpSource {
    async fn archive_posts(
        &self,
        filter: ArchiveFilter,
        sort: SortOrder,
        page: u32,
    ) -> ApiResult<Envelope<Page<ArchivePost>>> {
        let request = self.api.build_archive_posts(filter, sort, page);
        let response = self.transport.execute(request).await?;
        self.api.parse_archive_posts(response)
    }
}

#[async_trait]
impl NotificationSource for HttpSource {
    async fn notifications(&self) -> ApiResult<Envelope<Vec<Notification>>> {
        let response = self.transport.execute(self.api.build_list_notifications()).await?;
        self.api.parse_list_notifications(response)
    }

    async fn notification(&self, id: u64) -> ApiResult<Envelope<Notification>> {
        let response = self.transport.execute(self.api.build_get_notification(id)).await?;
        self.api.parse_get_notification(response)
    }
}

#[async_trait]
impl TokenSource for HttpSource {
    async fn token_action(
        &self,
        action: TokenAction,
        input: &TokenRequest,
    ) -> ApiResult<TokenReceipt> {
        let request = self.api.build_token_action(action, input)?;
        let response = self.transport.execute(request).await?;
        self.api.parse_token_action(response)
    }
}
