//! Data-source strategy: one trait per domain, two implementations.
//!
//! # Design
//! Screens talk to `Services`, never to a concrete source. `Services` is
//! assembled once from configuration and holds one `Arc<dyn …>` per domain,
//! all pointing at either a `FixtureSource` or an `HttpSource`. Both
//! implementations return exactly the same typed `Result<_, ApiError>`;
//! fixtures are decoded through the same `PastusClient::parse_*` functions
//! the HTTP path uses, so the two cannot drift apart.

mod fixture;
mod http;

pub use fixture::FixtureSource;
pub use http::HttpSource;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pastus_core::types::{
    AccountDetail, AccountLookup, AccountUpdate, ArchiveFilter, ArchivePost, Availability,
    LikeState, LoginRequest, LoginResponse, Notification, Page, PostDetail, PostDraft, PostSummary,
    PostUpdate, SearchQuery, SearchResults, SignupRequest, SortOrder, Tag, TokenAction,
    TokenReceipt, TokenRequest, UserDashboard, VerifyCodeRequest,
};
use pastus_core::{ApiError, Envelope};
use tracing::info;

use crate::config::{load_config, load_config_from_path, ClientConfig, DataSourceKind};
use crate::error::ClientError;
use crate::history::SearchHistory;
use crate::logging::init_tracing;
use crate::storage::{Credentials, FileStore, KeyValueStore, MemoryStore};

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait AuthSource: Send + Sync {
    async fn login(&self, input: &LoginRequest) -> ApiResult<Envelope<LoginResponse>>;
    async fn signup(&self, input: &SignupRequest) -> ApiResult<Envelope<()>>;
    async fn check_login_id(&self, login_id: &str) -> ApiResult<Availability>;
    async fn check_phone(&self, phone_number: &str) -> ApiResult<Availability>;
    async fn find_account(&self, input: &AccountLookup) -> ApiResult<Envelope<()>>;
    async fn verify_code(&self, input: &VerifyCodeRequest) -> ApiResult<Envelope<()>>;
}

#[async_trait]
pub trait PostSource: Send + Sync {
    async fn list_posts(&self, page: u32, size: u32) -> ApiResult<Envelope<Page<PostSummary>>>;
    async fn trending_posts(&self) -> ApiResult<Envelope<Vec<PostSummary>>>;
    async fn search_posts(&self, query: &SearchQuery) -> ApiResult<Envelope<SearchResults>>;
    async fn get_post(&self, id: u64) -> ApiResult<Envelope<PostDetail>>;
    async fn post_tags(&self, id: u64) -> ApiResult<Envelope<Vec<Tag>>>;
    async fn create_post(&self, draft: &PostDraft) -> ApiResult<Envelope<PostDetail>>;
    async fn update_post(&self, id: u64, update: &PostUpdate) -> ApiResult<Envelope<PostDetail>>;
    async fn replace_post(&self, id: u64, draft: &PostDraft) -> ApiResult<Envelope<PostDetail>>;
    async fn delete_post(&self, id: u64) -> ApiResult<Envelope<()>>;
    async fn toggle_like(&self, id: u64) -> ApiResult<LikeState>;
    async fn trending_tags(&self) -> ApiResult<Envelope<Vec<String>>>;
}

#[async_trait]
pub trait UserSource: Send + Sync {
    async fn dashboard(&self) -> ApiResult<Envelope<UserDashboard>>;
    async fn account_detail(&self) -> ApiResult<Envelope<AccountDetail>>;
    async fn update_account(&self, update: &AccountUpdate) -> ApiResult<Envelope<AccountDetail>>;
}

#[async_trait]
pub trait ArchiveSource: Send + Sync {
    async fn archive_posts(
        &self,
        filter: ArchiveFilter,
        sort: SortOrder,
        page: u32,
    ) -> ApiResult<Envelope<Page<ArchivePost>>>;
}

#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn notifications(&self) -> ApiResult<Envelope<Vec<Notification>>>;
    async fn notification(&self, id: u64) -> ApiResult<Envelope<Notification>>;
}

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token_action(&self, action: TokenAction, input: &TokenRequest)
        -> ApiResult<TokenReceipt>;
}

/// Every domain service plus the persisted client state.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthSource>,
    pub posts: Arc<dyn PostSource>,
    pub users: Arc<dyn UserSource>,
    pub archive: Arc<dyn ArchiveSource>,
    pub notifications: Arc<dyn NotificationSource>,
    pub tokens: Arc<dyn TokenSource>,
    credentials: Credentials,
    preferences: Arc<dyn KeyValueStore>,
}

impl Services {
    /// Load `./pastus.toml` plus `PASTUS_*` overrides, install logging at
    /// the configured level and assemble the services.
    pub fn bootstrap() -> Result<Self, ClientError> {
        Self::start(load_config()?)
    }

    /// Same as [`Services::bootstrap`] with an explicit config file.
    pub fn bootstrap_from(path: &Path) -> Result<Self, ClientError> {
        Self::start(load_config_from_path(path)?)
    }

    fn start(config: ClientConfig) -> Result<Self, ClientError> {
        init_tracing(&config.log.level);
        Self::from_config(&config)
    }

    /// Select the data source and open the stores named by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let (secure, preferences) = match &config.storage.dir {
            Some(dir) => open_stores(dir)?,
            None => (
                Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>,
                Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>,
            ),
        };
        let credentials = Credentials::new(secure);

        let services = match config.data.source {
            DataSourceKind::Fixture => {
                let source = Arc::new(FixtureSource::new(config.data.fixture_delay()));
                Self::with_source(source, credentials, preferences)
            }
            DataSourceKind::Http => {
                let source = Arc::new(HttpSource::new(&config.api.base_url, credentials.clone())?);
                Self::with_source(source, credentials, preferences)
            }
        };
        info!(source = ?config.data.source, "services ready");
        Ok(services)
    }

    /// Fixture-backed services over in-memory stores.
    pub fn fixtures(delay: Duration) -> Self {
        Self::with_source(
            Arc::new(FixtureSource::new(delay)),
            Credentials::in_memory(),
            Arc::new(MemoryStore::new()),
        )
    }

    /// HTTP-backed services reading the bearer token from `credentials`.
    pub fn http(base_url: &str, credentials: Credentials) -> Result<Self, ClientError> {
        let source = Arc::new(HttpSource::new(base_url, credentials.clone())?);
        Ok(Self::with_source(
            source,
            credentials,
            Arc::new(MemoryStore::new()),
        ))
    }

    fn with_source<S>(
        source: Arc<S>,
        credentials: Credentials,
        preferences: Arc<dyn KeyValueStore>,
    ) -> Self
    where
        S: AuthSource
            + PostSource
            + UserSource
            + ArchiveSource
            + NotificationSource
            + TokenSource
            + 'static,
    {
        Self {
            auth: source.clone(),
            posts: source.clone(),
            users: source.clone(),
            archive: source.clone(),
            notifications: source.clone(),
            tokens: source,
            credentials,
            preferences,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn search_history(&self) -> SearchHistory {
        SearchHistory::new(self.preferences.clone())
    }

    /// Log in and persist the session. Nothing is stored on failure.
    pub async fn sign_in(&self, login_id: &str, password: &str) -> ApiResult<Envelope<LoginResponse>> {
        let request = LoginRequest {
            login_id: login_id.to_string(),
            password: password.to_string(),
        };
        let envelope = self.auth.login(&request).await?;
        self.credentials
            .save_session(&envelope.data.token.access_token, envelope.data.user.user_id)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        info!(user_id = envelope.data.user.user_id, "signed in");
        Ok(envelope)
    }

    pub fn sign_out(&self) -> Result<(), ClientError> {
        self.credentials.clear()?;
        info!("signed out");
        Ok(())
    }
}

fn open_stores(
    dir: &Path,
) -> Result<(Arc<dyn KeyValueStore>, Arc<dyn KeyValueStore>), ClientError> {
    let secure = FileStore::open(dir.join("secure.json"))?;
    let preferences = FileStore::open(dir.join("preferences.json"))?;
    Ok((Arc::new(secure), Arc::new(preferences)))
}

/// Reject anything that is not an absolute http(s) URL with a host.
pub(crate) fn check_base_url(base_url: &str) -> Result<(), ClientError> {
    let invalid = |reason: String| ClientError::BaseUrl {
        url: base_url.to_string(),
        reason,
    };
    let parsed = url::Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_must_be_http() {
        assert!(check_base_url("http://localhost:8080/api/v1").is_ok());
        assert!(check_base_url("https://api.pastus.app").is_ok());
        assert!(matches!(
            check_base_url("localhost:8080"),
            Err(ClientError::BaseUrl { .. })
        ));
        assert!(check_base_url("http://").is_err());
        assert!(check_base_url("ftp://files.pastus.app").is_err());
    }

    #[test]
    fn unparseable_origins_are_rejected() {
        for url in ["http://exa mple.com", "http://?x", "http://[::1", "https://a:b:c"] {
            assert!(
                matches!(check_base_url(url), Err(ClientError::BaseUrl { .. })),
                "{url}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_sign_in_stores_nothing() {
        let services = Services::fixtures(Duration::from_millis(500));
        let err = services.sign_in("test", "wrong").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(services.credentials().token().unwrap(), None);
        assert_eq!(services.credentials().user_id().unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn sign_in_with_broken_store_keeps_no_token() {
        use crate::storage::{FailingStore, USER_ID_KEY};

        let services = Services::with_source(
            Arc::new(FixtureSource::new(Duration::from_millis(500))),
            Credentials::new(Arc::new(FailingStore::new(USER_ID_KEY))),
            Arc::new(MemoryStore::new()),
        );
        let err = services.sign_in("test", "1234").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(services.credentials().token().unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn sign_in_then_sign_out() {
        let services = Services::fixtures(Duration::from_millis(500));
        services.sign_in("test", "1234").await.unwrap();
        assert_eq!(
            services.credentials().token().unwrap().as_deref(),
            Some("mock-token-12345")
        );
        assert_eq!(services.credentials().user_id().unwrap(), Some(1));
        services.sign_out().unwrap();
        assert_eq!(services.credentials().token().unwrap(), None);
    }

    #[test]
    fn bootstrap_reports_config_errors() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("pastus.toml", "[data]\nsource = \"carrier-pigeon\"\n")?;
            assert!(matches!(Services::bootstrap(), Err(ClientError::Config(_))));

            jail.create_file(
                "pastus.toml",
                "[api]\nbase_url = \"http://exa mple.com\"\n\n[data]\nsource = \"http\"\n",
            )?;
            assert!(matches!(Services::bootstrap(), Err(ClientError::BaseUrl { .. })));

            jail.set_env("PASTUS_LOG_LEVEL", "debug");
            jail.create_file("pastus.toml", "[data]\nfixture_delay_ms = 0\n")?;
            assert!(Services::bootstrap().is_ok());
            Ok(())
        });
    }

    #[test]
    fn bootstrap_from_path_opens_configured_stores() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("client.toml");
        let store_dir = dir.path().join("state");
        std::fs::write(
            &config_path,
            format!("[storage]\ndir = {:?}\n", store_dir.display().to_string()),
        )
        .unwrap();
        let services = Services::bootstrap_from(&config_path).unwrap();
        services.credentials().save_session("t", 3).unwrap();
        assert!(store_dir.join("secure.json").exists());
    }

    #[test]
    fn file_backed_config_opens_both_stores() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.storage.dir = Some(dir.path().to_path_buf());
        let services = Services::from_config(&config).unwrap();
        services.credentials().save_session("t", 7).unwrap();
        services.search_history().record("군대").unwrap();
        assert!(dir.path().join("secure.json").exists());
        assert!(dir.path().join("preferences.json").exists());
    }
}
