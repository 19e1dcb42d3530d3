//! Services answered from in-memory fixtures.
//!
//! Each call waits for the configured latency, computes the JSON body the
//! real backend would send and feeds it through the matching
//! `PastusClient::parse_*` function. Likes, created and deleted posts, the
//! profile and the token balance are kept in state so repeated calls behave
//! like a small backend.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use pastus_core::client::{ARCHIVE_PAGE_SIZE, LOGIN_ID_TAKEN_MESSAGE, PHONE_TAKEN_MESSAGE};
use pastus_core::format::digits_only;
use pastus_core::types::{
    AccountDetail, AccountLookup, AccountUpdate, ArchiveFilter, ArchivePost, Availability,
    LikeState, LoginRequest, LoginResponse, Notification, Page, PostDetail, PostDraft, PostSummary,
    PostUpdate, SearchQuery, SearchResults, SignupRequest, SortOrder, Tag, TokenAction,
    TokenReceipt, TokenRequest, UserDashboard, VerifyCodeRequest, ANONYMOUS_DISPLAY_NAME,
};
use pastus_core::validation::{validate_login_id, ValidationError};
use pastus_core::{Envelope, HttpResponse, PastusClient};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

use super::{
    ApiResult, ArchiveSource, AuthSource, NotificationSource, PostSource, TokenSource, UserSource,
};

/// Token handed out by the fixture login.
pub const FIXTURE_TOKEN: &str = "mock-token-12345";
/// Code accepted by the fixture verification endpoint.
pub const VERIFICATION_CODE: &str = "123456";
/// Tags returned by `trending_tags`, in order.
pub const TRENDING_TAGS: [&str; 5] = ["군대", "휴학", "성적", "장학금", "졸업"];

const REGISTERED_PHONE: &str = "01012345678";
const TAKEN_PHONE: &str = "01000000000";

/// Tag vocabulary; a tag's id is its position plus one.
const TAGS: [&str; 10] = [
    "군대", "휴학", "성적", "장학금", "졸업", "취업", "연애", "꿀팁", "팀플/과제", "학업",
];

const LOGIN_FAILED: &str = "아이디/비밀번호가 다릅니다. 다시 확인해주세요";
const POST_NOT_FOUND: &str = "게시글을 찾을 수 없습니다.";
const NOT_AUTHOR: &str = "본인이 작성한 게시글만 수정할 수 있습니다.";

struct Seed {
    id: u64,
    title: &'static str,
    author: &'static str,
    trust: u8,
    anonymous: bool,
    tags: &'static [u64],
    likes: u64,
    views: u64,
    liked: bool,
    created: &'static str,
}

const SEED: &[Seed] = &[
    Seed {
        id: 1,
        title: "전역 후 복학 vs 바로 취업",
        author: "king",
        trust: 92,
        anonymous: false,
        tags: &[1, 6],
        likes: 128,
        views: 1024,
        liked: false,
        created: "2026-02-15T09:30:00",
    },
    Seed {
        id: 2,
        title: "휴학하고 워홀 다녀온 후기",
        author: "user1",
        trust: 70,
        anonymous: true,
        tags: &[2],
        likes: 64,
        views: 512,
        liked: false,
        created: "2026-02-17T11:20:00",
    },
    Seed {
        id: 3,
        title: "장학금 놓친 학기의 회고",
        author: "user1",
        trust: 55,
        anonymous: false,
        tags: &[4, 3],
        likes: 40,
        views: 300,
        liked: true,
        created: "2026-02-18T18:45:00",
    },
    Seed {
        id: 4,
        title: "졸업 유예를 선택했던 이유",
        author: "test",
        trust: 85,
        anonymous: false,
        tags: &[5],
        likes: 12,
        views: 90,
        liked: false,
        created: "2026-02-19T13:00:00",
    },
    Seed {
        id: 5,
        title: "연애와 학업 사이에서",
        author: "quiet",
        trust: 60,
        anonymous: true,
        tags: &[7, 10],
        likes: 5,
        views: 45,
        liked: false,
        created: "2026-02-20T21:10:00",
    },
    Seed {
        id: 42,
        title: "장학금 면접 준비 메모",
        author: "test",
        trust: 85,
        anonymous: false,
        tags: &[4],
        likes: 0,
        views: 3,
        liked: false,
        created: "2026-02-21T08:00:00",
    },
];

struct FixturePost {
    id: u64,
    title: String,
    situation: String,
    action: String,
    retrospective: String,
    author: String,
    trust: u8,
    anonymous: bool,
    tag_ids: Vec<u64>,
    likes: u64,
    views: u64,
    liked: bool,
    mine: bool,
    use_token: bool,
    created_at: NaiveDateTime,
    updated_at: Option<NaiveDateTime>,
}

impl FixturePost {
    fn from_seed(seed: &Seed, me: &str) -> Self {
        Self {
            id: seed.id,
            title: seed.title.to_string(),
            situation: format!("{} 당시의 상황", seed.title),
            action: "고민 끝에 한쪽을 선택했습니다.".to_string(),
            retrospective: "지금 돌아보면 다른 선택지도 충분히 있었습니다.".to_string(),
            author: seed.author.to_string(),
            trust: seed.trust,
            anonymous: seed.anonymous,
            tag_ids: seed.tags.to_vec(),
            likes: seed.likes,
            views: seed.views,
            liked: seed.liked,
            mine: seed.author == me,
            use_token: false,
            created_at: NaiveDateTime::parse_from_str(seed.created, "%Y-%m-%dT%H:%M:%S")
                .unwrap_or_default(),
            updated_at: None,
        }
    }

    fn apply_draft(&mut self, draft: &PostDraft) {
        self.title = draft.title.clone();
        self.situation = draft.situation.clone();
        self.action = draft.action.clone();
        self.retrospective = draft.retrospective.clone();
        self.anonymous = draft.is_anonymous;
        self.use_token = draft.use_token;
        self.tag_ids = draft.tag_ids.clone();
    }

    fn apply_update(&mut self, update: &PostUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(situation) = &update.situation {
            self.situation = situation.clone();
        }
        if let Some(action) = &update.action {
            self.action = action.clone();
        }
        if let Some(retrospective) = &update.retrospective {
            self.retrospective = retrospective.clone();
        }
        if let Some(anonymous) = update.is_anonymous {
            self.anonymous = anonymous;
        }
        if let Some(tag_ids) = &update.tag_ids {
            self.tag_ids = tag_ids.clone();
        }
    }

    fn tag_names(&self) -> Vec<String> {
        self.tag_ids
            .iter()
            .filter_map(|id| tag_name(*id))
            .map(|name| format!("#{name}"))
            .collect()
    }

    // Anonymous posts still carry the login id here, the way some backend
    // payloads do; decoding into `Author` discards it.
    fn author_json(&self) -> Value {
        json!({
            "isAnonymous": self.anonymous,
            "loginId": self.author,
            "trustScore": self.trust,
        })
    }

    fn summary_json(&self) -> Value {
        json!({
            "postId": self.id,
            "title": self.title,
            "author": self.author_json(),
            "tags": self.tag_names(),
            "likeCount": self.likes,
            "viewCount": self.views,
            "createdAt": self.created_at,
        })
    }

    fn detail_json(&self) -> Value {
        json!({
            "postId": self.id,
            "title": self.title,
            "situation": self.situation,
            "action": self.action,
            "retrospective": self.retrospective,
            "author": self.author_json(),
            "tags": self.tag_names(),
            "likeCount": self.likes,
            "viewCount": self.views,
            "createdAt": self.created_at,
            "updatedAt": self.updated_at,
            "isLiked": self.liked,
            "isAuthor": self.mine,
            "useToken": self.use_token,
        })
    }

    fn archive_json(&self) -> Value {
        let user_name = if self.anonymous {
            ANONYMOUS_DISPLAY_NAME
        } else {
            self.author.as_str()
        };
        json!({
            "postId": self.id,
            "title": self.title,
            "userName": user_name,
            "trustScore": self.trust,
            "viewCount": self.views,
            "likeCount": self.likes,
            "createdAt": self.created_at,
            "hashtags": self.tag_names(),
        })
    }
}

fn tag_name(id: u64) -> Option<&'static str> {
    let index = usize::try_from(id.checked_sub(1)?).ok()?;
    TAGS.get(index).copied()
}

struct Profile {
    user_id: u64,
    user_name: String,
    login_id: String,
    password: String,
    trust: u8,
    balance: u64,
    profile_image_url: Option<String>,
}

impl Profile {
    fn dashboard_json(&self) -> Value {
        json!({
            "userId": self.user_id,
            "userName": self.user_name,
            "trustScore": self.trust,
            "tokenBalance": self.balance,
        })
    }

    fn detail_json(&self) -> Value {
        json!({
            "userId": self.user_id,
            "userName": self.user_name,
            "loginId": self.login_id,
            "trustScore": self.trust,
            "tokenBalance": self.balance,
            "subscription": "FREE",
            "profileImageUrl": self.profile_image_url,
            "socialAccounts": [
                { "provider": "kakao", "linked": true, "email": "test@kakao.com" },
                { "provider": "google", "linked": false },
                { "provider": "apple", "linked": false },
            ],
        })
    }
}

struct FixtureState {
    posts: Vec<FixturePost>,
    next_post_id: u64,
    profile: Profile,
    taken_login_ids: BTreeSet<String>,
}

impl FixtureState {
    fn seeded() -> Self {
        let profile = Profile {
            user_id: 1,
            user_name: "테스터".to_string(),
            login_id: "test".to_string(),
            password: "1234".to_string(),
            trust: 85,
            balance: 120,
            profile_image_url: None,
        };
        let posts = SEED
            .iter()
            .map(|seed| FixturePost::from_seed(seed, &profile.login_id))
            .collect();
        Self {
            posts,
            next_post_id: 100,
            profile,
            taken_login_ids: ["admin", "test"].into_iter().map(String::from).collect(),
        }
    }

    fn post(&self, id: u64) -> Option<&FixturePost> {
        self.posts.iter().find(|p| p.id == id)
    }

    fn post_mut(&mut self, id: u64) -> Option<&mut FixturePost> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    /// The caller's own post, or the error response explaining why not.
    fn own_post_mut(&mut self, id: u64) -> Result<&mut FixturePost, HttpResponse> {
        match self.post_mut(id) {
            Some(post) if post.mine => Ok(post),
            Some(_) => Err(message(403, NOT_AUTHOR)),
            None => Err(message(404, POST_NOT_FOUND)),
        }
    }

    fn sorted(&self, sort: SortOrder) -> Vec<&FixturePost> {
        let mut posts: Vec<&FixturePost> = self.posts.iter().collect();
        sort_posts(&mut posts, sort);
        posts
    }
}

fn sort_posts(posts: &mut [&FixturePost], sort: SortOrder) {
    posts.sort_by(|a, b| {
        let primary = match sort {
            SortOrder::Latest => b.created_at.cmp(&a.created_at),
            SortOrder::Views => b.views.cmp(&a.views),
            SortOrder::Likes => b.likes.cmp(&a.likes),
        };
        primary.then(b.id.cmp(&a.id))
    });
}

fn page_json(items: Vec<Value>, page: u32, size: u32) -> Value {
    let total = items.len();
    let size = size as usize;
    let start = (page as usize).saturating_mul(size);
    let content: Vec<Value> = items.into_iter().skip(start).take(size).collect();
    json!({
        "content": content,
        "pageInfo": {
            "currentPage": page,
            "hasNext": start.saturating_add(size) < total,
            "totalElements": total,
        },
    })
}

fn reply(status: u16, body: Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

fn envelope(status: u16, data: Value) -> HttpResponse {
    reply(status, json!({ "status": status, "message": "성공", "data": data }))
}

fn message(status: u16, text: &str) -> HttpResponse {
    reply(status, json!({ "status": status, "message": text }))
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

const NOTIFICATIONS: [(u64, &str, &str); 2] = [
    (1, "2026.02.20", "PastUs에 오신 것을 환영합니다! 첫 번째 과거를 기록해보세요."),
    (2, "2026.02.18", "신뢰도 점수 산정 기준이 업데이트되었습니다."),
];

fn notification_json((id, date, content): (u64, &str, &str)) -> Value {
    json!({ "id": id, "date": date, "sender": "PastUs 운영팀", "content": content })
}

/// In-memory stand-in for the backend.
pub struct FixtureSource {
    api: PastusClient,
    delay: Duration,
    state: Mutex<FixtureState>,
}

impl FixtureSource {
    pub fn new(delay: Duration) -> Self {
        Self {
            api: PastusClient::new("fixture://pastus"),
            delay,
            state: Mutex::new(FixtureState::seeded()),
        }
    }

    async fn pause(&self) {
        sleep(self.delay).await;
    }

    /// Tag and profile fixtures answer faster than the rest.
    async fn pause_short(&self) {
        sleep(self.delay * 3 / 5).await;
    }
}

impl std::fmt::Debug for FixtureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureSource")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthSource for FixtureSource {
    async fn login(&self, input: &LoginRequest) -> ApiResult<Envelope<LoginResponse>> {
        self.pause().await;
        let state = self.state.lock().await;
        let profile = &state.profile;
        let response = if input.login_id == profile.login_id && input.password == profile.password
        {
            envelope(
                200,
                json!({
                    "token": { "accessToken": FIXTURE_TOKEN },
                    "user": { "userId": profile.user_id, "userName": profile.user_name },
                }),
            )
        } else {
            debug!(login_id = %input.login_id, "fixture login rejected");
            message(401, LOGIN_FAILED)
        };
        self.api.parse_login(response)
    }

    async fn signup(&self, input: &SignupRequest) -> ApiResult<Envelope<()>> {
        self.pause().await;
        let mut state = self.state.lock().await;
        let response = if state.taken_login_ids.contains(&input.login_id) {
            message(409, LOGIN_ID_TAKEN_MESSAGE)
        } else if input.password != input.confirm_password {
            message(400, &ValidationError::PasswordMismatch.to_string())
        } else {
            state.taken_login_ids.insert(input.login_id.clone());
            message(201, "회원가입이 완료되었습니다.")
        };
        self.api.parse_signup(response)
    }

    async fn check_login_id(&self, login_id: &str) -> ApiResult<Availability> {
        self.pause().await;
        let state = self.state.lock().await;
        let response = if state.taken_login_ids.contains(login_id) {
            message(400, LOGIN_ID_TAKEN_MESSAGE)
        } else {
            reply(200, json!({ "available": true, "message": "사용 가능한 아이디입니다." }))
        };
        self.api.parse_check_login_id(response)
    }

    async fn check_phone(&self, phone_number: &str) -> ApiResult<Availability> {
        self.pause().await;
        let response = if digits_only(phone_number) == TAKEN_PHONE {
            message(400, PHONE_TAKEN_MESSAGE)
        } else {
            reply(200, json!({ "available": true, "message": "사용 가능한 번호입니다." }))
        };
        self.api.parse_check_phone(response)
    }

    async fn find_account(&self, input: &AccountLookup) -> ApiResult<Envelope<()>> {
        self.pause().await;
        let state = self.state.lock().await;
        let response = if input.login_id == state.profile.login_id
            && digits_only(&input.phone_number) == REGISTERED_PHONE
        {
            message(200, "계정이 확인되었습니다.")
        } else {
            message(400, "일치하는 정보가 없습니다.")
        };
        self.api.parse_find_account(response)
    }

    async fn verify_code(&self, input: &VerifyCodeRequest) -> ApiResult<Envelope<()>> {
        self.pause().await;
        let response = if digits_only(&input.code) == VERIFICATION_CODE {
            message(200, "인증되었습니다.")
        } else {
            message(400, "인증번호가 올바르지 않습니다.")
        };
        self.api.parse_verify_code(response)
    }
}

#[async_trait]
impl PostSource for FixtureSource {
    async fn list_posts(&self, page: u32, size: u32) -> ApiResult<Envelope<Page<PostSummary>>> {
        self.pause().await;
        let state = self.state.lock().await;
        let items = state
            .sorted(SortOrder::Latest)
            .into_iter()
            .map(FixturePost::summary_json)
            .collect();
        self.api
            .parse_list_posts(envelope(200, page_json(items, page, size)))
    }

    async fn trending_posts(&self) -> ApiResult<Envelope<Vec<PostSummary>>> {
        self.pause().await;
        let state = self.state.lock().await;
        let items: Vec<Value> = state
            .sorted(SortOrder::Likes)
            .into_iter()
            .take(10)
            .map(FixturePost::summary_json)
            .collect();
        self.api.parse_trending_posts(envelope(200, json!(items)))
    }

    async fn search_posts(&self, query: &SearchQuery) -> ApiResult<Envelope<SearchResults>> {
        self.pause().await;
        let state = self.state.lock().await;
        let keyword = query
            .keyword
            .as_deref()
            .map(|k| k.trim_start_matches('#').trim())
            .filter(|k| !k.is_empty());
        let items: Vec<Value> = state
            .sorted(query.sort)
            .into_iter()
            .filter(|p| {
                keyword.map_or(true, |k| {
                    p.title.contains(k)
                        || p.tag_ids
                            .iter()
                            .filter_map(|id| tag_name(*id))
                            .any(|name| name.contains(k))
                })
            })
            .filter(|p| query.tags.iter().all(|t| p.tag_ids.contains(t)))
            .skip((query.page as usize).saturating_mul(query.size as usize))
            .take(query.size as usize)
            .map(FixturePost::summary_json)
            .collect();
        self.api
            .parse_search_posts(envelope(200, json!({ "items": items })))
    }

    async fn get_post(&self, id: u64) -> ApiResult<Envelope<PostDetail>> {
        self.pause().await;
        let mut state = self.state.lock().await;
        let response = match state.post_mut(id) {
            Some(post) => {
                post.views += 1;
                envelope(200, post.detail_json())
            }
            None => message(404, POST_NOT_FOUND),
        };
        self.api.parse_get_post(response)
    }

    async fn post_tags(&self, id: u64) -> ApiResult<Envelope<Vec<Tag>>> {
        self.pause_short().await;
        let state = self.state.lock().await;
        let response = match state.post(id) {
            Some(post) => {
                let tags: Vec<Value> = post
                    .tag_ids
                    .iter()
                    .filter_map(|id| tag_name(*id).map(|name| json!({ "id": id, "name": name })))
                    .collect();
                envelope(200, json!(tags))
            }
            None => message(404, POST_NOT_FOUND),
        };
        self.api.parse_post_tags(response)
    }

    async fn create_post(&self, draft: &PostDraft) -> ApiResult<Envelope<PostDetail>> {
        draft.validate()?;
        self.pause().await;
        let mut state = self.state.lock().await;
        let id = state.next_post_id;
        state.next_post_id += 1;
        let mut post = FixturePost {
            id,
            title: String::new(),
            situation: String::new(),
            action: String::new(),
            retrospective: String::new(),
            author: state.profile.login_id.clone(),
            trust: state.profile.trust,
            anonymous: false,
            tag_ids: Vec::new(),
            likes: 0,
            views: 0,
            liked: false,
            mine: true,
            use_token: false,
            created_at: now(),
            updated_at: None,
        };
        post.apply_draft(draft);
        let response = envelope(201, post.detail_json());
        state.posts.push(post);
        debug!(post_id = id, "fixture post created");
        self.api.parse_create_post(response)
    }

    async fn update_post(&self, id: u64, update: &PostUpdate) -> ApiResult<Envelope<PostDetail>> {
        update.validate()?;
        self.pause().await;
        let mut state = self.state.lock().await;
        let response = match state.own_post_mut(id) {
            Ok(post) => {
                post.apply_update(update);
                post.updated_at = Some(now());
                envelope(200, post.detail_json())
            }
            Err(response) => response,
        };
        self.api.parse_update_post(response)
    }

    async fn replace_post(&self, id: u64, draft: &PostDraft) -> ApiResult<Envelope<PostDetail>> {
        draft.validate()?;
        self.pause().await;
        let mut state = self.state.lock().await;
        let response = match state.own_post_mut(id) {
            Ok(post) => {
                post.apply_draft(draft);
                post.updated_at = Some(now());
                envelope(200, post.detail_json())
            }
            Err(response) => response,
        };
        self.api.parse_update_post(response)
    }

    async fn delete_post(&self, id: u64) -> ApiResult<Envelope<()>> {
        self.pause().await;
        let mut state = self.state.lock().await;
        let response = match state.own_post_mut(id).map(|post| post.id) {
            Ok(id) => {
                state.posts.retain(|p| p.id != id);
                HttpResponse::new(204, "")
            }
            Err(response) => response,
        };
        self.api.parse_delete_post(response)
    }

    async fn toggle_like(&self, id: u64) -> ApiResult<LikeState> {
        self.pause().await;
        let mut state = self.state.lock().await;
        let response = match state.post_mut(id) {
            Some(post) => {
                post.liked = !post.liked;
                if post.liked {
                    post.likes += 1;
                } else {
                    post.likes = post.likes.saturating_sub(1);
                }
                reply(200, json!({ "liked": post.liked, "totalLikes": post.likes }))
            }
            None => message(404, POST_NOT_FOUND),
        };
        self.api.parse_toggle_like(response)
    }

    async fn trending_tags(&self) -> ApiResult<Envelope<Vec<String>>> {
        self.pause_short().await;
        self.api
            .parse_trending_tags(envelope(200, json!(TRENDING_TAGS)))
    }
}

#[async_trait]
impl UserSource for FixtureSource {
    async fn dashboard(&self) -> ApiResult<Envelope<UserDashboard>> {
        self.pause_short().await;
        let state = self.state.lock().await;
        self.api
            .parse_dashboard(envelope(200, state.profile.dashboard_json()))
    }

    async fn account_detail(&self) -> ApiResult<Envelope<AccountDetail>> {
        self.pause_short().await;
        let state = self.state.lock().await;
        self.api
            .parse_account_detail(envelope(200, state.profile.detail_json()))
    }

    async fn update_account(&self, update: &AccountUpdate) -> ApiResult<Envelope<AccountDetail>> {
        if update.is_empty() {
            return Err(ValidationError::MissingFields.into());
        }
        if let Some(login_id) = &update.login_id {
            validate_login_id(login_id)?;
        }
        self.pause().await;
        let mut state = self.state.lock().await;
        let wrong_password = update.new_password.is_some()
            && update.current_password.as_deref() != Some(state.profile.password.as_str());
        let id_taken = update
            .login_id
            .as_ref()
            .is_some_and(|id| *id != state.profile.login_id && state.taken_login_ids.contains(id));

        let response = if wrong_password {
            message(400, "현재 비밀번호가 일치하지 않습니다.")
        } else if id_taken {
            message(409, LOGIN_ID_TAKEN_MESSAGE)
        } else {
            if let Some(login_id) = &update.login_id {
                let previous = std::mem::replace(&mut state.profile.login_id, login_id.clone());
                state.taken_login_ids.remove(&previous);
                state.taken_login_ids.insert(login_id.clone());
                for post in state.posts.iter_mut().filter(|p| p.mine) {
                    post.author = login_id.clone();
                }
            }
            if let Some(password) = &update.new_password {
                state.profile.password = password.clone();
            }
            if let Some(url) = &update.profile_image_url {
                state.profile.profile_image_url = Some(url.clone());
            }
            envelope(200, state.profile.detail_json())
        };
        self.api.parse_update_account(response)
    }
}

#[async_trait]
impl ArchiveSource for FixtureSource {
    async fn archive_posts(
        &self,
        filter: ArchiveFilter,
        sort: SortOrder,
        page: u32,
    ) -> ApiResult<Envelope<Page<ArchivePost>>> {
        self.pause().await;
        let state = self.state.lock().await;
        let items = state
            .sorted(sort)
            .into_iter()
            .filter(|p| match filter {
                ArchiveFilter::MyPost => p.mine,
                ArchiveFilter::Liked => p.liked && !p.mine,
            })
            .map(FixturePost::archive_json)
            .collect();
        self.api
            .parse_archive_posts(envelope(200, page_json(items, page, ARCHIVE_PAGE_SIZE)))
    }
}

#[async_trait]
impl NotificationSource for FixtureSource {
    async fn notifications(&self) -> ApiResult<Envelope<Vec<Notification>>> {
        self.pause().await;
        let items: Vec<Value> = NOTIFICATIONS.into_iter().map(notification_json).collect();
        self.api.parse_list_notifications(envelope(200, json!(items)))
    }

    async fn notification(&self, id: u64) -> ApiResult<Envelope<Notification>> {
        self.pause().await;
        let response = match NOTIFICATIONS.into_iter().find(|(n, _, _)| *n == id) {
            Some(entry) => envelope(200, notification_json(entry)),
            None => message(404, "알림을 찾을 수 없습니다."),
        };
        self.api.parse_get_notification(response)
    }
}

#[async_trait]
impl TokenSource for FixtureSource {
    async fn token_action(
        &self,
        action: TokenAction,
        input: &TokenRequest,
    ) -> ApiResult<TokenReceipt> {
        self.pause().await;
        let mut state = self.state.lock().await;
        let balance = &mut state.profile.balance;
        let response = match action {
            TokenAction::Deduct if input.amount > *balance => message(400, "토큰이 부족합니다."),
            TokenAction::Deduct => {
                *balance -= input.amount;
                reply(200, json!({ "success": true, "remainingTokens": *balance }))
            }
            TokenAction::Earn => match balance.checked_add(input.amount) {
                Some(total) => {
                    *balance = total;
                    reply(200, json!({ "success": true, "remainingTokens": total }))
                }
                None => message(400, "보유할 수 있는 토큰 한도를 초과했습니다."),
            },
        };
        self.api.parse_token_action(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pastus_core::ApiError;

    fn source() -> FixtureSource {
        FixtureSource::new(Duration::from_millis(500))
    }

    #[tokio::test(start_paused = true)]
    async fn login_accepts_fixture_credentials() {
        let login = LoginRequest {
            login_id: "test".to_string(),
            password: "1234".to_string(),
        };
        let env = source().login(&login).await.unwrap();
        assert_eq!(env.status, 200);
        assert_eq!(env.data.token.access_token, FIXTURE_TOKEN);
        assert_eq!(env.data.user.user_id, 1);
        assert_eq!(env.data.user.user_name, "테스터");
    }

    #[tokio::test(start_paused = true)]
    async fn login_rejects_other_pairs() {
        for (id, pw) in [("test", "12345"), ("admin", "1234"), ("", "")] {
            let login = LoginRequest {
                login_id: id.to_string(),
                password: pw.to_string(),
            };
            let err = source().login(&login).await.unwrap_err();
            assert_eq!(err.status(), Some(401));
            assert_eq!(err.message(), LOGIN_FAILED);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fixture_waits_for_configured_delay() {
        let started = tokio::time::Instant::now();
        source().trending_posts().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn anonymous_author_hides_login_id() {
        let env = source().get_post(2).await.unwrap();
        assert!(env.data.author.is_anonymous());
        assert_eq!(env.data.author.display_name(), ANONYMOUS_DISPLAY_NAME);
    }

    #[tokio::test(start_paused = true)]
    async fn pages_are_deterministic() {
        let source = source();
        let first = source.list_posts(0, 3).await.unwrap().data;
        let again = source.list_posts(0, 3).await.unwrap().data;
        let ids = |page: &Page<PostSummary>| page.content.iter().map(|p| p.post_id).collect::<Vec<_>>();
        assert_eq!(ids(&first), vec![42, 5, 4]);
        assert_eq!(ids(&first), ids(&again));
        assert!(first.page_info.has_next);
        assert_eq!(first.page_info.total_elements, 6);

        let last = source.list_posts(1, 3).await.unwrap().data;
        assert_eq!(ids(&last), vec![3, 2, 1]);
        assert!(!last.page_info.has_next);
    }

    #[tokio::test(start_paused = true)]
    async fn search_matches_tag_names_without_hash() {
        let query = SearchQuery {
            keyword: Some("#장학금".to_string()),
            ..SearchQuery::default()
        };
        let env = source().search_posts(&query).await.unwrap();
        let ids: Vec<u64> = env.data.items.iter().map(|p| p.post_id).collect();
        assert_eq!(ids, vec![42, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn editing_someone_elses_post_is_forbidden() {
        let update = PostUpdate {
            title: Some("수정".to_string()),
            ..PostUpdate::default()
        };
        let err = source().update_post(1, &update).await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 403, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn deduct_beyond_balance_fails() {
        let request = TokenRequest {
            amount: 500,
            reason: "글 열람".to_string(),
            ref_id: Some(3),
        };
        let err = source()
            .token_action(TokenAction::Deduct, &request)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "토큰이 부족합니다.");
    }

    #[tokio::test(start_paused = true)]
    async fn earn_overflow_is_rejected_and_balance_kept() {
        let source = source();
        let request = TokenRequest {
            amount: u64::MAX,
            reason: "이벤트".to_string(),
            ref_id: None,
        };
        let err = source
            .token_action(TokenAction::Earn, &request)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));

        let receipt = source
            .token_action(
                TokenAction::Earn,
                &TokenRequest {
                    amount: 1,
                    ..request
                },
            )
            .await
            .unwrap();
        assert_eq!(receipt.remaining_tokens, 121);
    }

    #[tokio::test(start_paused = true)]
    async fn liked_archive_excludes_own_posts() {
        let env = source()
            .archive_posts(ArchiveFilter::Liked, SortOrder::Latest, 0)
            .await
            .unwrap();
        let ids: Vec<u64> = env.data.content.iter().map(|p| p.post_id).collect();
        assert_eq!(ids, vec![3]);
    }
}
