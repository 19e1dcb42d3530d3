use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::posts::page_view;
use crate::state::{Db, PostRecord, Store, UserRecord};
use crate::{envelope, require_user, Failure, Reply};

#[derive(Deserialize)]
pub struct ArchiveParams {
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_filter() -> String {
    "MY_POST".to_string()
}

fn default_sort() -> String {
    "latest".to_string()
}

fn default_size() -> usize {
    20
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    pub login_id: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub profile_image_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInput {
    pub amount: u64,
    pub reason: String,
    #[serde(default)]
    pub ref_id: Option<u64>,
}

fn detail_view(user: &UserRecord) -> Value {
    json!({
        "userId": user.id,
        "userName": user.name,
        "loginId": user.login_id,
        "trustScore": user.trust_score,
        "tokenBalance": user.token_balance,
        "subscription": if user.pro { "PRO" } else { "FREE" },
        "profileImageUrl": user.profile_image_url,
        "socialAccounts": [
            { "provider": "KAKAO", "linked": false },
            { "provider": "GOOGLE", "linked": false },
        ],
    })
}

fn archive_view(store: &Store, post: &PostRecord) -> Value {
    let author = store.user(post.author_id);
    let user_name = match author {
        Some(u) if !post.is_anonymous => u.name.clone(),
        _ => "익명".to_string(),
    };
    json!({
        "postId": post.id,
        "title": post.title,
        "userName": user_name,
        "trustScore": author.map(|u| u.trust_score).unwrap_or(0),
        "viewCount": post.view_count,
        "likeCount": store.like_count(post),
        "createdAt": post.created_at,
        "hashtags": store.tag_names(post),
    })
}

fn current_user<'a>(store: &'a Store, headers: &HeaderMap) -> Result<&'a UserRecord, Failure> {
    let id = require_user(store, headers)?;
    store.user(id).ok_or_else(|| Failure::not_found("사용자"))
}

pub async fn dashboard(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let store = db.read().await;
    let user = current_user(&store, &headers)?;
    Ok(envelope(
        StatusCode::OK,
        "조회 성공",
        json!({
            "userId": user.id,
            "userName": user.name,
            "trustScore": user.trust_score,
            "tokenBalance": user.token_balance,
        }),
    ))
}

pub async fn account_detail(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let store = db.read().await;
    let user = current_user(&store, &headers)?;
    Ok(envelope(StatusCode::OK, "조회 성공", detail_view(user)))
}

pub async fn update_account(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<AccountInput>,
) -> Reply {
    let mut store = db.write().await;
    let user_id = require_user(&store, &headers)?;
    if let Some(login_id) = &input.login_id {
        let taken = store
            .users
            .iter()
            .any(|u| u.id != user_id && &u.login_id == login_id);
        if taken {
            return Err(Failure::new(StatusCode::CONFLICT, "이미 사용 중인 아이디입니다."));
        }
    }
    let user = store.user_mut(user_id).ok_or_else(|| Failure::not_found("사용자"))?;
    if let Some(new_password) = input.new_password {
        if input.current_password.as_deref() != Some(user.password.as_str()) {
            return Err(Failure::new(StatusCode::BAD_REQUEST, "현재 비밀번호가 일치하지 않습니다."));
        }
        user.password = new_password;
    }
    if let Some(login_id) = input.login_id {
        user.login_id = login_id;
    }
    if let Some(url) = input.profile_image_url {
        user.profile_image_url = Some(url);
    }
    let view = detail_view(user);
    Ok(envelope(StatusCode::OK, "수정되었습니다.", view))
}

pub async fn archive_posts(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ArchiveParams>,
) -> Reply {
    let store = db.read().await;
    let user_id = require_user(&store, &headers)?;
    let mut posts: Vec<&PostRecord> = match params.filter.as_str() {
        "MY_POST" => store
            .newest_first()
            .into_iter()
            .filter(|p| p.author_id == user_id)
            .collect(),
        "LIKED" => store
            .newest_first()
            .into_iter()
            .filter(|p| store.likes.contains(&(user_id, p.id)))
            .collect(),
        other => {
            return Err(Failure::new(
                StatusCode::BAD_REQUEST,
                format!("알 수 없는 필터입니다: {other}"),
            ))
        }
    };
    match params.sort.as_str() {
        "views" => posts.sort_by(|a, b| b.view_count.cmp(&a.view_count)),
        "likes" => posts.sort_by_key(|p| std::cmp::Reverse(store.like_count(p))),
        _ => {}
    }
    let items = posts.into_iter().map(|p| archive_view(&store, p)).collect();
    Ok(envelope(StatusCode::OK, "조회 성공하였습니다.", page_view(items, params.page, params.size)))
}

pub async fn list_notifications(State(db): State<Db>) -> Reply {
    let store = db.read().await;
    let items: Vec<Value> = store
        .notifications
        .iter()
        .map(|n| json!({ "id": n.id, "date": n.date, "sender": n.sender, "content": n.content }))
        .collect();
    Ok(envelope(StatusCode::OK, "조회 성공", items))
}

pub async fn get_notification(State(db): State<Db>, Path(id): Path<u64>) -> Reply {
    let store = db.read().await;
    let n = store
        .notifications
        .iter()
        .find(|n| n.id == id)
        .ok_or_else(|| Failure::not_found("알림"))?;
    Ok(envelope(
        StatusCode::OK,
        "조회 성공",
        json!({ "id": n.id, "date": n.date, "sender": n.sender, "content": n.content }),
    ))
}

pub async fn token_action(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(action): Path<String>,
    Json(input): Json<TokenInput>,
) -> Reply {
    let mut store = db.write().await;
    let user_id = require_user(&store, &headers)?;
    if input.amount == 0 {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "수량은 1 이상이어야 합니다."));
    }
    let user = store.user_mut(user_id).ok_or_else(|| Failure::not_found("사용자"))?;
    match action.as_str() {
        "earn" => {
            user.token_balance = user.token_balance.checked_add(input.amount).ok_or_else(|| {
                Failure::new(StatusCode::BAD_REQUEST, "보유할 수 있는 토큰 한도를 초과했습니다.")
            })?;
        }
        "deduct" => {
            if user.token_balance < input.amount {
                return Err(Failure::new(StatusCode::BAD_REQUEST, "토큰이 부족합니다."));
            }
            user.token_balance -= input.amount;
        }
        _ => return Err(Failure::not_found("토큰 작업")),
    }
    tracing::debug!(user_id, %action, reason = %input.reason, ref_id = ?input.ref_id, "token balance changed");
    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "remainingTokens": user.token_balance })),
    ))
}
