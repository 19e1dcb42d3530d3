use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::{Db, PostRecord, Store};
use crate::{envelope, require_user, session_user, Failure, Reply};

const TRENDING_LIMIT: usize = 10;
const MAX_TAGS: usize = 3;
const TRENDING_TAGS: [&str; 5] = ["군대", "휴학", "성적", "장학금", "졸업"];

#[derive(Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub tags: Option<String>,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
    #[serde(default)]
    pub sort: Option<String>,
}

fn default_size() -> usize {
    20
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftInput {
    pub title: String,
    pub situation: String,
    pub action: String,
    pub retrospective: String,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub use_token: bool,
    #[serde(default)]
    pub tag_ids: Vec<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInput {
    pub title: Option<String>,
    pub situation: Option<String>,
    pub action: Option<String>,
    pub retrospective: Option<String>,
    pub is_anonymous: Option<bool>,
    pub tag_ids: Option<Vec<u64>>,
}

pub(crate) fn author_view(store: &Store, post: &PostRecord) -> Value {
    let trust = store.user(post.author_id).map(|u| u.trust_score).unwrap_or(0);
    if post.is_anonymous {
        json!({ "isAnonymous": true, "trustScore": trust })
    } else {
        let login_id = store
            .user(post.author_id)
            .map(|u| u.login_id.clone())
            .unwrap_or_default();
        json!({ "isAnonymous": false, "loginId": login_id, "trustScore": trust })
    }
}

pub(crate) fn summary_view(store: &Store, post: &PostRecord) -> Value {
    json!({
        "postId": post.id,
        "title": post.title,
        "author": author_view(store, post),
        "tags": store.tag_names(post),
        "likeCount": store.like_count(post),
        "viewCount": post.view_count,
        "createdAt": post.created_at,
    })
}

fn detail_view(store: &Store, post: &PostRecord, viewer: Option<u64>) -> Value {
    json!({
        "postId": post.id,
        "title": post.title,
        "situation": post.situation,
        "action": post.action,
        "retrospective": post.retrospective,
        "author": author_view(store, post),
        "tags": store.tag_names(post),
        "likeCount": store.like_count(post),
        "viewCount": post.view_count,
        "createdAt": post.created_at,
        "updatedAt": post.updated_at,
        "isLiked": viewer.is_some_and(|u| store.likes.contains(&(u, post.id))),
        "isAuthor": viewer == Some(post.author_id),
        "useToken": post.use_token,
    })
}

pub(crate) fn page_view(items: Vec<Value>, page: usize, size: usize) -> Value {
    let total = items.len();
    let size = size.max(1);
    let content: Vec<Value> = items.into_iter().skip(page * size).take(size).collect();
    json!({
        "content": content,
        "pageInfo": {
            "currentPage": page,
            "hasNext": (page + 1) * size < total,
            "totalElements": total,
        }
    })
}

fn now() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

fn check_draft(store: &Store, fields: &[&str], tag_ids: Option<&[u64]>) -> Result<(), Failure> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "모든 항목을 작성해주세요."));
    }
    if let Some(ids) = tag_ids {
        if ids.len() > MAX_TAGS {
            return Err(Failure::new(StatusCode::BAD_REQUEST, "태그는 최대 3개까지 선택할 수 있습니다."));
        }
        if ids.iter().any(|id| !store.tags.contains_key(id)) {
            return Err(Failure::new(StatusCode::BAD_REQUEST, "존재하지 않는 태그입니다."));
        }
    }
    Ok(())
}

fn owned_post<'a>(store: &'a mut Store, id: u64, user_id: u64) -> Result<&'a mut PostRecord, Failure> {
    let post = store.posts.get_mut(&id).ok_or_else(|| Failure::not_found("게시글"))?;
    if post.author_id != user_id {
        return Err(Failure::new(StatusCode::FORBIDDEN, "작성자만 수정할 수 있습니다."));
    }
    Ok(post)
}

pub async fn list_posts(State(db): State<Db>, Query(params): Query<PageParams>) -> Reply {
    let store = db.read().await;
    let items = store
        .newest_first()
        .into_iter()
        .map(|p| summary_view(&store, p))
        .collect();
    Ok(envelope(StatusCode::OK, "조회 성공", page_view(items, params.page, params.size)))
}

pub async fn trending_posts(State(db): State<Db>) -> Reply {
    let store = db.read().await;
    let mut posts: Vec<&PostRecord> = store.posts.values().collect();
    posts.sort_by(|a, b| {
        store
            .like_count(b)
            .cmp(&store.like_count(a))
            .then(a.id.cmp(&b.id))
    });
    let items: Vec<Value> = posts
        .into_iter()
        .take(TRENDING_LIMIT)
        .map(|p| summary_view(&store, p))
        .collect();
    Ok(envelope(StatusCode::OK, "조회 성공", items))
}

pub async fn search_posts(State(db): State<Db>, Query(params): Query<SearchParams>) -> Reply {
    let store = db.read().await;
    let keyword = params
        .keyword
        .as_deref()
        .map(|k| k.trim_start_matches('#').to_string())
        .filter(|k| !k.is_empty());
    let tag_filter: Vec<u64> = params
        .tags
        .as_deref()
        .map(|t| t.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();

    let mut hits: Vec<&PostRecord> = store
        .newest_first()
        .into_iter()
        .filter(|p| {
            keyword.as_ref().map_or(true, |k| {
                p.title.contains(k.as_str())
                    || p.tag_ids
                        .iter()
                        .filter_map(|id| store.tags.get(id))
                        .any(|name| name.contains(k.as_str()))
            })
        })
        .filter(|p| tag_filter.iter().all(|t| p.tag_ids.contains(t)))
        .collect();
    match params.sort.as_deref() {
        Some("views") => hits.sort_by(|a, b| b.view_count.cmp(&a.view_count)),
        Some("likes") => hits.sort_by_key(|p| std::cmp::Reverse(store.like_count(p))),
        _ => {}
    }
    let items: Vec<Value> = hits
        .into_iter()
        .skip(params.page * params.size)
        .take(params.size)
        .map(|p| summary_view(&store, p))
        .collect();
    Ok(envelope(StatusCode::OK, "검색 성공", json!({ "items": items })))
}

pub async fn get_post(State(db): State<Db>, headers: HeaderMap, Path(id): Path<u64>) -> Reply {
    let mut store = db.write().await;
    let viewer = session_user(&store, &headers);
    let post = store.posts.get_mut(&id).ok_or_else(|| Failure::not_found("게시글"))?;
    post.view_count += 1;
    let post = post.clone();
    Ok(envelope(StatusCode::OK, "조회 성공", detail_view(&store, &post, viewer)))
}

pub async fn post_tags(State(db): State<Db>, Path(id): Path<u64>) -> Reply {
    let store = db.read().await;
    let post = store.posts.get(&id).ok_or_else(|| Failure::not_found("게시글"))?;
    let tags: Vec<Value> = post
        .tag_ids
        .iter()
        .filter_map(|tid| store.tags.get(tid).map(|name| json!({ "id": tid, "name": name })))
        .collect();
    Ok(envelope(StatusCode::OK, "조회 성공", tags))
}

pub async fn create_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<DraftInput>,
) -> Reply {
    let mut store = db.write().await;
    let user_id = require_user(&store, &headers)?;
    check_draft(
        &store,
        &[
            input.title.as_str(),
            input.situation.as_str(),
            input.action.as_str(),
            input.retrospective.as_str(),
        ],
        Some(&input.tag_ids),
    )?;
    let id = store.next_post_id;
    store.next_post_id += 1;
    let post = PostRecord {
        id,
        author_id: user_id,
        title: input.title,
        situation: input.situation,
        action: input.action,
        retrospective: input.retrospective,
        is_anonymous: input.is_anonymous,
        use_token: input.use_token,
        tag_ids: input.tag_ids,
        view_count: 0,
        outside_likes: 0,
        created_at: now(),
        updated_at: None,
    };
    store.posts.insert(id, post.clone());
    tracing::debug!(post_id = id, user_id, "post created");
    Ok(envelope(
        StatusCode::CREATED,
        "기록이 완료되었습니다.",
        detail_view(&store, &post, Some(user_id)),
    ))
}

pub async fn replace_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(input): Json<DraftInput>,
) -> Reply {
    let mut store = db.write().await;
    let user_id = require_user(&store, &headers)?;
    check_draft(
        &store,
        &[
            input.title.as_str(),
            input.situation.as_str(),
            input.action.as_str(),
            input.retrospective.as_str(),
        ],
        Some(&input.tag_ids),
    )?;
    let post = owned_post(&mut store, id, user_id)?;
    post.title = input.title;
    post.situation = input.situation;
    post.action = input.action;
    post.retrospective = input.retrospective;
    post.is_anonymous = input.is_anonymous;
    post.use_token = input.use_token;
    post.tag_ids = input.tag_ids;
    post.updated_at = Some(now());
    let post = post.clone();
    Ok(envelope(StatusCode::OK, "수정되었습니다.", detail_view(&store, &post, Some(user_id))))
}

pub async fn update_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(input): Json<UpdateInput>,
) -> Reply {
    let mut store = db.write().await;
    let user_id = require_user(&store, &headers)?;
    let present: Vec<&str> = [&input.title, &input.situation, &input.action, &input.retrospective]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();
    check_draft(&store, &present, input.tag_ids.as_deref())?;
    let post = owned_post(&mut store, id, user_id)?;
    if let Some(title) = input.title {
        post.title = title;
    }
    if let Some(situation) = input.situation {
        post.situation = situation;
    }
    if let Some(action) = input.action {
        post.action = action;
    }
    if let Some(retrospective) = input.retrospective {
        post.retrospective = retrospective;
    }
    if let Some(is_anonymous) = input.is_anonymous {
        post.is_anonymous = is_anonymous;
    }
    if let Some(tag_ids) = input.tag_ids {
        post.tag_ids = tag_ids;
    }
    post.updated_at = Some(now());
    let post = post.clone();
    Ok(envelope(StatusCode::OK, "수정되었습니다.", detail_view(&store, &post, Some(user_id))))
}

pub async fn delete_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    let user_id = require_user(&store, &headers)?;
    owned_post(&mut store, id, user_id)?;
    store.posts.remove(&id);
    store.likes.retain(|(_, post_id)| *post_id != id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_like(State(db): State<Db>, headers: HeaderMap, Path(id): Path<u64>) -> Reply {
    let mut store = db.write().await;
    let user_id = require_user(&store, &headers)?;
    if !store.posts.contains_key(&id) {
        return Err(Failure::not_found("게시글"));
    }
    let liked = if store.likes.remove(&(user_id, id)) {
        false
    } else {
        store.likes.insert((user_id, id));
        true
    };
    let total = store.posts.get(&id).map(|p| store.like_count(p)).unwrap_or(0);
    Ok((StatusCode::OK, Json(json!({ "liked": liked, "totalLikes": total }))))
}

pub async fn trending_tags() -> Reply {
    Ok(envelope(StatusCode::OK, "조회 성공", TRENDING_TAGS))
}
