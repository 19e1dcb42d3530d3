//! HTTP-backed services against the live mock backend.
//!
//! # Design
//! Each test starts its own mock server on a random port so sessions and
//! likes never leak between tests. Requests go through the real `reqwest`
//! transport, including bearer injection from the credential store.

use pastus_client::{Credentials, SearchInput, Services};
use pastus_core::types::{ArchiveFilter, PostDraft, SortOrder, TokenAction, TokenRequest};
use pastus_core::ApiError;

async fn services() -> Services {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    Services::http(&format!("http://{addr}"), Credentials::in_memory()).unwrap()
}

#[tokio::test]
async fn sign_in_stores_session_used_by_later_calls() {
    let services = services().await;

    let err = services.users.dashboard().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));

    let env = services.sign_in("test", "1234").await.unwrap();
    assert_eq!(env.status, 200);
    let token = services.credentials().token().unwrap().unwrap();
    assert_eq!(token, env.data.token.access_token);
    assert_eq!(services.credentials().user_id().unwrap(), Some(1));

    let dashboard = services.users.dashboard().await.unwrap();
    assert_eq!(dashboard.data.user_name, "테스터");
    assert_eq!(dashboard.data.token_balance, 120);
}

#[tokio::test]
async fn wrong_password_stores_nothing() {
    let services = services().await;
    let err = services.sign_in("test", "0000").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "아이디/비밀번호가 다릅니다. 다시 확인해주세요");
    assert!(services.credentials().token().unwrap().is_none());
}

#[tokio::test]
async fn double_like_restores_state() {
    let services = services().await;
    services.sign_in("test", "1234").await.unwrap();

    let before = services.posts.get_post(101).await.unwrap().data;
    let first = services.posts.toggle_like(101).await.unwrap();
    assert_eq!(first.liked, !before.is_liked);
    assert_eq!(first.total_likes, before.like_count + 1);

    let second = services.posts.toggle_like(101).await.unwrap();
    assert_eq!(second.liked, before.is_liked);
    assert_eq!(second.total_likes, before.like_count);
}

#[tokio::test]
async fn create_then_delete_own_post() {
    let services = services().await;
    services.sign_in("test", "1234").await.unwrap();

    let draft = PostDraft {
        title: "전과를 고민하던 2학년".to_string(),
        situation: "전공이 맞지 않았습니다.".to_string(),
        action: "교양 수업으로 다른 분야를 들어봤습니다.".to_string(),
        retrospective: "더 일찍 시도해볼 걸 그랬습니다.".to_string(),
        is_anonymous: true,
        use_token: false,
        tag_ids: vec![2, 10],
    };
    let created = services.posts.create_post(&draft).await.unwrap().data;
    assert!(created.author.is_anonymous());
    assert!(created.is_author);

    let deleted = services.posts.delete_post(created.post_id).await.unwrap();
    assert_eq!(deleted.status, 204);

    let err = services.posts.get_post(created.post_id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[tokio::test]
async fn deleting_someone_elses_post_is_forbidden() {
    let services = services().await;
    services.sign_in("test", "1234").await.unwrap();
    let err = services.posts.delete_post(201).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn hash_and_bare_terms_reach_the_same_posts() {
    let services = services().await;
    let history = services.search_history();

    let mut input = SearchInput::new();
    input.edit("#연애");
    let with_hash: Vec<u64> = input
        .submit(&services, &history)
        .await
        .unwrap()
        .iter()
        .map(|p| p.post_id)
        .collect();

    input.edit("연애");
    let bare: Vec<u64> = input
        .submit(&services, &history)
        .await
        .unwrap()
        .iter()
        .map(|p| p.post_id)
        .collect();

    assert_eq!(with_hash, vec![102]);
    assert_eq!(with_hash, bare);
    assert_eq!(history.entries().unwrap(), vec!["연애", "#연애"]);
}

#[tokio::test]
async fn liked_archive_and_token_deduction() {
    let services = services().await;
    services.sign_in("test", "1234").await.unwrap();

    let liked = services
        .archive
        .archive_posts(ArchiveFilter::Liked, SortOrder::Latest, 0)
        .await
        .unwrap();
    let ids: Vec<u64> = liked.data.content.iter().map(|p| p.post_id).collect();
    assert_eq!(ids, vec![201]);

    let request = TokenRequest {
        amount: 20,
        reason: "글 열람".to_string(),
        ref_id: Some(103),
    };
    let receipt = services
        .tokens
        .token_action(TokenAction::Deduct, &request)
        .await
        .unwrap();
    assert!(receipt.success);
    assert_eq!(receipt.remaining_tokens, 100);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let services = Services::http(&format!("http://{addr}"), Credentials::in_memory()).unwrap();
    let err = services.posts.trending_tags().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn both_sources_reject_the_same_way() {
    use pastus_core::types::{AccountLookup, Gender, SignupRequest};
    use std::time::Duration;

    let duplicate = SignupRequest {
        login_id: "test".to_string(),
        password: "pw1".to_string(),
        confirm_password: "pw1".to_string(),
        user_name: "중복".to_string(),
        birth_date: "2000-01-01".to_string(),
        gender: Gender::Female,
        phone_number: "010-7777-8888".to_string(),
        third_party_consent: false,
        marketing_consent: false,
    };
    let lookup = AccountLookup {
        login_id: "nobody".to_string(),
        phone_number: "010-0000-1111".to_string(),
    };

    let http = services().await;
    let fixture = Services::fixtures(Duration::ZERO);
    for services in [&http, &fixture] {
        let err = services.auth.signup(&duplicate).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.message(), "이미 사용 중인 아이디입니다.");

        let err = services.auth.find_account(&lookup).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.message(), "일치하는 정보가 없습니다.");
    }
}
