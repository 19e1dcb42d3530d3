//! Post lifecycle against the live mock backend.
//!
//! # Design
//! Starts the mock server on a random port, then drives the core client over
//! real HTTP using ureq. The bearer token from the login response is attached
//! with `HttpRequest::with_bearer`, the same way the async transport does it.

use pastus_core::types::{LoginRequest, PostDraft, PostUpdate};
use pastus_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, PastusClient};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Status codes are returned as data so the core parsers classify them.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let auth = req.header("authorization").map(str::to_string);
    let with_auth = |builder: ureq::RequestBuilder<ureq::typestate::WithoutBody>| match &auth {
        Some(value) => builder.header("authorization", value),
        None => builder,
    };
    let with_auth_body = |builder: ureq::RequestBuilder<ureq::typestate::WithBody>| match &auth {
        Some(value) => builder.header("authorization", value),
        None => builder,
    };

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => with_auth(agent.get(&req.path)).call(),
        (HttpMethod::Delete, _) => with_auth(agent.delete(&req.path)).call(),
        (HttpMethod::Post, Some(body)) => with_auth_body(agent.post(&req.path))
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => with_auth_body(agent.post(&req.path)).send_empty(),
        (HttpMethod::Put, Some(body)) => with_auth_body(agent.put(&req.path))
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Patch, Some(body)) => with_auth_body(agent.patch(&req.path))
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Put | HttpMethod::Patch, None) => panic!("update without body"),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn post_lifecycle() {
    let client = PastusClient::new(&start_server());

    // Step 1: writing without a session is rejected.
    let draft = PostDraft {
        title: "군 복무 중 자격증 준비".to_string(),
        situation: "상병 때 시간이 남았습니다.".to_string(),
        action: "전산 자격증을 준비했습니다.".to_string(),
        retrospective: "전역 후 취업 준비에 큰 도움이 되었습니다.".to_string(),
        is_anonymous: false,
        use_token: false,
        tag_ids: vec![1, 6],
    };
    let req = client.build_create_post(&draft).unwrap();
    let err = client.parse_create_post(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));

    // Step 2: log in.
    let login = LoginRequest {
        login_id: "test".to_string(),
        password: "1234".to_string(),
    };
    let req = client.build_login(&login).unwrap();
    let session = client.parse_login(execute(req)).unwrap();
    let token = session.data.token.access_token;
    assert_eq!(session.data.user.user_id, 1);

    // Step 3: create.
    let req = client.build_create_post(&draft).unwrap().with_bearer(&token);
    let created = client.parse_create_post(execute(req)).unwrap().data;
    assert_eq!(created.title, draft.title);
    assert_eq!(created.tags, vec!["#군대", "#취업"]);
    assert_eq!(created.author.display_name(), "test");
    let id = created.post_id;

    // Step 4: get, as the author.
    let req = client.build_get_post(id).with_bearer(&token);
    let fetched = client.parse_get_post(execute(req)).unwrap().data;
    assert!(fetched.is_author);
    assert_eq!(fetched.view_count, created.view_count + 1);

    // Step 5: partial update.
    let update = PostUpdate {
        retrospective: Some("결국 그 자격증으로 첫 직장을 구했습니다.".to_string()),
        ..PostUpdate::default()
    };
    let req = client.build_update_post(id, &update).unwrap().with_bearer(&token);
    let updated = client.parse_update_post(execute(req)).unwrap().data;
    assert_eq!(updated.title, draft.title);
    assert_eq!(updated.retrospective, "결국 그 자격증으로 첫 직장을 구했습니다.");

    // Step 6: like, then unlike.
    let req = client.build_toggle_like(id).with_bearer(&token);
    let liked = client.parse_toggle_like(execute(req)).unwrap();
    assert!(liked.liked);
    assert_eq!(liked.total_likes, 1);
    let req = client.build_toggle_like(id).with_bearer(&token);
    let unliked = client.parse_toggle_like(execute(req)).unwrap();
    assert!(!unliked.liked);
    assert_eq!(unliked.total_likes, 0);

    // Step 7: delete.
    let req = client.build_delete_post(id).with_bearer(&token);
    let deleted = client.parse_delete_post(execute(req)).unwrap();
    assert_eq!(deleted.status, 204);

    // Step 8: the post is gone.
    let req = client.build_get_post(id).with_bearer(&token);
    let err = client.parse_get_post(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));

    // Step 9: deleting again is NotFound as well.
    let req = client.build_delete_post(id).with_bearer(&token);
    let err = client.parse_delete_post(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[test]
fn first_page_is_stable() {
    let client = PastusClient::new(&start_server());
    let ids = |page: u32| {
        let req = client.build_list_posts(page, 2);
        let env = client.parse_list_posts(execute(req)).unwrap();
        env.data.content.iter().map(|p| p.post_id).collect::<Vec<_>>()
    };
    assert_eq!(ids(0), ids(0));
    assert_eq!(ids(0), vec![101, 102]);
}
