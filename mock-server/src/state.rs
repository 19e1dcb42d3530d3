//! In-memory records and the seed data the fake backend starts with.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone, Debug)]
pub struct UserRecord {
    pub id: u64,
    pub login_id: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub trust_score: u8,
    pub token_balance: u64,
    pub pro: bool,
    pub profile_image_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PostRecord {
    pub id: u64,
    pub author_id: u64,
    pub title: String,
    pub situation: String,
    pub action: String,
    pub retrospective: String,
    pub is_anonymous: bool,
    pub use_token: bool,
    pub tag_ids: Vec<u64>,
    pub view_count: u64,
    /// Likes from accounts that do not exist in this store.
    pub outside_likes: u64,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NotificationRecord {
    pub id: u64,
    pub date: String,
    pub sender: String,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct Store {
    pub users: Vec<UserRecord>,
    pub sessions: HashMap<String, u64>,
    pub posts: BTreeMap<u64, PostRecord>,
    pub likes: HashSet<(u64, u64)>,
    pub tags: BTreeMap<u64, String>,
    pub notifications: Vec<NotificationRecord>,
    pub next_user_id: u64,
    pub next_post_id: u64,
}

impl Store {
    pub fn user(&self, id: u64) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: u64) -> Option<&mut UserRecord> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn login_id_taken(&self, login_id: &str) -> bool {
        self.users.iter().any(|u| u.login_id == login_id)
    }

    pub fn like_count(&self, post: &PostRecord) -> u64 {
        let local = self.likes.iter().filter(|(_, p)| *p == post.id).count() as u64;
        post.outside_likes + local
    }

    pub fn tag_names(&self, post: &PostRecord) -> Vec<String> {
        post.tag_ids
            .iter()
            .filter_map(|id| self.tags.get(id))
            .map(|name| format!("#{name}"))
            .collect()
    }

    /// Posts ordered newest first.
    pub fn newest_first(&self) -> Vec<&PostRecord> {
        let mut posts: Vec<&PostRecord> = self.posts.values().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }

    pub fn seeded() -> Self {
        let mut store = Store {
            next_user_id: 5,
            next_post_id: 300,
            ..Default::default()
        };

        for (id, name) in [
            "군대", "휴학", "성적", "장학금", "졸업", "취업", "연애", "꿀팁", "팀플/과제", "학업",
        ]
        .into_iter()
        .enumerate()
        {
            store.tags.insert(id as u64 + 1, name.to_string());
        }

        store.users = vec![
            user(1, "test", "1234", "테스터", "010-1234-5678", 85, 120),
            user(2, "king", "king99", "킹", "010-2222-2222", 99, 40),
            user(3, "user1", "pass1", "유저원", "010-3333-3333", 50, 10),
            user(4, "quiet", "pass4", "조용한", "010-4444-4444", 30, 0),
        ];

        let posts = [
            post(101, 3, "첫 번째 과거의 선택", false, &[6], 12, 45, "2026-02-18T09:00:00"),
            post(102, 4, "익명 고민 상담", true, &[7], 5, 120, "2026-02-18T08:30:00"),
            post(201, 2, "이번 주 1등 글입니다!", false, &[8], 499, 9999, "2026-02-17T12:00:00"),
            post(104, 1, "시험 기간 멘탈 관리 팁", true, &[10], 12, 85, "2026-01-30T10:00:00"),
            post(103, 1, "팀플 무임승차 대처", true, &[9], 45, 150, "2026-01-29T21:30:00"),
        ];
        for mut p in posts {
            if p.id == 103 {
                p.situation = "졸업 작품 프로젝트 중 팀원 한 명이 연락이 두절되고 맡은 파트를 전혀 하지 않는 상황이었습니다.".to_string();
                p.action = "현재 진행 상황을 객관적으로 정리하여 공유하고 데드라인을 다시 지정했습니다.".to_string();
                p.retrospective = "명확한 규칙과 역할분담 설정이 초기에 얼마나 중요한지 깨달았습니다.".to_string();
                p.use_token = true;
            }
            store.posts.insert(p.id, p);
        }
        store.likes.insert((1, 201));

        store.notifications = vec![
            NotificationRecord {
                id: 1,
                date: "2026.02.20".to_string(),
                sender: "운영자".to_string(),
                content: "PastUs 서비스 점검 안내입니다.".to_string(),
            },
            NotificationRecord {
                id: 2,
                date: "2026.02.18".to_string(),
                sender: "운영자".to_string(),
                content: "신뢰도 정책이 변경되었습니다.".to_string(),
            },
        ];

        store
    }
}

fn user(
    id: u64,
    login_id: &str,
    password: &str,
    name: &str,
    phone: &str,
    trust_score: u8,
    token_balance: u64,
) -> UserRecord {
    UserRecord {
        id,
        login_id: login_id.to_string(),
        password: password.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        trust_score,
        token_balance,
        pro: false,
        profile_image_url: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn post(
    id: u64,
    author_id: u64,
    title: &str,
    is_anonymous: bool,
    tag_ids: &[u64],
    outside_likes: u64,
    view_count: u64,
    created_at: &str,
) -> PostRecord {
    PostRecord {
        id,
        author_id,
        title: title.to_string(),
        situation: format!("{title} - 상황"),
        action: format!("{title} - 행동"),
        retrospective: format!("{title} - 회고"),
        is_anonymous,
        use_token: false,
        tag_ids: tag_ids.to_vec(),
        view_count,
        outside_likes,
        created_at: created_at.to_string(),
        updated_at: None,
    }
}
