use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::TrustScore;
use crate::validation::ValidationError;

/// UI policy: a post carries at most this many category tags.
pub const MAX_TAGS_PER_POST: usize = 3;

/// Shown instead of a login id for anonymous posts.
pub const ANONYMOUS_DISPLAY_NAME: &str = "익명";

/// Who wrote a post, as far as the reader is allowed to know.
///
/// Decoded from `{isAnonymous, loginId?, trustScore}`. An anonymous author
/// never keeps the login id, even if the server populated it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AuthorWire", into = "AuthorWire")]
pub enum Author {
    Named {
        login_id: String,
        trust_score: TrustScore,
    },
    Anonymous {
        trust_score: TrustScore,
    },
}

impl Author {
    pub fn display_name(&self) -> &str {
        match self {
            Author::Named { login_id, .. } => login_id,
            Author::Anonymous { .. } => ANONYMOUS_DISPLAY_NAME,
        }
    }

    pub fn trust_score(&self) -> TrustScore {
        match self {
            Author::Named { trust_score, .. } | Author::Anonymous { trust_score } => *trust_score,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Author::Anonymous { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorWire {
    #[serde(default)]
    is_anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    login_id: Option<String>,
    trust_score: TrustScore,
}

impl From<AuthorWire> for Author {
    fn from(wire: AuthorWire) -> Self {
        match wire.login_id {
            Some(login_id) if !wire.is_anonymous => Author::Named {
                login_id,
                trust_score: wire.trust_score,
            },
            _ => Author::Anonymous {
                trust_score: wire.trust_score,
            },
        }
    }
}

impl From<Author> for AuthorWire {
    fn from(author: Author) -> Self {
        match author {
            Author::Named {
                login_id,
                trust_score,
            } => AuthorWire {
                is_anonymous: false,
                login_id: Some(login_id),
                trust_score,
            },
            Author::Anonymous { trust_score } => AuthorWire {
                is_anonymous: true,
                login_id: None,
                trust_score,
            },
        }
    }
}

/// A post as shown in feeds, trending lists and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub post_id: u64,
    pub title: String,
    pub author: Author,
    #[serde(default)]
    pub tags: Vec<String>,
    pub like_count: u64,
    pub view_count: u64,
    pub created_at: NaiveDateTime,
}

/// Full post as returned by `GET /posts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub post_id: u64,
    pub title: String,
    pub situation: String,
    pub action: String,
    pub retrospective: String,
    pub author: Author,
    #[serde(default)]
    pub tags: Vec<String>,
    pub like_count: u64,
    pub view_count: u64,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_author: bool,
    #[serde(default)]
    pub use_token: bool,
}

/// Payload for creating (or fully replacing) a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
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

impl PostDraft {
    /// Every narrative field must be filled in and at most three tags chosen.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            &self.title,
            &self.situation,
            &self.action,
            &self.retrospective,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ValidationError::MissingFields);
        }
        check_tag_count(self.tag_ids.len())
    }
}

/// Partial update; only the fields present in the JSON are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrospective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_anonymous: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<u64>>,
}

impl PostUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let blanked = [
            &self.title,
            &self.situation,
            &self.action,
            &self.retrospective,
        ]
        .into_iter()
        .flatten()
        .any(|f| f.trim().is_empty());
        if blanked {
            return Err(ValidationError::MissingFields);
        }
        match &self.tag_ids {
            Some(ids) => check_tag_count(ids.len()),
            None => Ok(()),
        }
    }
}

fn check_tag_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_TAGS_PER_POST {
        return Err(ValidationError::TooManyTags { count });
    }
    Ok(())
}

/// Situational category such as "군대" or "취업".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

/// Result of `POST /posts/{id}/like`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub liked: bool,
    pub total_likes: u64,
}

/// Ordering used by search and archive listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Latest,
    Views,
    Likes,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Latest => "latest",
            SortOrder::Views => "views",
            SortOrder::Likes => "likes",
        }
    }
}

/// Parameters for `GET /posts/search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub tags: Vec<u64>,
    pub page: u32,
    pub size: u32,
    pub sort: SortOrder,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            tags: Vec::new(),
            page: 0,
            size: 20,
            sort: SortOrder::Latest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub items: Vec<PostSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PostDraft {
        PostDraft {
            title: "팀플 무임승차 대처".to_string(),
            situation: "팀원이 연락 두절".to_string(),
            action: "진행 상황 공유".to_string(),
            retrospective: "초기 역할분담이 중요".to_string(),
            is_anonymous: true,
            use_token: false,
            tag_ids: vec![1, 2],
        }
    }

    #[test]
    fn anonymous_author_drops_login_id() {
        let author: Author = serde_json::from_str(
            r#"{"isAnonymous":true,"loginId":"secret","trustScore":30}"#,
        )
        .unwrap();
        assert!(author.is_anonymous());
        assert_eq!(author.display_name(), ANONYMOUS_DISPLAY_NAME);
        let back = serde_json::to_value(&author).unwrap();
        assert!(back.get("loginId").is_none());
    }

    #[test]
    fn named_author_keeps_login_id() {
        let author: Author =
            serde_json::from_str(r#"{"isAnonymous":false,"loginId":"king","trustScore":99}"#)
                .unwrap();
        assert_eq!(author.display_name(), "king");
        assert_eq!(author.trust_score().get(), 99);
    }

    #[test]
    fn author_without_login_id_is_anonymous() {
        let author: Author = serde_json::from_str(r#"{"trustScore":50}"#).unwrap();
        assert!(author.is_anonymous());
    }

    #[test]
    fn summary_rejects_nested_stats_shape() {
        let raw = r#"{"postId":1,"title":"t","author":{"trustScore":1},
            "stats":{"likeCount":1,"viewCount":2},"createdAt":"2026-02-18T09:00:00"}"#;
        assert!(serde_json::from_str::<PostSummary>(raw).is_err());
    }

    #[test]
    fn draft_requires_every_narrative_field() {
        let mut d = draft();
        d.action = "   ".to_string();
        assert_eq!(d.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn draft_caps_tags_at_three() {
        let mut d = draft();
        d.tag_ids = vec![1, 2, 3, 4];
        assert_eq!(d.validate(), Err(ValidationError::TooManyTags { count: 4 }));
        d.tag_ids.pop();
        assert!(d.validate().is_ok());
    }

    #[test]
    fn update_skips_absent_fields() {
        let update = PostUpdate {
            title: Some("새 제목".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["title"], "새 제목");
        assert!(json.get("situation").is_none());
        assert!(update.validate().is_ok());
    }
}
