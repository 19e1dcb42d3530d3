use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::TrustScore;

/// Which side of the archive to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArchiveFilter {
    /// Posts written by the signed-in user.
    #[default]
    MyPost,
    /// Other people's posts the user liked.
    Liked,
}

impl ArchiveFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveFilter::MyPost => "MY_POST",
            ArchiveFilter::Liked => "LIKED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivePost {
    pub post_id: u64,
    pub title: String,
    pub user_name: String,
    pub trust_score: TrustScore,
    pub view_count: u64,
    pub like_count: u64,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub hashtags: Vec<String>,
}
