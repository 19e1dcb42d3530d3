//! Wire schemas for the PastUs API.
//!
//! # Design
//! One explicit schema per endpoint, camelCase on the wire. Fixture and HTTP
//! responses are both decoded through these types, so a screen never has to
//! branch on which shape it received. These DTOs are defined independently of
//! the mock-server crate; the integration tests catch drift between the two.

mod archive;
mod auth;
mod notification;
mod post;
mod token;
mod user;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use archive::{ArchiveFilter, ArchivePost};
pub use auth::{
    AccessToken, AccountLookup, Availability, Gender, LoginRequest, LoginResponse, LoginUser,
    SignupRequest, VerificationPurpose, VerifyCodeRequest,
};
pub use notification::Notification;
pub use post::{
    Author, LikeState, PostDetail, PostDraft, PostSummary, PostUpdate, SearchQuery,
    SearchResults, SortOrder, Tag, ANONYMOUS_DISPLAY_NAME, MAX_TAGS_PER_POST,
};
pub use token::{TokenAction, TokenReceipt, TokenRequest};
pub use user::{AccountDetail, AccountUpdate, LinkedProvider, SubscriptionTier, UserDashboard};

/// Platform confidence metric, always within 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct TrustScore(u8);

impl TrustScore {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for TrustScore {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(TrustScore::new)
            .ok_or_else(|| format!("trust score {value} outside 0..=100"))
    }
}

impl From<TrustScore> for u8 {
    fn from(score: TrustScore) -> Self {
        score.0
    }
}

impl fmt::Display for TrustScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Paginated list as returned by `/posts` and `/users/me/posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub has_next: bool,
    pub total_elements: u64,
}
