use serde::{Deserialize, Serialize};

use super::TrustScore;

/// Summary shown on the main and profile tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboard {
    pub user_id: u64,
    pub user_name: String,
    pub trust_score: TrustScore,
    pub token_balance: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
}

/// A social login provider and whether it is linked to this account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedProvider {
    pub provider: String,
    pub linked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Account settings view (`GET /users/me/detail`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetail {
    pub user_id: u64,
    pub user_name: String,
    pub login_id: String,
    pub trust_score: TrustScore,
    pub token_balance: u64,
    #[serde(default)]
    pub subscription: SubscriptionTier,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub social_accounts: Vec<LinkedProvider>,
}

/// Partial profile change: login id, password or avatar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

impl AccountUpdate {
    pub fn is_empty(&self) -> bool {
        self.login_id.is_none()
            && self.current_password.is_none()
            && self.new_password.is_none()
            && self.profile_image_url.is_none()
    }
}
