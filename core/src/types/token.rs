use serde::{Deserialize, Serialize};

/// Direction of a token balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenAction {
    Earn,
    Deduct,
}

impl TokenAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenAction::Earn => "earn",
            TokenAction::Deduct => "deduct",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub amount: u64,
    pub reason: String,
    #[serde(default)]
    pub ref_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReceipt {
    pub success: bool,
    pub remaining_tokens: u64,
}
