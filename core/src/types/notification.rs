use serde::{Deserialize, Serialize};

/// Read-only notice from the operators; `date` is display text (`2026.02.20`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub date: String,
    pub sender: String,
    pub content: String,
}
