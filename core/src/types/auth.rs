use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login_id: String,
    pub password: String,
}

/// `data` of a successful `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: AccessToken,
    pub user: LoginUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub user_id: u64,
    pub user_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

/// Final registration payload sent by the second signup step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub login_id: String,
    pub password: String,
    pub confirm_password: String,
    pub user_name: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    pub gender: Gender,
    /// `010-1234-5678`
    pub phone_number: String,
    pub third_party_consent: bool,
    pub marketing_consent: bool,
}

/// Answer of the login-id and phone duplicate checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    #[serde(default)]
    pub message: String,
}

/// What a verification code is being requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationPurpose {
    Signup,
    FindId,
    FindPw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub phone_number: String,
    pub code: String,
    #[serde(rename = "type")]
    pub purpose: VerificationPurpose,
}

/// Password-recovery lookup: does this login id belong to this phone?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountLookup {
    pub login_id: String,
    pub phone_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_request_uses_type_key() {
        let req = VerifyCodeRequest {
            phone_number: "010-1234-5678".to_string(),
            code: "123456".to_string(),
            purpose: VerificationPurpose::FindPw,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "findpw");
        assert_eq!(json["phoneNumber"], "010-1234-5678");
    }

    #[test]
    fn login_response_reads_nested_token() {
        let raw = r#"{"token":{"accessToken":"mock-token-12345"},"user":{"userId":1,"userName":"테스터"}}"#;
        let resp: LoginResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.token.access_token, "mock-token-12345");
        assert_eq!(resp.user.user_id, 1);
    }
}
