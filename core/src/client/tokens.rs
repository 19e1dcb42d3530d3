use super::{parse_json, PastusClient, OK};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{TokenAction, TokenReceipt, TokenRequest};

impl PastusClient {
    pub fn build_token_action(
        &self,
        action: TokenAction,
        input: &TokenRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, &format!("/tokens/{}", action.as_str()), input)
    }

    /// Insufficient balance comes back as a non-2xx with a `message`.
    pub fn parse_token_action(&self, response: HttpResponse) -> Result<TokenReceipt, ApiError> {
        parse_json(&response, OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduct_goes_to_its_own_path() {
        let req = PastusClient::new("http://localhost:8080")
            .build_token_action(
                TokenAction::Deduct,
                &TokenRequest {
                    amount: 10,
                    reason: "VIEW_POST".to_string(),
                    ref_id: Some(42),
                },
            )
            .unwrap();
        assert_eq!(req.path, "http://localhost:8080/tokens/deduct");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["refId"], 42);
    }

    #[test]
    fn insufficient_balance_message_surfaces() {
        let err = PastusClient::new("http://localhost:8080")
            .parse_token_action(HttpResponse::new(400, r#"{"message":"토큰이 부족합니다."}"#))
            .unwrap_err();
        assert_eq!(err.message(), "토큰이 부족합니다.");
    }
}
