use super::{check_status, decode, error_message, parse_ack, parse_envelope, PastusClient, CREATED, OK};
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AccountLookup, Availability, LoginRequest, LoginResponse, SignupRequest, VerifyCodeRequest,
};

pub const LOGIN_ID_TAKEN_MESSAGE: &str = "이미 사용 중인 아이디입니다.";
pub const PHONE_TAKEN_MESSAGE: &str = "이미 등록된 번호입니다.";

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginIdCheck<'a> {
    login_id: &'a str,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PhoneCheck<'a> {
    phone_number: &'a str,
}

impl PastusClient {
    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/login", input)
    }

    pub fn build_signup(&self, input: &SignupRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/signup", input)
    }

    pub fn build_check_login_id(&self, login_id: &str) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/check-id", &LoginIdCheck { login_id })
    }

    pub fn build_check_phone(&self, phone_number: &str) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/check-phone", &PhoneCheck { phone_number })
    }

    pub fn build_find_account(&self, input: &AccountLookup) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/find-account", input)
    }

    pub fn build_verify_code(&self, input: &VerifyCodeRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/verify", input)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<Envelope<LoginResponse>, ApiError> {
        let envelope: Envelope<LoginResponse> = parse_envelope(&response, OK)?;
        if envelope.data.token.access_token.is_empty() {
            return Err(ApiError::Deserialization("empty access token".to_string()));
        }
        Ok(envelope)
    }

    pub fn parse_signup(&self, response: HttpResponse) -> Result<Envelope<()>, ApiError> {
        parse_ack(&response, CREATED)
    }

    /// A 400 answer means "taken", not failure.
    pub fn parse_check_login_id(&self, response: HttpResponse) -> Result<Availability, ApiError> {
        parse_availability(&response, LOGIN_ID_TAKEN_MESSAGE)
    }

    pub fn parse_check_phone(&self, response: HttpResponse) -> Result<Availability, ApiError> {
        parse_availability(&response, PHONE_TAKEN_MESSAGE)
    }

    pub fn parse_find_account(&self, response: HttpResponse) -> Result<Envelope<()>, ApiError> {
        parse_ack(&response, OK)
    }

    pub fn parse_verify_code(&self, response: HttpResponse) -> Result<Envelope<()>, ApiError> {
        parse_ack(&response, OK)
    }
}

fn parse_availability(response: &HttpResponse, taken: &str) -> Result<Availability, ApiError> {
    if response.status == 400 {
        return Ok(Availability {
            available: false,
            message: error_message(&response.body).unwrap_or_else(|| taken.to_string()),
        });
    }
    check_status(response, OK)?;
    decode(&response.body)
}
