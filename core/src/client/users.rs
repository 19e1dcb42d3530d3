use super::{parse_envelope, PastusClient, OK};
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AccountDetail, AccountUpdate, UserDashboard};
use crate::validation::{validate_login_id, ValidationError};

impl PastusClient {
    pub fn build_dashboard(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.url("/users/me/dashboard"))
    }

    pub fn build_account_detail(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.url("/users/me/detail"))
    }

    /// An empty update, or a new login id of the wrong length, is rejected
    /// before a request is built.
    pub fn build_update_account(&self, update: &AccountUpdate) -> Result<HttpRequest, ApiError> {
        if update.is_empty() {
            return Err(ValidationError::MissingFields.into());
        }
        if let Some(login_id) = &update.login_id {
            validate_login_id(login_id)?;
        }
        self.json_request(HttpMethod::Patch, "/users/me/detail", update)
    }

    pub fn parse_dashboard(&self, response: HttpResponse) -> Result<Envelope<UserDashboard>, ApiError> {
        parse_envelope(&response, OK)
    }

    pub fn parse_account_detail(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<AccountDetail>, ApiError> {
        parse_envelope(&response, OK)
    }

    pub fn parse_update_account(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<AccountDetail>, ApiError> {
        parse_envelope(&response, OK)
    }
}
