use super::{parse_envelope, PastusClient, OK};
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Notification;

impl PastusClient {
    pub fn build_list_notifications(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.url("/notifications"))
    }

    pub fn build_get_notification(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Get, self.url(&format!("/notifications/{id}")))
    }

    pub fn parse_list_notifications(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<Vec<Notification>>, ApiError> {
        parse_envelope(&response, OK)
    }

    pub fn parse_get_notification(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<Notification>, ApiError> {
        parse_envelope(&response, OK)
    }
}
