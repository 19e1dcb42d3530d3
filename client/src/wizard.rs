//! Two-step signup flow.
//!
//! Step one collects identity, phone verification and consents; step two
//! collects credentials. Every check that can run locally runs before the
//! backend is contacted, and a rejected submit leaves the wizard untouched.

use std::sync::Arc;

use chrono::Datelike;
use pastus_core::format::{digits_only, hyphenate_phone};
use pastus_core::types::{Availability, SignupRequest, VerificationPurpose, VerifyCodeRequest};
use pastus_core::validation::{validate_login_id, CredentialsForm, IdentityForm};
use pastus_core::{Envelope, ValidationError};
use tracing::{debug, info};

use crate::source::{ApiResult, AuthSource};

/// The calendar year used for the age check.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupStep {
    Identity,
    Credentials,
    Complete,
}

pub struct SignupWizard {
    auth: Arc<dyn AuthSource>,
    step: SignupStep,
    identity: Option<IdentityForm>,
}

impl SignupWizard {
    pub fn new(auth: Arc<dyn AuthSource>) -> Self {
        Self {
            auth,
            step: SignupStep::Identity,
            identity: None,
        }
    }

    pub fn step(&self) -> SignupStep {
        self.step
    }

    pub fn identity(&self) -> Option<&IdentityForm> {
        self.identity.as_ref()
    }

    /// Duplicate check for the typed phone number.
    pub async fn check_phone(&self, phone: &str) -> ApiResult<Availability> {
        self.auth.check_phone(&hyphenate_phone(phone)).await
    }

    pub async fn verify_code(&self, phone: &str, code: &str) -> ApiResult<Envelope<()>> {
        let request = VerifyCodeRequest {
            phone_number: hyphenate_phone(phone),
            code: digits_only(code),
            purpose: VerificationPurpose::Signup,
        };
        self.auth.verify_code(&request).await
    }

    /// Validate step one and advance. Nothing changes on failure.
    pub fn submit_identity(
        &mut self,
        form: IdentityForm,
        current_year: i32,
    ) -> Result<(), ValidationError> {
        form.validate(current_year)?;
        self.identity = Some(form);
        self.step = SignupStep::Credentials;
        Ok(())
    }

    /// Back to step one, keeping what was entered.
    pub fn back(&mut self) {
        if self.step == SignupStep::Credentials {
            self.step = SignupStep::Identity;
        }
    }

    /// Live availability check for the login id field.
    ///
    /// Ids outside 4..=10 characters are not sent; `None` means "not checked".
    pub async fn check_login_id(&self, login_id: &str) -> ApiResult<Option<Availability>> {
        if validate_login_id(login_id).is_err() {
            debug!(len = login_id.chars().count(), "login id not checked");
            return Ok(None);
        }
        self.auth.check_login_id(login_id).await.map(Some)
    }

    /// Validate both steps and register.
    pub async fn submit(
        &mut self,
        credentials: &CredentialsForm,
        current_year: i32,
    ) -> ApiResult<Envelope<()>> {
        let identity = match (&self.identity, self.step) {
            (Some(identity), SignupStep::Credentials) => identity,
            _ => return Err(ValidationError::MissingFields.into()),
        };
        credentials.validate()?;
        identity.validate(current_year)?;

        let request = SignupRequest::from_forms(identity, credentials);
        let envelope = self.auth.signup(&request).await?;
        info!(login_id = %request.login_id, "signup complete");
        self.step = SignupStep::Complete;
        Ok(envelope)
    }
}
