//! Client-side checks that run before any request is built.
//!
//! The signup flow is split in two forms matching the two wizard steps.
//! Both validate to a `ValidationError`; a failed check never reaches the
//! network layer.

use thiserror::Error;

use crate::format::{digits_only, hyphenate_phone};
use crate::types::{Gender, SignupRequest};

/// Minimum age for registration, in years.
pub const MINIMUM_AGE: i32 = 14;

pub const LOGIN_ID_MIN_LEN: usize = 4;
pub const LOGIN_ID_MAX_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("필수 항목을 모두 입력해주세요.")]
    MissingFields,

    #[error("만 14세 미만은 가입할 수 없습니다.")]
    Underage,

    #[error("필수 약관에 동의해주세요.")]
    MissingConsent,

    #[error("아이디는 4~10자 사이여야 합니다.")]
    LoginIdLength,

    #[error("비밀번호가 일치하지 않습니다.")]
    PasswordMismatch,

    #[error("태그는 최대 3개까지 선택할 수 있습니다. ({count}개 선택됨)")]
    TooManyTags { count: usize },

    #[error("검색어를 입력해주세요.")]
    EmptyQuery,
}

/// Year-difference age check on a `YYYYMMDD` birth string.
///
/// Strings that are not eight digits are not considered underage; the
/// completeness check rejects them first.
pub fn is_under_14(birth: &str, current_year: i32) -> bool {
    if birth.len() != 8 || !birth.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match birth[..4].parse::<i32>() {
        Ok(year) => current_year - year < MINIMUM_AGE,
        Err(_) => false,
    }
}

/// Consent checkboxes on the first signup step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Consents {
    pub terms_of_service: bool,
    pub privacy_policy: bool,
    pub third_party: bool,
    pub age_confirmation: bool,
    pub marketing: bool,
}

impl Consents {
    pub fn all() -> Self {
        Self {
            terms_of_service: true,
            privacy_policy: true,
            third_party: true,
            age_confirmation: true,
            marketing: true,
        }
    }

    pub fn required_given(&self) -> bool {
        self.terms_of_service && self.privacy_policy && self.age_confirmation
    }
}

/// Identity, contact and consent entered on step 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityForm {
    pub name: String,
    /// `YYYYMMDD`
    pub birth: String,
    pub gender: Gender,
    /// Digits, optionally space separated as typed (`010 1234 5678`).
    pub phone: String,
    /// Six-digit verification code, optionally spaced.
    pub auth_code: String,
    pub consents: Consents,
}

impl IdentityForm {
    pub fn raw_phone(&self) -> String {
        digits_only(&self.phone)
    }

    /// Completeness first, then consent, then age.
    pub fn validate(&self, current_year: i32) -> Result<(), ValidationError> {
        let complete = !self.name.trim().is_empty()
            && is_birth_date(&self.birth)
            && self.raw_phone().len() == 11
            && digits_only(&self.auth_code).len() == 6;
        if !complete {
            return Err(ValidationError::MissingFields);
        }
        if !self.consents.required_given() {
            return Err(ValidationError::MissingConsent);
        }
        if is_under_14(&self.birth, current_year) {
            return Err(ValidationError::Underage);
        }
        Ok(())
    }
}

/// Login id and password entered on step 2.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialsForm {
    pub login_id: String,
    pub password: String,
    pub password_confirm: String,
}

impl CredentialsForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_login_id(&self.login_id)?;
        if self.password.is_empty() || self.password_confirm.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if self.password != self.password_confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Exactly eight ASCII digits (`YYYYMMDD`).
fn is_birth_date(birth: &str) -> bool {
    birth.len() == 8 && birth.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_login_id(login_id: &str) -> Result<(), ValidationError> {
    let len = login_id.chars().count();
    if !(LOGIN_ID_MIN_LEN..=LOGIN_ID_MAX_LEN).contains(&len) {
        return Err(ValidationError::LoginIdLength);
    }
    Ok(())
}

impl SignupRequest {
    /// Combine both steps into the wire payload. Callers validate first.
    pub fn from_forms(identity: &IdentityForm, credentials: &CredentialsForm) -> Self {
        let birth = &identity.birth;
        let birth_date = if is_birth_date(birth) {
            format!("{}-{}-{}", &birth[..4], &birth[4..6], &birth[6..])
        } else {
            birth.clone()
        };
        Self {
            login_id: credentials.login_id.clone(),
            password: credentials.password.clone(),
            confirm_password: credentials.password_confirm.clone(),
            user_name: identity.name.trim().to_string(),
            birth_date,
            gender: identity.gender,
            phone_number: hyphenate_phone(&identity.phone),
            third_party_consent: identity.consents.third_party,
            marketing_consent: identity.consents.marketing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> IdentityForm {
        IdentityForm {
            name: "홍길동".to_string(),
            birth: "19990101".to_string(),
            gender: Gender::Male,
            phone: "010 1234 5678".to_string(),
            auth_code: "1 2 3 4 5 6".to_string(),
            consents: Consents {
                terms_of_service: true,
                privacy_policy: true,
                third_party: false,
                age_confirmation: true,
                marketing: true,
            },
        }
    }

    #[test]
    fn under_14_uses_year_difference() {
        assert!(is_under_14("20130101", 2026));
        assert!(!is_under_14("20120101", 2026));
        assert!(!is_under_14("2012", 2026));
        assert!(!is_under_14("2012ab01", 2026));
    }

    #[test]
    fn complete_identity_passes() {
        assert!(identity().validate(2026).is_ok());
    }

    #[test]
    fn each_required_consent_blocks() {
        let clears: [fn(&mut Consents); 3] = [
            |c| c.terms_of_service = false,
            |c| c.privacy_policy = false,
            |c| c.age_confirmation = false,
        ];
        for clear in clears {
            let mut form = identity();
            clear(&mut form.consents);
            assert_eq!(form.validate(2026), Err(ValidationError::MissingConsent));
        }
    }

    #[test]
    fn optional_consents_do_not_block() {
        let mut form = identity();
        form.consents.third_party = false;
        form.consents.marketing = false;
        assert!(form.validate(2026).is_ok());
    }

    #[test]
    fn non_numeric_birth_is_incomplete() {
        for birth in ["abcdefgh", "2012가a", "1999-1-1"] {
            let mut form = identity();
            form.birth = birth.to_string();
            assert_eq!(form.validate(2026), Err(ValidationError::MissingFields), "{birth}");
        }
    }

    #[test]
    fn multibyte_birth_is_passed_through_unsliced() {
        let mut form = identity();
        form.birth = "2012가a".to_string();
        let credentials = CredentialsForm {
            login_id: "tester".to_string(),
            password: "pw".to_string(),
            password_confirm: "pw".to_string(),
        };
        let request = SignupRequest::from_forms(&form, &credentials);
        assert_eq!(request.birth_date, "2012가a");
    }

    #[test]
    fn underage_is_rejected_after_completeness() {
        let mut form = identity();
        form.birth = "20150505".to_string();
        assert_eq!(form.validate(2026), Err(ValidationError::Underage));
        form.auth_code = "123".to_string();
        assert_eq!(form.validate(2026), Err(ValidationError::MissingFields));
    }

    #[test]
    fn credentials_check_length_and_match() {
        let mut form = CredentialsForm {
            login_id: "abc".to_string(),
            password: "pw".to_string(),
            password_confirm: "pw".to_string(),
        };
        assert_eq!(form.validate(), Err(ValidationError::LoginIdLength));
        form.login_id = "hong1999".to_string();
        assert!(form.validate().is_ok());
        form.password_confirm = "other".to_string();
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
    }

    #[test]
    fn signup_request_formats_birth_and_phone() {
        let creds = CredentialsForm {
            login_id: "hong1999".to_string(),
            password: "secret".to_string(),
            password_confirm: "secret".to_string(),
        };
        let req = SignupRequest::from_forms(&identity(), &creds);
        assert_eq!(req.birth_date, "1999-01-01");
        assert_eq!(req.phone_number, "010-1234-5678");
        assert!(!req.third_party_consent);
        assert!(req.marketing_consent);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["gender"], "M");
        assert_eq!(json["confirmPassword"], "secret");
    }
}
