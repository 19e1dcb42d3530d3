use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::state::{Db, UserRecord};
use crate::{ack, envelope, Failure, Reply};

/// Verification code every phone number accepts.
pub const VALID_CODE: &str = "123456";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub login_id: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    pub login_id: String,
    pub password: String,
    pub confirm_password: String,
    pub user_name: String,
    pub birth_date: String,
    pub gender: String,
    pub phone_number: String,
    #[serde(default)]
    pub third_party_consent: bool,
    #[serde(default)]
    pub marketing_consent: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginIdInput {
    pub login_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneInput {
    pub phone_number: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupInput {
    pub login_id: String,
    pub phone_number: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyInput {
    pub phone_number: String,
    pub code: String,
    #[serde(rename = "type")]
    pub purpose: String,
}

pub async fn login(State(db): State<Db>, Json(input): Json<LoginInput>) -> Reply {
    let mut store = db.write().await;
    let user = store
        .users
        .iter()
        .find(|u| u.login_id == input.login_id && u.password == input.password)
        .map(|u| (u.id, u.name.clone()))
        .ok_or_else(|| {
            Failure::new(
                StatusCode::UNAUTHORIZED,
                "아이디/비밀번호가 다릅니다. 다시 확인해주세요",
            )
        })?;
    let token = Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), user.0);
    tracing::debug!(user_id = user.0, "session issued");
    Ok(envelope(
        StatusCode::OK,
        "로그인 성공",
        json!({
            "token": { "accessToken": token },
            "user": { "userId": user.0, "userName": user.1 },
        }),
    ))
}

pub async fn signup(State(db): State<Db>, Json(input): Json<SignupInput>) -> Reply {
    let mut store = db.write().await;
    if store.login_id_taken(&input.login_id) {
        return Err(Failure::new(StatusCode::CONFLICT, "이미 사용 중인 아이디입니다."));
    }
    if input.password != input.confirm_password {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "비밀번호가 일치하지 않습니다."));
    }
    if (input.gender != "M" && input.gender != "F") || input.birth_date.len() != 10 {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "입력 정보를 다시 확인해주세요."));
    }
    let id = store.next_user_id;
    store.next_user_id += 1;
    store.users.push(UserRecord {
        id,
        login_id: input.login_id,
        password: input.password,
        name: input.user_name,
        phone: input.phone_number,
        trust_score: 50,
        token_balance: 0,
        pro: false,
        profile_image_url: None,
    });
    tracing::debug!(
        user_id = id,
        third_party = input.third_party_consent,
        marketing = input.marketing_consent,
        "account created"
    );
    Ok(ack(StatusCode::CREATED, "회원가입이 완료되었습니다."))
}

pub async fn check_login_id(State(db): State<Db>, Json(input): Json<LoginIdInput>) -> Reply {
    let store = db.read().await;
    if store.login_id_taken(&input.login_id) {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "이미 사용 중인 아이디입니다."));
    }
    Ok((
        StatusCode::OK,
        Json(json!({ "available": true, "message": "사용 가능한 아이디입니다." })),
    ))
}

pub async fn check_phone(State(db): State<Db>, Json(input): Json<PhoneInput>) -> Reply {
    let store = db.read().await;
    if store.users.iter().any(|u| u.phone == input.phone_number) {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "이미 등록된 번호입니다."));
    }
    Ok((
        StatusCode::OK,
        Json(json!({ "available": true, "message": "인증번호가 발송되었습니다." })),
    ))
}

pub async fn find_account(State(db): State<Db>, Json(input): Json<LookupInput>) -> Reply {
    let store = db.read().await;
    let found = store
        .users
        .iter()
        .any(|u| u.login_id == input.login_id && u.phone == input.phone_number);
    if !found {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "일치하는 정보가 없습니다."));
    }
    Ok(ack(StatusCode::OK, "계정이 확인되었습니다."))
}

pub async fn verify_code(Json(input): Json<VerifyInput>) -> Reply {
    if !matches!(input.purpose.as_str(), "signup" | "findid" | "findpw") {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "잘못된 인증 유형입니다."));
    }
    if input.code != VALID_CODE {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "인증번호가 올바르지 않습니다."));
    }
    tracing::debug!(phone = %input.phone_number, "code verified");
    Ok(ack(StatusCode::OK, "인증되었습니다."))
}
