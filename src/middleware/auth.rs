//! # 요청 신원(identity) 추출
//!
//! 모바일 앱은 로그인 토큰 대신 가족 생성/참여 때 받은 id를 헤더로 보냅니다:
//! - `X-Caregiver-Id`: 보호자 UUID
//! - `X-Family-Id`: 가족 UUID
//! - `X-Timezone`: IANA 시간대 이름 (없으면 `UTC`)
//!
//! 형식이 잘못된 UUID는 없는 것으로 취급합니다. 여기서는 id를 전달만 하고,
//! 실제 존재 여부는 각 핸들러가 DB에서 확인합니다.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

pub const CAREGIVER_ID_HEADER: &str = "x-caregiver-id";
pub const FAMILY_ID_HEADER: &str = "x-family-id";
pub const TIMEZONE_HEADER: &str = "x-timezone";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// 헤더에서 읽은 신원. 절대 거부하지 않는 extractor입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestIdentity {
    pub caregiver_id: Option<Uuid>,
    pub family_id: Option<Uuid>,
    pub timezone: String,
}

impl RequestIdentity {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let timezone = header_str(headers, TIMEZONE_HEADER)
            .map(str::trim)
            .filter(|tz| !tz.is_empty())
            .unwrap_or(DEFAULT_TIMEZONE)
            .to_string();

        Self {
            caregiver_id: header_uuid(headers, CAREGIVER_ID_HEADER),
            family_id: header_uuid(headers, FAMILY_ID_HEADER),
            timezone,
        }
    }

    /// 보호자와 가족 id가 모두 있어야 인증된 요청입니다.
    pub fn require(&self) -> Result<AuthCaregiver, AuthError> {
        match (self.caregiver_id, self.family_id) {
            (Some(caregiver_id), Some(family_id)) => Ok(AuthCaregiver {
                caregiver_id,
                family_id,
                timezone: self.timezone.clone(),
            }),
            _ => Err(AuthError::MissingIdentity),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestIdentity {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestIdentity::from_headers(&parts.headers))
    }
}

/// 인증된 보호자. 핸들러 인자에 두면 신원이 없는 요청은 401로 거부됩니다.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthCaregiver {
    pub caregiver_id: Uuid,
    pub family_id: Uuid,
    pub timezone: String,
}

impl<S: Send + Sync> FromRequestParts<S> for AuthCaregiver {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        RequestIdentity::from_headers(&parts.headers).require()
    }
}

#[derive(Debug, PartialEq)]
pub enum AuthError {
    MissingIdentity,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingIdentity => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "authentication required",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn header_uuid(headers: &HeaderMap, name: &str) -> Option<Uuid> {
    header_str(headers, name).and_then(|raw| Uuid::parse_str(raw.trim()).ok())
}
