//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체들을 정의합니다.
//! - `family`: 가족(Family)과 보호자(Caregiver)
//! - `care_session`: 돌봄 세션
//! - `activity`: 활동 봉투와 종류별 세부 정보 (도메인 + 저장용 입력 형태)
//! - `view`: 클라이언트로 내보내는 API 형태
//!
//! `pub use X::*;`로 재공개하여 `crate::models::CareSession`처럼 짧게 씁니다.

pub mod activity;
pub mod care_session;
pub mod family;
pub mod view;

pub use activity::*;
pub use care_session::*;
pub use family::*;
pub use view::*;
