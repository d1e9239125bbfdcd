//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `families`: 가족 생성(첫 보호자 포함), 조회, 이름 확인
//! - `caregivers`: 보호자 추가, 조회, 탈퇴
//! - `care_sessions`: 돌봄 세션 시작, 완료, 최근 목록
//! - `activities`: 활동 + 세부 정보 저장/조회, 수면 종료
//!
//! 모든 함수는 `&SqlitePool`을 받고 `Result<_, AppError>`를 반환합니다.
//! "없음"은 에러가 아니라 `Option::None` 또는 `false`로 표현합니다.

pub mod activities;
pub mod care_sessions;
pub mod caregivers;
pub mod families;

pub use activities::*;
pub use care_sessions::*;
pub use caregivers::*;
pub use families::*;

#[cfg(test)]
pub use test_support::*;
