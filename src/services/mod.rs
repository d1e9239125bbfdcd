//! # 서비스 계층
//!
//! DB나 HTTP에 묶이지 않은 도메인 로직과 외부 서비스 클라이언트입니다.
//!
//! 활동 해석 파이프라인:
//! - `temporal`: 시작/종료 시각에서 소요 시간과 진행 중 여부 계산
//! - `dispatch`: 타입 태그 → 세부 정보 variant 매핑
//! - `decoder`: 느슨한 JSON → 강타입 활동
//! - `projection`: 저장된 레코드 → API view
//!
//! 그 밖에:
//! - `recording`: 저장 전 입력 검증
//! - `summary`, `prediction`: 세션 요약과 다음 수유 예측
//! - `password`: 가족 비밀번호 해시
//! - `whisper`, `claude`, `voice`: 음성 입력 해석

pub mod claude;
pub mod decoder;
pub mod dispatch;
pub mod password;
pub mod prediction;
pub mod projection;
pub mod recording;
pub mod summary;
pub mod temporal;
pub mod voice;
pub mod whisper;
