//! 요청 공통 처리 (신원 헤더 extractor)

pub mod auth;
