//! # 시간 파생 값 계산
//!
//! 시작/종료 시각 쌍에서 소요 시간(분)과 "진행 중" 여부를 계산하는 순수 함수들입니다.
//! 음성 해석 결과를 변환할 때(`decoder`)와 저장된 기록을 내보낼 때(`projection`)
//! 모두 이 모듈을 거치므로, 두 경로의 계산 결과가 항상 같습니다.
//!
//! 핵심 불변식: **종료 시각 없음 ⟺ 진행 중 ⟺ 소요 시간 없음**

use chrono::{DateTime, Datelike, Utc};

/// 파생 값 묶음
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Derived {
    /// 의미 있는 종료 시각. 시작 시각이 없으면 기준점이 없으므로 버립니다.
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub is_active: bool,
}

/// 초기화되지 않은 시각(유닉스 에포크 0, 또는 0001년)인지 확인합니다.
/// 이런 값은 "종료 시각 없음"과 똑같이 취급합니다.
pub fn is_unset(time: &DateTime<Utc>) -> bool {
    time.timestamp() == 0 || time.year() <= 1
}

/// 의미 있는 종료 시각만 남깁니다.
pub fn effective_end(end: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    end.filter(|t| !is_unset(t))
}

/// 종료 - 시작을 분 단위로 내림(floor)한 값. 종료 시각이 없으면 None.
pub fn duration_minutes(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Option<i32> {
    let end = effective_end(end)?;
    // 밀리초 기준 div_euclid: 음수 구간에서도 0 방향이 아닌 내림
    let minutes = (end - start).num_milliseconds().div_euclid(60_000);
    Some(minutes.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// 종료 시각이 없으면 진행 중
pub fn is_active(end: Option<DateTime<Utc>>) -> bool {
    effective_end(end).is_none()
}

/// 시작 시각을 모를 수도 있는 경우(음성 해석 결과)의 파생 값 계산.
///
/// 시작 시각이 없으면 종료 시각도 없는 것으로 봅니다. 그래야 세 값
/// (`end_time`, `duration_minutes`, `is_active`)이 항상 같은 답을 냅니다.
pub fn derive(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Derived {
    let end = start.and(effective_end(end));
    Derived {
        end_time: end,
        duration_minutes: start.and_then(|start| duration_minutes(start, end)),
        is_active: is_active(end),
    }
}
