//! # 음성 해석 결과 디코더
//!
//! 외부 문장 해석 단계가 돌려준 느슨한 JSON 레코드 배열을 강타입 활동으로 변환합니다.
//!
//! ## 규칙
//! 1. `activity_type`이 없거나 문자열이 아니면 `"Missing activity_type"` 에러를
//!    모으고 그 레코드만 건너뜁니다. 배치 전체는 계속 진행합니다.
//! 2. 태그에 맞는 중첩 레코드(`feed_details` 등)만 읽습니다.
//! 3. 필드는 기대하는 종류(RFC 3339 문자열, 숫자, 불리언)로만 읽고,
//!    없거나 종류가 다르거나 파싱할 수 없으면 조용히 "없음"으로 처리합니다.
//! 4. 숫자는 반올림하지 않고 버림(truncate)으로 정수화합니다.
//! 5. 수유/수면은 `temporal`로 파생 값을 계산합니다 (화면 표시용 형태).
//!
//! 출력 형태는 두 가지입니다:
//! - [`decode_activity_inputs`]: 저장용 (`had_pee`는 `Option<bool>`)
//! - [`decode_parsed_activities`]: 화면 표시용 (불리언 기본값 false, 파생 값 포함)

use crate::models::*;
use crate::services::temporal;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub const MISSING_ACTIVITY_TYPE: &str = "Missing activity_type";

/// 디코딩 결과 — 성공한 레코드(입력 순서 유지)와 에러 메시지(발생 순서)
///
/// 두 목록은 위치로 대응하지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    pub errors: Vec<String>,
}

impl<T> Decoded<T> {
    fn map<U>(self, f: impl FnMut(T) -> U) -> Decoded<U> {
        Decoded {
            records: self.records.into_iter().map(f).collect(),
            errors: self.errors,
        }
    }
}

/// 저장용 입력 형태로 디코딩합니다.
pub fn decode_activity_inputs(records: &[Value]) -> Decoded<ActivityInput> {
    let mut decoded = Decoded {
        records: Vec::with_capacity(records.len()),
        errors: Vec::new(),
    };

    for (index, record) in records.iter().enumerate() {
        // 태그가 없는 것만 레코드 단위 에러입니다.
        let Some(tag) = record.get("activity_type").and_then(Value::as_str) else {
            tracing::warn!(index, "extracted activity has no activity_type, skipping");
            decoded.errors.push(MISSING_ACTIVITY_TYPE.to_string());
            continue;
        };

        let activity = ActivityInput::dispatch(
            tag,
            || details_of(record, ActivityType::Feed).map(read_feed),
            || details_of(record, ActivityType::Diaper).map(read_diaper),
            || details_of(record, ActivityType::Sleep).map(read_sleep),
        );
        if activity.activity_type().is_none() {
            tracing::debug!(index, tag, "unrecognized activity type kept without details");
        }
        decoded.records.push(activity);
    }

    decoded
}

/// 화면 표시용 형태로 디코딩합니다. 필드 해석은 저장용과 동일합니다.
pub fn decode_parsed_activities(records: &[Value]) -> Decoded<ParsedActivity> {
    decode_activity_inputs(records).map(|input| input.map(feed_view, diaper_view, sleep_view))
}

fn details_of(record: &Value, kind: ActivityType) -> Option<&Map<String, Value>> {
    record.get(kind.details_key()).and_then(Value::as_object)
}

// ── 필드 읽기 도우미 ──
// 모두 "없음"을 돌려줄 뿐 에러를 내지 않습니다.

fn time_field(details: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    // chrono는 날짜와 시각 사이의 공백도 받아들입니다.
    let raw = details.get(key)?.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn int_field(details: &Map<String, Value>, key: &str) -> Option<i32> {
    let number = details.get(key)?.as_f64()?;
    // `as`는 0 방향 버림 + 범위 밖은 포화(saturating)
    Some(number.trunc() as i32)
}

fn bool_field(details: &Map<String, Value>, key: &str) -> Option<bool> {
    details.get(key)?.as_bool()
}

fn read_feed(details: &Map<String, Value>) -> FeedDetailsInput {
    FeedDetailsInput {
        start_time: time_field(details, "start_time"),
        end_time: time_field(details, "end_time"),
        amount_ml: int_field(details, "amount_ml"),
        feed_type: details
            .get("feed_type")
            .and_then(Value::as_str)
            .and_then(FeedType::from_tag),
    }
}

fn read_diaper(details: &Map<String, Value>) -> DiaperDetailsInput {
    DiaperDetailsInput {
        changed_at: time_field(details, "changed_at"),
        had_poop: bool_field(details, "had_poop").unwrap_or(false),
        had_pee: bool_field(details, "had_pee"),
    }
}

fn read_sleep(details: &Map<String, Value>) -> SleepDetailsInput {
    SleepDetailsInput {
        start_time: time_field(details, "start_time"),
        end_time: time_field(details, "end_time"),
    }
}

// ── 입력 형태 → 표시 형태 ──

fn feed_view(input: FeedDetailsInput) -> FeedDetailsView {
    let derived = temporal::derive(input.start_time, input.end_time);
    FeedDetailsView {
        start_time: input.start_time,
        end_time: derived.end_time,
        amount_ml: input.amount_ml,
        feed_type: input.feed_type,
        duration_minutes: derived.duration_minutes,
    }
}

fn diaper_view(input: DiaperDetailsInput) -> DiaperDetailsView {
    DiaperDetailsView {
        changed_at: input.changed_at,
        had_poop: input.had_poop,
        had_pee: input.had_pee.unwrap_or(false),
    }
}

fn sleep_view(input: SleepDetailsInput) -> SleepDetailsView {
    let derived = temporal::derive(input.start_time, input.end_time);
    SleepDetailsView {
        start_time: input.start_time,
        end_time: derived.end_time,
        duration_minutes: derived.duration_minutes,
        is_active: derived.is_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dispatch::ActivityRecord;
    use chrono::TimeZone;
    use serde_json::json;

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    #[test]
    fn decodes_feed_for_display() {
        let records = vec![json!({
            "activity_type": "FEED",
            "feed_details": {
                "start_time": "2024-01-01T10:00:00Z",
                "end_time": "2024-01-01T10:30:00Z",
                "amount_ml": 120.0,
                "feed_type": "BREAST_MILK"
            }
        })];

        let decoded = decode_parsed_activities(&records);
        assert!(decoded.errors.is_empty());
        assert_eq!(
            decoded.records,
            vec![ActivityRecord::Feed(Some(FeedDetailsView {
                start_time: Some(utc(10, 0)),
                end_time: Some(utc(10, 30)),
                amount_ml: Some(120),
                feed_type: Some(FeedType::BreastMilk),
                duration_minutes: Some(30),
            }))]
        );
    }

    #[test]
    fn decodes_diaper_for_display() {
        let records = vec![json!({
            "activity_type": "DIAPER",
            "diaper_details": { "changed_at": "2024-01-01T12:00:00Z", "had_poop": true, "had_pee": false }
        })];

        let decoded = decode_parsed_activities(&records);
        assert_eq!(
            decoded.records,
            vec![ActivityRecord::Diaper(Some(DiaperDetailsView {
                changed_at: Some(utc(12, 0)),
                had_poop: true,
                had_pee: false,
            }))]
        );
    }

    #[test]
    fn completed_sleep_has_duration_and_is_not_active() {
        let records = vec![json!({
            "activity_type": "SLEEP",
            "sleep_details": { "start_time": "2024-01-01T14:00:00Z", "end_time": "2024-01-01T15:30:00Z" }
        })];

        let decoded = decode_parsed_activities(&records);
        let ActivityRecord::Sleep(Some(sleep)) = &decoded.records[0] else {
            panic!("expected sleep details, got {:?}", decoded.records[0]);
        };
        assert_eq!(sleep.duration_minutes, Some(90));
        assert!(!sleep.is_active);
    }

    #[test]
    fn open_sleep_is_active_without_duration() {
        let records = vec![json!({
            "activity_type": "SLEEP",
            "sleep_details": { "start_time": "2024-01-01T14:00:00Z" }
        })];

        let decoded = decode_parsed_activities(&records);
        let ActivityRecord::Sleep(Some(sleep)) = &decoded.records[0] else {
            panic!("expected sleep details");
        };
        assert!(sleep.is_active);
        assert_eq!(sleep.duration_minutes, None);
        assert_eq!(sleep.end_time, None);
    }

    #[test]
    fn sleep_without_a_usable_start_stays_consistent() {
        let records = vec![json!({
            "activity_type": "SLEEP",
            "sleep_details": { "start_time": "not a time", "end_time": "2024-01-01T15:30:00Z" }
        })];

        let decoded = decode_parsed_activities(&records);
        let ActivityRecord::Sleep(Some(sleep)) = &decoded.records[0] else {
            panic!("expected sleep details");
        };
        assert_eq!(sleep.is_active, sleep.duration_minutes.is_none());
        assert_eq!(sleep.is_active, sleep.end_time.is_none());
        assert!(sleep.is_active);
    }

    #[test]
    fn missing_activity_type_is_the_only_record_error() {
        let records = vec![json!({
            "feed_details": { "start_time": "2024-01-01T10:00:00Z" }
        })];

        let decoded = decode_parsed_activities(&records);
        assert!(decoded.records.is_empty());
        assert_eq!(decoded.errors, vec![MISSING_ACTIVITY_TYPE.to_string()]);

        let decoded = decode_activity_inputs(&[json!({ "not_the_type": "FEED" })]);
        assert!(decoded.records.is_empty());
        assert_eq!(decoded.errors.len(), 1);
    }

    #[test]
    fn non_string_tag_counts_as_missing() {
        let decoded = decode_activity_inputs(&[json!({ "activity_type": 3 }), json!("FEED")]);
        assert!(decoded.records.is_empty());
        assert_eq!(decoded.errors.len(), 2);
    }

    #[test]
    fn batch_keeps_valid_records_in_order() {
        let records = vec![
            json!({ "activity_type": "FEED", "feed_details": { "start_time": "2024-01-01T10:00:00Z" } }),
            json!({ "sleep_details": {} }),
            json!({ "activity_type": "DIAPER", "diaper_details": { "had_pee": true } }),
            json!({}),
            json!({ "activity_type": "SLEEP" }),
        ];

        let decoded = decode_activity_inputs(&records);
        let tags: Vec<_> = decoded.records.iter().map(|r| r.tag().to_string()).collect();
        assert_eq!(tags, vec!["FEED", "DIAPER", "SLEEP"]);
        assert_eq!(decoded.errors.len(), 2);
        // 태그는 있지만 중첩 레코드가 없는 경우
        assert_eq!(decoded.records[2], ActivityRecord::Sleep(None));
    }

    #[test]
    fn empty_input_decodes_to_nothing() {
        let decoded = decode_parsed_activities(&[]);
        assert!(decoded.records.is_empty());
        assert!(decoded.errors.is_empty());
    }

    #[test]
    fn unknown_tag_is_not_an_error() {
        let records = vec![json!({
            "activity_type": "BATH",
            "feed_details": { "start_time": "2024-01-01T10:00:00Z" }
        })];

        let decoded = decode_parsed_activities(&records);
        assert!(decoded.errors.is_empty());
        assert_eq!(decoded.records, vec![ActivityRecord::Unrecognized("BATH".to_string())]);
    }

    #[test]
    fn details_for_other_types_are_ignored() {
        let records = vec![json!({
            "activity_type": "FEED",
            "feed_details": { "start_time": "2024-01-01T10:00:00Z" },
            "sleep_details": { "start_time": "2024-01-01T11:00:00Z" }
        })];

        let decoded = decode_activity_inputs(&records);
        assert_eq!(
            decoded.records,
            vec![ActivityRecord::Feed(Some(FeedDetailsInput {
                start_time: Some(utc(10, 0)),
                ..Default::default()
            }))]
        );
    }

    #[test]
    fn malformed_fields_are_silently_absent() {
        let records = vec![json!({
            "activity_type": "FEED",
            "feed_details": {
                "start_time": "yesterday at noon",
                "end_time": "",
                "amount_ml": "120",
                "feed_type": "juice"
            }
        })];

        let decoded = decode_parsed_activities(&records);
        assert!(decoded.errors.is_empty());
        assert_eq!(
            decoded.records,
            vec![ActivityRecord::Feed(Some(FeedDetailsView::default()))]
        );
    }

    #[test]
    fn amounts_are_truncated_not_rounded() {
        let records = vec![json!({
            "activity_type": "feed",
            "feed_details": { "amount_ml": 89.9 }
        })];

        let decoded = decode_activity_inputs(&records);
        let ActivityRecord::Feed(Some(feed)) = &decoded.records[0] else {
            panic!("expected feed details");
        };
        assert_eq!(feed.amount_ml, Some(89));
    }

    #[test]
    fn input_shape_keeps_had_pee_optional() {
        let records = vec![
            json!({ "activity_type": "DIAPER", "diaper_details": { "changed_at": "2024-01-01T12:00:00Z", "had_poop": false, "had_pee": true } }),
            json!({ "activity_type": "DIAPER", "diaper_details": { "changed_at": "2024-01-01T13:00:00Z", "had_poop": "yes" } }),
        ];

        let inputs = decode_activity_inputs(&records);
        assert_eq!(
            inputs.records[0],
            ActivityRecord::Diaper(Some(DiaperDetailsInput {
                changed_at: Some(utc(12, 0)),
                had_poop: false,
                had_pee: Some(true),
            }))
        );
        assert_eq!(
            inputs.records[1],
            ActivityRecord::Diaper(Some(DiaperDetailsInput {
                changed_at: Some(utc(13, 0)),
                had_poop: false,
                had_pee: None,
            }))
        );

        // 표시용 형태에서는 false로 채워집니다.
        let views = decode_parsed_activities(&records);
        let ActivityRecord::Diaper(Some(diaper)) = &views.records[1] else {
            panic!("expected diaper details");
        };
        assert!(!diaper.had_pee);
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let records = vec![json!({
            "activity_type": "SLEEP",
            "sleep_details": { "start_time": "2024-01-01T09:00:00-05:00", "end_time": "2024-01-01T14:45:00Z" }
        })];

        let decoded = decode_parsed_activities(&records);
        let ActivityRecord::Sleep(Some(sleep)) = &decoded.records[0] else {
            panic!("expected sleep details");
        };
        assert_eq!(sleep.start_time, Some(utc(14, 0)));
        assert_eq!(sleep.duration_minutes, Some(45));
    }

    #[test]
    fn padded_and_space_separated_times_are_accepted() {
        let records = vec![json!({
            "activity_type": "SLEEP",
            "sleep_details": { "start_time": "  2024-01-01T14:00:00Z ", "end_time": "2024-01-01 14:30:00Z" }
        })];

        let decoded = decode_parsed_activities(&records);
        let ActivityRecord::Sleep(Some(sleep)) = &decoded.records[0] else {
            panic!("expected sleep details");
        };
        assert_eq!(sleep.start_time, Some(utc(14, 0)));
        assert_eq!(sleep.end_time, Some(utc(14, 30)));
        assert_eq!(sleep.duration_minutes, Some(30));
    }
}
