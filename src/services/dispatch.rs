//! # 활동 종류 디스패치
//!
//! 타입 태그(`feed` / `diaper` / `sleep`)에서 다음으로 가는 닫힌 매핑입니다:
//! - 세부 정보 variant (`ActivityRecord::Feed` 등)
//! - 느슨한 JSON에서 읽을 중첩 키 (`feed_details` 등)
//! - API 래퍼 타입 (`ActivityView::Feed` 등, `projection` 참고)
//!
//! 알 수 없는 태그는 이 계층에서 에러가 아닙니다. 디코더는 빈 세부 정보로
//! 레코드를 유지하고, 프로젝션은 None을 돌려줍니다.

use crate::models::ActivityType;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl ActivityType {
    /// 외부 해석 결과(JSON)에서 이 종류의 세부 정보가 들어 있는 키
    pub fn details_key(self) -> &'static str {
        match self {
            ActivityType::Feed => "feed_details",
            ActivityType::Diaper => "diaper_details",
            ActivityType::Sleep => "sleep_details",
        }
    }
}

/// 태그 하나와, 그 태그에 맞는 세부 정보 하나를 담는 합 타입
///
/// 같은 모양이 두 번 쓰입니다:
/// - `ActivityInput` = 저장용 입력 형태
/// - `ParsedActivity` = 화면 표시용 형태
///
/// 세부 정보가 `Option`인 이유: 태그는 있지만 해당 중첩 레코드가 없을 수 있습니다.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityRecord<F, D, S> {
    Feed(Option<F>),
    Diaper(Option<D>),
    Sleep(Option<S>),
    /// 인식하지 못한 태그 — 주어진 문자열을 그대로 보존합니다.
    Unrecognized(String),
}

impl<F, D, S> ActivityRecord<F, D, S> {
    /// 태그를 해석해 맞는 variant를 만듭니다.
    ///
    /// 세 클로저 중 태그에 해당하는 것 하나만 호출됩니다. 나머지 종류의
    /// 세부 정보는 있더라도 무시됩니다.
    pub fn dispatch(
        tag: &str,
        feed: impl FnOnce() -> Option<F>,
        diaper: impl FnOnce() -> Option<D>,
        sleep: impl FnOnce() -> Option<S>,
    ) -> Self {
        match ActivityType::from_tag(tag) {
            Some(ActivityType::Feed) => ActivityRecord::Feed(feed()),
            Some(ActivityType::Diaper) => ActivityRecord::Diaper(diaper()),
            Some(ActivityType::Sleep) => ActivityRecord::Sleep(sleep()),
            None => ActivityRecord::Unrecognized(tag.to_string()),
        }
    }

    pub fn activity_type(&self) -> Option<ActivityType> {
        match self {
            ActivityRecord::Feed(_) => Some(ActivityType::Feed),
            ActivityRecord::Diaper(_) => Some(ActivityType::Diaper),
            ActivityRecord::Sleep(_) => Some(ActivityType::Sleep),
            ActivityRecord::Unrecognized(_) => None,
        }
    }

    /// API에 표시할 태그. 알려진 종류는 `FEED` 형태, 아니면 원래 문자열.
    pub fn tag(&self) -> &str {
        match self {
            ActivityRecord::Unrecognized(tag) => tag,
            known => known
                .activity_type()
                .map(ActivityType::api_name)
                .unwrap_or_default(),
        }
    }

    /// 태그는 그대로 두고 세부 정보의 형태만 바꿉니다.
    pub fn map<F2, D2, S2>(
        self,
        feed: impl FnOnce(F) -> F2,
        diaper: impl FnOnce(D) -> D2,
        sleep: impl FnOnce(S) -> S2,
    ) -> ActivityRecord<F2, D2, S2> {
        match self {
            ActivityRecord::Feed(d) => ActivityRecord::Feed(d.map(feed)),
            ActivityRecord::Diaper(d) => ActivityRecord::Diaper(d.map(diaper)),
            ActivityRecord::Sleep(d) => ActivityRecord::Sleep(d.map(sleep)),
            ActivityRecord::Unrecognized(tag) => ActivityRecord::Unrecognized(tag),
        }
    }
}

// ── JSON 표현 ──
// `{"activityType": "FEED", "feedDetails": {...}, "diaperDetails": null, "sleepDetails": null}`
// 클라이언트 규약에 맞춰 세 키를 모두 두고, 태그와 맞는 것만 채웁니다.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordRef<'a, F, D, S> {
    activity_type: &'a str,
    feed_details: Option<&'a F>,
    diaper_details: Option<&'a D>,
    sleep_details: Option<&'a S>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordOwned<F, D, S> {
    activity_type: String,
    #[serde(default = "none")]
    feed_details: Option<F>,
    #[serde(default = "none")]
    diaper_details: Option<D>,
    #[serde(default = "none")]
    sleep_details: Option<S>,
}

fn none<T>() -> Option<T> {
    None
}

impl<F: Serialize, D: Serialize, S: Serialize> Serialize for ActivityRecord<F, D, S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut record = RecordRef {
            activity_type: self.tag(),
            feed_details: None,
            diaper_details: None,
            sleep_details: None,
        };
        match self {
            ActivityRecord::Feed(d) => record.feed_details = d.as_ref(),
            ActivityRecord::Diaper(d) => record.diaper_details = d.as_ref(),
            ActivityRecord::Sleep(d) => record.sleep_details = d.as_ref(),
            ActivityRecord::Unrecognized(_) => {}
        }
        record.serialize(serializer)
    }
}

impl<'de, F, D, S> Deserialize<'de> for ActivityRecord<F, D, S>
where
    F: Deserialize<'de>,
    D: Deserialize<'de>,
    S: Deserialize<'de>,
{
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let record = RecordOwned::<F, D, S>::deserialize(deserializer)?;
        Ok(ActivityRecord::dispatch(
            &record.activity_type,
            move || record.feed_details,
            move || record.diaper_details,
            move || record.sleep_details,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type Record = ActivityRecord<u32, bool, String>;

    #[test]
    fn tags_resolve_case_insensitively() {
        assert_eq!(ActivityType::from_tag("FEED"), Some(ActivityType::Feed));
        assert_eq!(ActivityType::from_tag("diaper"), Some(ActivityType::Diaper));
        assert_eq!(ActivityType::from_tag(" Sleep "), Some(ActivityType::Sleep));
        assert_eq!(ActivityType::from_tag("bath"), None);
    }

    #[test]
    fn every_type_has_its_own_details_key() {
        let keys: Vec<_> = ActivityType::ALL.iter().map(|t| t.details_key()).collect();
        assert_eq!(keys, vec!["feed_details", "diaper_details", "sleep_details"]);
    }

    #[test]
    fn dispatch_only_calls_the_matching_builder() {
        let record: Record = ActivityRecord::dispatch(
            "SLEEP",
            || panic!("feed builder must not run"),
            || panic!("diaper builder must not run"),
            || Some("nap".to_string()),
        );
        assert_eq!(record, ActivityRecord::Sleep(Some("nap".to_string())));
        assert_eq!(record.tag(), "SLEEP");
    }

    #[test]
    fn unknown_tag_is_kept_verbatim() {
        let record: Record = ActivityRecord::dispatch("bath", || Some(1), || Some(true), || None);
        assert_eq!(record, ActivityRecord::Unrecognized("bath".to_string()));
        assert_eq!(record.tag(), "bath");
        assert!(record.activity_type().is_none());
    }

    #[test]
    fn serializes_with_all_three_detail_keys() {
        let record: Record = ActivityRecord::Diaper(Some(true));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "activityType": "DIAPER",
                "feedDetails": null,
                "diaperDetails": true,
                "sleepDetails": null
            })
        );
    }

    #[test]
    fn deserialize_ignores_details_of_other_types() {
        let record: Record = serde_json::from_value(json!({
            "activityType": "FEED",
            "feedDetails": 120,
            "sleepDetails": "ignored"
        }))
        .unwrap();
        assert_eq!(record, ActivityRecord::Feed(Some(120)));
    }
}
