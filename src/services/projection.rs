//! # 도메인 → API 프로젝션
//!
//! 저장된 도메인 레코드를 클라이언트용 view로 바꿉니다.
//!
//! 모든 함수는 `Option<&T> -> Option<View>` 모양입니다. 입력이 없으면 출력도 없고,
//! 에러 경로는 없습니다. 연관 데이터(보호자, 활동 목록, 요약)는 여기서 채우지 않고
//! 호출하는 쪽(라우트)이 따로 불러와 붙입니다.
//!
//! 수유/수면의 소요 시간과 수면 중 여부는 저장된 값을 믿지 않고
//! `temporal`로 매번 다시 계산합니다.

use crate::models::*;
use crate::services::temporal;

pub fn family_to_view(family: Option<&Family>) -> Option<FamilyView> {
    let family = family?;
    Some(FamilyView {
        id: family.id.to_string(),
        name: family.name.clone(),
        baby_name: family.baby_name.clone(),
        password: family.password.clone(),
        created_at: family.created_at,
        caregivers: Vec::new(),
    })
}

pub fn caregiver_to_view(caregiver: Option<&Caregiver>) -> Option<CaregiverView> {
    let caregiver = caregiver?;
    Some(CaregiverView {
        id: caregiver.id.to_string(),
        family_id: caregiver.family_id.to_string(),
        name: caregiver.name.clone(),
        device_id: caregiver.device_id.clone(),
        device_name: caregiver.device_name.clone(),
        created_at: caregiver.created_at,
    })
}

pub fn care_session_to_view(session: Option<&CareSession>) -> Option<CareSessionView> {
    let session = session?;
    Some(CareSessionView {
        id: session.id.to_string(),
        family_id: session.family_id.to_string(),
        status: session.status,
        started_at: session.started_at,
        completed_at: session.completed_at,
        notes: session.notes.clone(),
        caregiver: None,
        activities: Vec::new(),
        summary: None,
    })
}

pub fn feed_details_to_view(details: Option<&FeedDetails>) -> Option<FeedDetailsView> {
    let details = details?;
    Some(FeedDetailsView {
        start_time: Some(details.start_time),
        // 0값 종료 시각은 진행 중으로 보고 내보내지 않습니다.
        end_time: temporal::effective_end(details.end_time),
        amount_ml: details.amount_ml,
        feed_type: details.feed_type,
        duration_minutes: temporal::duration_minutes(details.start_time, details.end_time),
    })
}

pub fn diaper_details_to_view(details: Option<&DiaperDetails>) -> Option<DiaperDetailsView> {
    let details = details?;
    Some(DiaperDetailsView {
        changed_at: Some(details.changed_at),
        had_poop: details.had_poop,
        had_pee: details.had_pee,
    })
}

pub fn sleep_details_to_view(details: Option<&SleepDetails>) -> Option<SleepDetailsView> {
    let details = details?;
    // 저장된 duration_minutes는 무시합니다.
    let derived = temporal::derive(Some(details.start_time), details.end_time);
    Some(SleepDetailsView {
        start_time: Some(details.start_time),
        end_time: derived.end_time,
        duration_minutes: derived.duration_minutes,
        is_active: derived.is_active,
    })
}

/// 활동 봉투와 세부 정보를 종류별 래퍼로 묶습니다.
///
/// 세부 정보의 종류가 봉투의 태그와 다르면 세부 정보 없이 내보냅니다.
/// 봉투의 태그는 닫힌 `ActivityType`이므로 알 수 없는 태그는 여기까지 오지 않습니다.
pub fn activity_to_view(
    activity: Option<&Activity>,
    details: Option<&ActivityDetails>,
) -> Option<ActivityView> {
    let activity = activity?;
    let id = activity.id.to_string();
    let created_at = activity.created_at;

    let view = match activity.activity_type {
        ActivityType::Feed => ActivityView::Feed(FeedActivityView {
            id,
            created_at,
            feed_details: feed_details_to_view(match details {
                Some(ActivityDetails::Feed(d)) => Some(d),
                _ => None,
            }),
        }),
        ActivityType::Diaper => ActivityView::Diaper(DiaperActivityView {
            id,
            created_at,
            diaper_details: diaper_details_to_view(match details {
                Some(ActivityDetails::Diaper(d)) => Some(d),
                _ => None,
            }),
        }),
        ActivityType::Sleep => ActivityView::Sleep(SleepActivityView {
            id,
            created_at,
            sleep_details: sleep_details_to_view(match details {
                Some(ActivityDetails::Sleep(d)) => Some(d),
                _ => None,
            }),
        }),
    };

    Some(view)
}

/// 세션의 활동 목록 전체를 순서대로 변환합니다.
pub fn activities_to_views(activities: &[ActivityWithDetails]) -> Vec<ActivityView> {
    activities
        .iter()
        .filter_map(|a| activity_to_view(Some(&a.activity), a.details.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap()
    }

    fn activity(activity_type: ActivityType) -> Activity {
        Activity {
            id: Uuid::now_v7(),
            care_session_id: Uuid::now_v7(),
            activity_type,
            created_at: at(9, 0),
            updated_at: at(9, 0),
        }
    }

    fn feed(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> FeedDetails {
        FeedDetails {
            id: Uuid::now_v7(),
            activity_id: Uuid::now_v7(),
            start_time: start,
            end_time: end,
            amount_ml: Some(120),
            feed_type: Some(FeedType::Formula),
            created_at: start,
            updated_at: start,
        }
    }

    fn sleep(end: Option<DateTime<Utc>>, stored_duration: Option<i32>) -> SleepDetails {
        SleepDetails {
            id: Uuid::now_v7(),
            activity_id: Uuid::now_v7(),
            start_time: at(13, 0),
            end_time: end,
            duration_minutes: stored_duration,
            created_at: at(13, 0),
            updated_at: at(13, 0),
        }
    }

    #[test]
    fn thirty_minute_feed_projects_duration() {
        let view = feed_details_to_view(Some(&feed(at(10, 0), Some(at(10, 30))))).unwrap();
        assert_eq!(view.duration_minutes, Some(30));
        assert_eq!(view.start_time, Some(at(10, 0)));
        assert_eq!(view.amount_ml, Some(120));
    }

    #[test]
    fn open_feed_has_no_duration() {
        let view = feed_details_to_view(Some(&feed(at(10, 0), None))).unwrap();
        assert_eq!(view.duration_minutes, None);
        assert_eq!(view.end_time, None);
    }

    #[test]
    fn absent_inputs_project_to_absent() {
        assert!(family_to_view(None).is_none());
        assert!(caregiver_to_view(None).is_none());
        assert!(care_session_to_view(None).is_none());
        assert!(feed_details_to_view(None).is_none());
        assert!(diaper_details_to_view(None).is_none());
        assert!(sleep_details_to_view(None).is_none());
        assert!(activity_to_view(None, None).is_none());
    }

    #[test]
    fn sleep_duration_is_recomputed_not_trusted() {
        let view = sleep_details_to_view(Some(&sleep(Some(at(14, 15)), Some(999)))).unwrap();
        assert_eq!(view.duration_minutes, Some(75));
        assert!(!view.is_active);

        let view = sleep_details_to_view(Some(&sleep(None, Some(45)))).unwrap();
        assert_eq!(view.duration_minutes, None);
        assert!(view.is_active);
    }

    #[test]
    fn zero_value_end_projects_as_still_running() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();

        let view = sleep_details_to_view(Some(&sleep(Some(epoch), None))).unwrap();
        assert_eq!(view.end_time, None);
        assert_eq!(view.duration_minutes, None);
        assert!(view.is_active);

        let view = feed_details_to_view(Some(&feed(at(10, 0), Some(epoch)))).unwrap();
        assert_eq!(view.end_time, None);
        assert_eq!(view.duration_minutes, None);
    }

    #[test]
    fn activity_wraps_matching_details() {
        let envelope = activity(ActivityType::Feed);
        let details = ActivityDetails::Feed(feed(at(10, 0), Some(at(10, 20))));

        let view = activity_to_view(Some(&envelope), Some(&details)).unwrap();
        let ActivityView::Feed(feed_view) = view else {
            panic!("expected feed wrapper");
        };
        assert_eq!(feed_view.id, envelope.id.to_string());
        assert_eq!(feed_view.feed_details.and_then(|d| d.duration_minutes), Some(20));
    }

    #[test]
    fn mismatched_details_are_dropped() {
        let envelope = activity(ActivityType::Sleep);
        let details = ActivityDetails::Feed(feed(at(10, 0), None));

        let view = activity_to_view(Some(&envelope), Some(&details)).unwrap();
        assert_eq!(view.activity_type(), ActivityType::Sleep);
        let ActivityView::Sleep(sleep_view) = view else {
            panic!("expected sleep wrapper");
        };
        assert!(sleep_view.sleep_details.is_none());
    }

    #[test]
    fn ids_are_canonical_strings() {
        let id = Uuid::parse_str("0190f0c4-8a6e-7d2b-9c1a-1234567890ab").unwrap();
        let caregiver = Caregiver {
            id,
            family_id: id,
            name: "Mina".to_string(),
            device_id: "device-1".to_string(),
            device_name: None,
            created_at: at(8, 0),
            updated_at: at(8, 0),
        };
        let view = caregiver_to_view(Some(&caregiver)).unwrap();
        assert_eq!(view.id, "0190f0c4-8a6e-7d2b-9c1a-1234567890ab");
        assert_eq!(view.family_id, view.id);
    }

    #[test]
    fn family_password_is_exposed_for_sharing() {
        let family = Family {
            id: Uuid::now_v7(),
            name: "kims".to_string(),
            password_hash: "$argon2id$...".to_string(),
            password: "rainbow".to_string(),
            baby_name: "Dana".to_string(),
            created_at: at(8, 0),
            updated_at: at(8, 0),
        };
        let view = family_to_view(Some(&family)).unwrap();
        assert_eq!(view.password, "rainbow");
        assert!(view.caregivers.is_empty());
    }

    #[test]
    fn activity_list_keeps_order() {
        let rows = vec![
            ActivityWithDetails { activity: activity(ActivityType::Diaper), details: None },
            ActivityWithDetails { activity: activity(ActivityType::Feed), details: None },
        ];
        let types: Vec<_> = activities_to_views(&rows).iter().map(|v| v.activity_type()).collect();
        assert_eq!(types, vec![ActivityType::Diaper, ActivityType::Feed]);
    }
}
