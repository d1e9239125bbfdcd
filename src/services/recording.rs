//! # 활동 기록 준비
//!
//! 저장용 입력(`ActivityInput`)을 DB에 넣을 수 있는 `Activity` + `ActivityDetails` 쌍으로
//! 바꿉니다. 디코더는 관대하지만 저장은 엄격합니다:
//! - 태그를 알 수 없거나 세부 정보가 없으면 거부
//! - 필수 시각(수유/수면 `start_time`, 기저귀 `changed_at`)이 없으면 거부
//! - `had_pee`가 명시되지 않았으면 false로 저장
//!
//! 수면 종료 시각이 함께 들어오면 소요 시간도 같이 저장합니다.

use crate::error::AppError;
use crate::models::*;
use crate::services::dispatch::ActivityRecord;
use crate::services::temporal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 입력 하나를 저장 가능한 행 묶음으로 만듭니다.
pub fn prepare_activity(
    care_session_id: Uuid,
    input: &ActivityInput,
    now: DateTime<Utc>,
) -> Result<ActivityWithDetails, AppError> {
    let activity_id = Uuid::now_v7();

    let details = match input {
        ActivityRecord::Feed(Some(feed)) => ActivityDetails::Feed(FeedDetails {
            id: Uuid::now_v7(),
            activity_id,
            start_time: required(feed.start_time, "feed start_time")?,
            end_time: temporal::effective_end(feed.end_time),
            amount_ml: feed.amount_ml,
            feed_type: feed.feed_type,
            created_at: now,
            updated_at: now,
        }),
        ActivityRecord::Diaper(Some(diaper)) => ActivityDetails::Diaper(DiaperDetails {
            id: Uuid::now_v7(),
            activity_id,
            changed_at: required(diaper.changed_at, "diaper changed_at")?,
            had_poop: diaper.had_poop,
            had_pee: diaper.had_pee.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }),
        ActivityRecord::Sleep(Some(sleep)) => {
            let start_time = required(sleep.start_time, "sleep start_time")?;
            let end_time = temporal::effective_end(sleep.end_time);
            ActivityDetails::Sleep(SleepDetails {
                id: Uuid::now_v7(),
                activity_id,
                start_time,
                end_time,
                duration_minutes: temporal::duration_minutes(start_time, end_time),
                created_at: now,
                updated_at: now,
            })
        }
        ActivityRecord::Feed(None) | ActivityRecord::Diaper(None) | ActivityRecord::Sleep(None) => {
            return Err(AppError::BadRequest(format!(
                "{} activity is missing its details",
                input.tag()
            )));
        }
        ActivityRecord::Unrecognized(tag) => {
            return Err(AppError::BadRequest(format!("Unknown activity type: {}", tag)));
        }
    };

    Ok(ActivityWithDetails {
        activity: Activity {
            id: activity_id,
            care_session_id,
            activity_type: details.activity_type(),
            created_at: now,
            updated_at: now,
        },
        details: Some(details),
    })
}

fn required(value: Option<DateTime<Utc>>, field: &str) -> Result<DateTime<Utc>, AppError> {
    value.ok_or_else(|| AppError::BadRequest(format!("Missing {}", field)))
}
