use crate::models::{NextFeedPrediction, PredictionConfidence};
use chrono::{DateTime, Duration, Utc};

/// 고정 간격 자리표시 예측. 실제 수유 기록은 아직 보지 않습니다.
pub const PLACEHOLDER_MINUTES: i32 = 120;

const PLACEHOLDER_REASONING: &str =
    "Based on 70ml feed at 2:00 PM, typically goes 3 hours between feeds";

// TODO: 최근 완료 세션의 수유 간격 평균으로 바꾸기
pub fn predict_next_feed(now: DateTime<Utc>) -> NextFeedPrediction {
    NextFeedPrediction {
        predicted_time: now + Duration::minutes(i64::from(PLACEHOLDER_MINUTES)),
        confidence: PredictionConfidence::High,
        minutes_until_feed: PLACEHOLDER_MINUTES,
        reasoning: Some(PLACEHOLDER_REASONING.to_string()),
    }
}
