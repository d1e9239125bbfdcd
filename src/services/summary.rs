//! 세션 요약 집계
//!
//! 프로젝션된 활동 목록에서 세션 카드에 보여줄 합계를 계산합니다.
//! 이미 `temporal`로 계산된 view 값을 그대로 사용하므로 별도의 시간 계산은 없습니다.

use crate::models::{ActivityView, CareSessionSummary};

pub fn summarize(activities: &[ActivityView]) -> CareSessionSummary {
    let mut summary = CareSessionSummary::default();

    for activity in activities {
        match activity {
            ActivityView::Feed(feed) => {
                summary.total_feeds += 1;
                if let Some(details) = &feed.feed_details {
                    summary.total_ml += details.amount_ml.unwrap_or(0).max(0);
                    summary.last_feed_time = summary.last_feed_time.max(details.start_time);
                }
            }
            ActivityView::Diaper(_) => summary.total_diaper_changes += 1,
            ActivityView::Sleep(sleep) => {
                let Some(details) = &sleep.sleep_details else {
                    continue;
                };
                summary.last_sleep_time = summary.last_sleep_time.max(details.start_time);
                if details.is_active {
                    summary.currently_asleep = true;
                } else {
                    // 진행 중인 수면은 합계에서 제외
                    summary.total_sleep_minutes += details.duration_minutes.unwrap_or(0).max(0);
                }
            }
        }
    }

    summary
}
