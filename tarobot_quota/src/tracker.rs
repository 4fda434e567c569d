use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use std::collections::HashMap;
use tarobot_core::DrawType;
use tokio::sync::Mutex;
use tracing::debug;

/// Seconds east of UTC for the reference timezone (Asia/Shanghai, UTC+8,
/// no DST).
const REFERENCE_OFFSET_SECS: i32 = 8 * 3600;

#[expect(clippy::expect_used, reason = "UTC+8 is a valid fixed offset")]
fn reference_tz() -> FixedOffset {
    FixedOffset::east_opt(REFERENCE_OFFSET_SECS).expect("UTC+8 is within the valid offset range")
}

/// Daily limits, resolved once from configuration.
#[derive(Debug, Clone, Copy)]
pub struct QuotaLimits {
    pub enabled: bool,
    pub divine: u32,
    pub tarot: u32,
}

impl QuotaLimits {
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            divine: 0,
            tarot: 0,
        }
    }

    const fn for_type(&self, draw_type: DrawType) -> u32 {
        match draw_type {
            DrawType::Divine => self.divine,
            DrawType::Tarot => self.tarot,
        }
    }
}

/// Outcome of a check-and-consume quota check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed,
    Exhausted { message: String },
}

impl QuotaDecision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// One user's counters for one reference-timezone calendar date.
#[derive(Debug, Clone, Copy)]
struct DayRecord {
    date: NaiveDate,
    divine: u32,
    tarot: u32,
}

impl DayRecord {
    const fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            divine: 0,
            tarot: 0,
        }
    }

    const fn count(&self, draw_type: DrawType) -> u32 {
        match draw_type {
            DrawType::Divine => self.divine,
            DrawType::Tarot => self.tarot,
        }
    }

    const fn consume(&mut self, draw_type: DrawType) {
        match draw_type {
            DrawType::Divine => self.divine += 1,
            DrawType::Tarot => self.tarot += 1,
        }
    }
}

/// Per-user daily quota tracker.
///
/// Records live behind one async mutex; a check runs entirely under the
/// lock, so overlapping requests from the same user cannot lose updates.
pub struct QuotaTracker {
    limits: QuotaLimits,
    records: Mutex<HashMap<String, DayRecord>>,
}

impl QuotaTracker {
    #[must_use]
    pub fn new(limits: QuotaLimits) -> Self {
        Self {
            limits,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Check-and-consume against the current wall clock.
    pub async fn check(&self, user_id: &str, draw_type: DrawType) -> QuotaDecision {
        self.check_at(user_id, draw_type, Utc::now().with_timezone(&reference_tz()))
            .await
    }

    /// Check-and-consume at an explicit reference-timezone instant.
    ///
    /// A record whose date is not `now`'s date is reset to zero counts
    /// before the limit is evaluated. When the check passes, the counter is
    /// incremented in the same call; there is no separate commit step.
    pub async fn check_at(
        &self,
        user_id: &str,
        draw_type: DrawType,
        now: DateTime<FixedOffset>,
    ) -> QuotaDecision {
        if !self.limits.enabled {
            return QuotaDecision::Allowed;
        }

        let today = now.date_naive();
        let mut records = self.records.lock().await;
        let record = records
            .entry(user_id.to_string())
            .or_insert_with(|| DayRecord::fresh(today));

        if record.date != today {
            *record = DayRecord::fresh(today);
        }

        if record.count(draw_type) >= self.limits.for_type(draw_type) {
            debug!("Quota exhausted for {user_id} ({draw_type:?})");
            let (hours, minutes) = time_until_midnight(now);
            return QuotaDecision::Exhausted {
                message: format!(
                    "今天的{}次数已用完啦！😊 请在 {hours} 小时 {minutes} 分钟后再来吧！",
                    draw_type.label_cn()
                ),
            };
        }

        record.consume(draw_type);
        QuotaDecision::Allowed
    }
}

/// Whole hours and minutes until the next reference-timezone midnight.
fn time_until_midnight(now: DateTime<FixedOffset>) -> (i64, i64) {
    let midnight = (now.date_naive() + Duration::days(1)).and_time(NaiveTime::MIN);
    let left = midnight - now.naive_local();
    (left.num_hours(), left.num_minutes() % 60)
}
