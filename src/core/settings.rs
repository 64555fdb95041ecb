use chrono::Duration;
use serde::{Deserialize, Serialize};

/// How far past a scheduled slot a dose may go unrecorded before the regimen is late.
pub const DEFAULT_LATE_THRESHOLD_MINUTES: i64 = 30;
/// Any dose event within this many minutes of a slot covers it.
pub const DEFAULT_LATE_MATCH_WINDOW_MINUTES: i64 = 30;
/// Signed distance to the slot that still counts as on time.
pub const DEFAULT_ON_TIME_WINDOW_MINUTES: i64 = 30;
/// Beyond this distance from every slot a dose is extra.
pub const DEFAULT_MATCH_WINDOW_MINUTES: i64 = 180;

/// Forward scan bound for Daily and IntervalDays regimens.
pub const DEFAULT_FORWARD_SCAN_DAYS: u32 = 365;
/// Forward scan bound for Weekly regimens.
pub const DEFAULT_WEEKLY_SCAN_DAYS: u32 = 14;
/// Backward scan bound when looking for the last scheduled dose.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// 建立當天的寬限規則適用範圍
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GracePolicy {
    /// Slots earlier than `created_at` on the creation day are never late, for every kind.
    #[default]
    AllKinds,
    /// Only Daily regimens get the creation-day grace.
    DailyOnly,
    Disabled,
}

/// Day-scan bounds. Scans visit day offsets `0..=bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanBounds {
    pub forward_days: u32,
    pub weekly_days: u32,
    pub lookback_days: u32,
}

impl Default for ScanBounds {
    fn default() -> Self {
        Self {
            forward_days: DEFAULT_FORWARD_SCAN_DAYS,
            weekly_days: DEFAULT_WEEKLY_SCAN_DAYS,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

/// Windows and bounds shared by every calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    pub late_threshold: Duration,
    pub late_match_window: Duration,
    pub on_time_window: Duration,
    pub match_window: Duration,
    pub scan: ScanBounds,
    pub grace_policy: GracePolicy,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            late_threshold: Duration::minutes(DEFAULT_LATE_THRESHOLD_MINUTES),
            late_match_window: Duration::minutes(DEFAULT_LATE_MATCH_WINDOW_MINUTES),
            on_time_window: Duration::minutes(DEFAULT_ON_TIME_WINDOW_MINUTES),
            match_window: Duration::minutes(DEFAULT_MATCH_WINDOW_MINUTES),
            scan: ScanBounds::default(),
            grace_policy: GracePolicy::default(),
        }
    }
}

impl ScheduleSettings {
    pub fn with_scan(mut self, scan: ScanBounds) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_grace_policy(mut self, grace_policy: GracePolicy) -> Self {
        self.grace_policy = grace_policy;
        self
    }
}
