use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 用藥頻率種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyKind {
    Daily,
    /// 只在 `week_days` 指定的星期幾用藥
    Weekly,
    /// 從 `start_date` 起每 `interval_days` 天用藥一次
    IntervalDays,
}

/// A configured recurring medication schedule.
///
/// Snapshots are read-only: the engine never mutates a regimen and never
/// stores one between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRegimen {
    pub id: String,
    pub frequency: FrequencyKind,
    #[serde(default)]
    pub times_of_day: BTreeSet<NaiveTime>,
    /// ISO weekday numbers, 1 = Monday .. 7 = Sunday.
    #[serde(default)]
    pub week_days: BTreeSet<u8>,
    #[serde(default = "default_interval_days")]
    pub interval_days: i32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub duration_days: u32,
    #[serde(default)]
    pub continuous_use: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub sporadic_use: bool,
    /// Rotation order matters.
    #[serde(default)]
    pub application_sites: Vec<String>,
    pub created_at: NaiveDateTime,
}

fn default_interval_days() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

impl MedicationRegimen {
    /// 建立一個每日用藥的療程，其餘欄位使用預設值
    pub fn daily(id: &str, start_date: NaiveDate, times_of_day: &[NaiveTime]) -> Self {
        Self {
            id: id.to_string(),
            frequency: FrequencyKind::Daily,
            times_of_day: times_of_day.iter().copied().collect(),
            week_days: BTreeSet::new(),
            interval_days: 1,
            start_date,
            duration_days: 0,
            continuous_use: true,
            paused: false,
            notifications_enabled: true,
            sporadic_use: false,
            application_sites: Vec::new(),
            created_at: start_date.and_time(NaiveTime::MIN),
        }
    }

    pub fn weekly(
        id: &str,
        start_date: NaiveDate,
        week_days: &[u8],
        times_of_day: &[NaiveTime],
    ) -> Self {
        Self {
            frequency: FrequencyKind::Weekly,
            week_days: week_days.iter().copied().collect(),
            ..Self::daily(id, start_date, times_of_day)
        }
    }

    pub fn every_n_days(
        id: &str,
        start_date: NaiveDate,
        interval_days: i32,
        times_of_day: &[NaiveTime],
    ) -> Self {
        Self {
            frequency: FrequencyKind::IntervalDays,
            interval_days,
            ..Self::daily(id, start_date, times_of_day)
        }
    }

    pub fn with_duration(mut self, duration_days: u32) -> Self {
        self.duration_days = duration_days;
        self.continuous_use = false;
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_sites(mut self, sites: &[&str]) -> Self {
        self.application_sites = sites.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    pub fn with_sporadic_use(mut self, sporadic: bool) -> Self {
        self.sporadic_use = sporadic;
        self
    }

    /// 最後一天用藥日 (`start_date + duration_days - 1`)。
    ///
    /// Continuous regimens and a zero duration have no end date.
    pub fn end_date(&self) -> Option<NaiveDate> {
        if self.continuous_use || self.duration_days == 0 {
            return None;
        }
        self.start_date
            .checked_add_days(Days::new(u64::from(self.duration_days) - 1))
    }

    /// True when the regimen had a finite end date strictly before `date`.
    pub fn has_ended_before(&self, date: NaiveDate) -> bool {
        self.end_date().is_some_and(|end| end < date)
    }

    /// 依時間排序的用藥時間
    pub fn ordered_times(&self) -> impl DoubleEndedIterator<Item = NaiveTime> + '_ {
        self.times_of_day.iter().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseStatus {
    Taken,
    Skipped,
}

/// One append-only log entry recording a dose taken or skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseEvent {
    pub id: String,
    pub regimen_id: String,
    pub timestamp: NaiveDateTime,
    pub status: DoseStatus,
    #[serde(default)]
    pub administered_quantity: Option<f64>,
    #[serde(default)]
    pub application_site: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl DoseEvent {
    pub fn taken(id: &str, regimen_id: &str, timestamp: NaiveDateTime) -> Self {
        Self {
            id: id.to_string(),
            regimen_id: regimen_id.to_string(),
            timestamp,
            status: DoseStatus::Taken,
            administered_quantity: None,
            application_site: None,
            note: None,
        }
    }

    pub fn skipped(id: &str, regimen_id: &str, timestamp: NaiveDateTime) -> Self {
        Self {
            status: DoseStatus::Skipped,
            ..Self::taken(id, regimen_id, timestamp)
        }
    }

    pub fn with_site(mut self, site: &str) -> Self {
        self.application_site = Some(site.to_string());
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.administered_quantity = Some(quantity);
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn is_taken(&self) -> bool {
        self.status == DoseStatus::Taken
    }
}
