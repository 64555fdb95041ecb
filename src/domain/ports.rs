use crate::domain::model::{DoseEvent, MedicationRegimen};
use chrono::NaiveDateTime;

/// Source of "now". Read once per evaluation and passed down explicitly.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// 讀取本機時鐘
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// 固定時間，用於測試或命令列 `--now`
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Read-only snapshot supplier (persistence or sync layer).
pub trait SnapshotProvider: Send + Sync {
    fn regimens(&self) -> &[MedicationRegimen];
    fn dose_events(&self) -> &[DoseEvent];
}
