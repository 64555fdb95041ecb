use crate::core::settings::ScheduleSettings;
use crate::domain::model::{FrequencyKind, MedicationRegimen};
use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Whether `date` is a medication day for `regimen`.
///
/// A day must fall inside the start/end window and satisfy the per-kind
/// rule. Non-positive `interval_days` never recurs.
pub fn is_medication_day(regimen: &MedicationRegimen, date: NaiveDate) -> bool {
    if date < regimen.start_date || regimen.has_ended_before(date) {
        return false;
    }

    match regimen.frequency {
        FrequencyKind::Daily => true,
        FrequencyKind::Weekly => {
            let weekday = date.weekday().number_from_monday();
            regimen
                .week_days
                .iter()
                .any(|&day| u32::from(day) == weekday)
        }
        FrequencyKind::IntervalDays => {
            if regimen.interval_days <= 0 {
                return false;
            }
            let diff = (date - regimen.start_date).num_days();
            diff % i64::from(regimen.interval_days) == 0
        }
    }
}

/// 向未來掃描的天數上限 (依頻率種類)
pub fn forward_scan_bound(regimen: &MedicationRegimen, settings: &ScheduleSettings) -> u32 {
    match regimen.frequency {
        FrequencyKind::Weekly => settings.scan.weekly_days,
        FrequencyKind::Daily | FrequencyKind::IntervalDays => settings.scan.forward_days,
    }
}

/// Every scheduled instant on `date`, earliest first. Empty on non-medication days.
pub fn slots_on(regimen: &MedicationRegimen, date: NaiveDate) -> Vec<NaiveDateTime> {
    if !is_medication_day(regimen, date) {
        return Vec::new();
    }
    regimen.ordered_times().map(|t| date.and_time(t)).collect()
}

/// Inclusive iterator over the dates `start..=end`. Empty when `start > end`.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start
        .iter_days()
        .take_while(move |date| *date <= end)
}
