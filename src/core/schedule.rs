use crate::core::calendar::{forward_scan_bound, is_medication_day, slots_on};
use crate::core::settings::ScheduleSettings;
use crate::domain::model::{FrequencyKind, MedicationRegimen};
use chrono::{Days, NaiveDateTime};

/// 計算下一次應服藥的時間。
///
/// Returns the earliest scheduled instant strictly after `now`, scanning at
/// most the per-kind bound of days ahead. `None` when the regimen has no
/// times, has already ended, or no occurrence falls inside the bound.
pub fn compute_next_due(
    regimen: &MedicationRegimen,
    now: NaiveDateTime,
    settings: &ScheduleSettings,
) -> Option<NaiveDateTime> {
    if regimen.times_of_day.is_empty() {
        return None;
    }

    let today = now.date();
    if regimen.has_ended_before(today) {
        return None;
    }

    // 尚未開始的間隔療程直接從開始日第一個時間起算
    if regimen.frequency == FrequencyKind::IntervalDays && today < regimen.start_date {
        if !is_medication_day(regimen, regimen.start_date) {
            return None;
        }
        return regimen
            .ordered_times()
            .next()
            .map(|time| regimen.start_date.and_time(time));
    }

    let origin = today.max(regimen.start_date);
    let bound = forward_scan_bound(regimen, settings);

    for offset in 0..=bound {
        let day = origin.checked_add_days(Days::new(u64::from(offset)))?;
        if regimen.has_ended_before(day) {
            break;
        }
        if !is_medication_day(regimen, day) {
            continue;
        }
        if let Some(due) = regimen
            .ordered_times()
            .map(|time| day.and_time(time))
            .find(|due| *due > now)
        {
            return Some(due);
        }
    }

    tracing::trace!(regimen = %regimen.id, bound, "next-due scan found no occurrence");
    None
}

/// The next `count` due instants after `now`, for arming several reminders ahead.
pub fn upcoming_doses(
    regimen: &MedicationRegimen,
    now: NaiveDateTime,
    count: usize,
    settings: &ScheduleSettings,
) -> Vec<NaiveDateTime> {
    std::iter::successors(compute_next_due(regimen, now, settings), |previous| {
        compute_next_due(regimen, *previous, settings)
    })
    .take(count)
    .collect()
}

/// 最近一次 (<= now) 的排定服藥時間，最多往回掃描 `scan.lookback_days` 天
pub fn last_scheduled_before(
    regimen: &MedicationRegimen,
    now: NaiveDateTime,
    settings: &ScheduleSettings,
) -> Option<NaiveDateTime> {
    if regimen.times_of_day.is_empty() {
        return None;
    }

    let today = now.date();
    for offset in 0..=settings.scan.lookback_days {
        let day = today.checked_sub_days(Days::new(u64::from(offset)))?;
        if day < regimen.start_date {
            break;
        }
        if let Some(slot) = slots_on(regimen, day)
            .into_iter()
            .rev()
            .find(|slot| *slot <= now)
        {
            return Some(slot);
        }
    }

    None
}
