use crate::core::calendar::slots_on;
use crate::core::settings::ScheduleSettings;
use crate::domain::model::{DoseEvent, MedicationRegimen};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Timing of one recorded dose relative to its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseTiming {
    OnTime,
    TooEarly,
    TooLate,
    /// 不在排定日、離所有時段太遠，或該時段已被更接近的紀錄佔用
    Extra,
    Sporadic,
}

/// 判斷一筆服藥紀錄是準時、過早、過晚或額外。
///
/// `siblings` is the complete set of events for the same regimen and date.
/// The event itself may be included; events of other regimens or dates are
/// ignored. The result never depends on the order of `siblings`.
pub fn classify_dose(
    event: &DoseEvent,
    regimen: &MedicationRegimen,
    siblings: &[DoseEvent],
    settings: &ScheduleSettings,
) -> DoseTiming {
    if regimen.sporadic_use {
        return DoseTiming::Sporadic;
    }

    let slots = slots_on(regimen, event.date());
    let Some((slot, distance)) = closest_slot(&slots, event.timestamp) else {
        return DoseTiming::Extra;
    };
    if distance > settings.match_window {
        return DoseTiming::Extra;
    }

    // 每個時段只認最接近的一筆
    let claimed_by_closer_sibling = siblings
        .iter()
        .filter(|sibling| sibling.regimen_id == event.regimen_id && sibling.date() == event.date())
        .filter_map(|sibling| closest_slot(&slots, sibling.timestamp))
        .any(|(sibling_slot, sibling_distance)| {
            sibling_slot == slot
                && sibling_distance <= settings.match_window
                && sibling_distance < distance
        });
    if claimed_by_closer_sibling {
        return DoseTiming::Extra;
    }

    let signed = event.timestamp - slot;
    if signed < -settings.on_time_window {
        DoseTiming::TooEarly
    } else if signed > settings.on_time_window {
        DoseTiming::TooLate
    } else {
        DoseTiming::OnTime
    }
}

/// Classifies every event of `regimen` on `date`, ordered by timestamp.
pub fn classify_day<'a>(
    regimen: &MedicationRegimen,
    events: &'a [DoseEvent],
    date: NaiveDate,
    settings: &ScheduleSettings,
) -> Vec<(&'a DoseEvent, DoseTiming)> {
    let siblings: Vec<DoseEvent> = events
        .iter()
        .filter(|event| event.regimen_id == regimen.id && event.date() == date)
        .cloned()
        .collect();

    let mut classified: Vec<(&DoseEvent, DoseTiming)> = events
        .iter()
        .filter(|event| event.regimen_id == regimen.id && event.date() == date)
        .map(|event| (event, classify_dose(event, regimen, &siblings, settings)))
        .collect();
    classified.sort_by_key(|(event, _)| event.timestamp);
    classified
}

/// Closest slot and its absolute distance. Ties go to the earlier slot.
fn closest_slot(
    slots: &[NaiveDateTime],
    timestamp: NaiveDateTime,
) -> Option<(NaiveDateTime, Duration)> {
    slots
        .iter()
        .map(|slot| (*slot, (timestamp - *slot).abs()))
        .min_by_key(|(_, distance)| *distance)
}
