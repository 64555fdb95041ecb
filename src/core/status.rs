use crate::core::schedule::{compute_next_due, last_scheduled_before};
use crate::core::settings::{GracePolicy, ScheduleSettings};
use crate::domain::model::{DoseEvent, FrequencyKind, MedicationRegimen};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Presentation-ready status of one regimen at one moment.
///
/// Recomputed from scratch on every call; nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MedicationStatus {
    Finished,
    Sporadic,
    Paused,
    NotificationsDisabled,
    /// 已超過排定時間且沒有對應的服藥紀錄
    Late { scheduled: NaiveDateTime },
    Upcoming { next_due: NaiveDateTime },
}

/// 依照固定順序判斷療程狀態，第一個符合的規則勝出
pub fn resolve_status(
    regimen: &MedicationRegimen,
    history: &[DoseEvent],
    now: NaiveDateTime,
    settings: &ScheduleSettings,
) -> MedicationStatus {
    if regimen.has_ended_before(now.date()) {
        return MedicationStatus::Finished;
    }
    if regimen.sporadic_use {
        return MedicationStatus::Sporadic;
    }
    if regimen.paused {
        return MedicationStatus::Paused;
    }
    if !regimen.notifications_enabled || regimen.times_of_day.is_empty() {
        return MedicationStatus::NotificationsDisabled;
    }

    if let Some(scheduled) = last_scheduled_before(regimen, now, settings) {
        if is_late(regimen, history, scheduled, now, settings) {
            tracing::debug!(regimen = %regimen.id, %scheduled, "dose overdue");
            return MedicationStatus::Late { scheduled };
        }
    }

    match compute_next_due(regimen, now, settings) {
        Some(next_due) => MedicationStatus::Upcoming { next_due },
        None => MedicationStatus::Finished,
    }
}

/// A regimen counts as missed today exactly when it resolves to `Late`.
pub fn missed_today(
    regimen: &MedicationRegimen,
    history: &[DoseEvent],
    now: NaiveDateTime,
    settings: &ScheduleSettings,
) -> bool {
    matches!(
        resolve_status(regimen, history, now, settings),
        MedicationStatus::Late { .. }
    )
}

fn is_late(
    regimen: &MedicationRegimen,
    history: &[DoseEvent],
    scheduled: NaiveDateTime,
    now: NaiveDateTime,
    settings: &ScheduleSettings,
) -> bool {
    if now - scheduled <= settings.late_threshold {
        return false;
    }

    let covered = history.iter().any(|event| {
        event.regimen_id == regimen.id
            && (event.timestamp - scheduled).abs() <= settings.late_match_window
    });
    if covered {
        return false;
    }

    !in_creation_grace(regimen, scheduled, now, settings.grace_policy)
}

/// 療程建立當天，早於建立時間的排定時間不算遲到
fn in_creation_grace(
    regimen: &MedicationRegimen,
    scheduled: NaiveDateTime,
    now: NaiveDateTime,
    policy: GracePolicy,
) -> bool {
    let applies = match policy {
        GracePolicy::AllKinds => true,
        GracePolicy::DailyOnly => regimen.frequency == FrequencyKind::Daily,
        GracePolicy::Disabled => false,
    };

    let creation_day = regimen.created_at.date();
    applies
        && now.date() == creation_day
        && scheduled.date() == creation_day
        && scheduled < regimen.created_at
}
