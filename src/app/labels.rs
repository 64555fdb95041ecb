//! Stable English label keys for the domain enums.
//!
//! Domain enums carry no display text; a UI or localisation layer maps these
//! keys to whatever it shows.

use crate::core::adherence::PeriodAdherence;
use crate::core::classifier::DoseTiming;
use crate::core::status::MedicationStatus;

pub fn status_label(status: &MedicationStatus) -> &'static str {
    match status {
        MedicationStatus::Finished => "finished",
        MedicationStatus::Sporadic => "as_needed",
        MedicationStatus::Paused => "paused",
        MedicationStatus::NotificationsDisabled => "reminders_off",
        MedicationStatus::Late { .. } => "late",
        MedicationStatus::Upcoming { .. } => "upcoming",
    }
}

pub fn timing_label(timing: DoseTiming) -> &'static str {
    match timing {
        DoseTiming::OnTime => "on_time",
        DoseTiming::TooEarly => "early",
        DoseTiming::TooLate => "late",
        DoseTiming::Extra => "extra",
        DoseTiming::Sporadic => "as_needed",
    }
}

pub fn adherence_label(adherence: PeriodAdherence) -> String {
    match adherence {
        PeriodAdherence::Percentage(value) => format!("{:.0}%", value),
        PeriodAdherence::NoData => "no_data".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adherence_label_rounds() {
        assert_eq!(adherence_label(PeriodAdherence::Percentage(66.666)), "67%");
        assert_eq!(adherence_label(PeriodAdherence::NoData), "no_data");
    }
}
