use crate::core::calendar::{dates_between, is_medication_day};
use crate::domain::model::{DoseEvent, MedicationRegimen};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayAdherence {
    pub taken: u32,
    pub expected: u32,
    pub overdose: bool,
}

/// 期間服藥率；沒有任何應服劑量時為 `NoData`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PeriodAdherence {
    Percentage(f64),
    NoData,
}

/// Expected dose count over the inclusive range `[start, end]`.
pub fn expected_doses(regimen: &MedicationRegimen, start: NaiveDate, end: NaiveDate) -> u32 {
    if regimen.sporadic_use || regimen.paused || regimen.times_of_day.is_empty() {
        return 0;
    }

    let per_day = u32::try_from(regimen.times_of_day.len()).unwrap_or(u32::MAX);
    dates_between(start, end)
        .filter(|date| is_medication_day(regimen, *date))
        .fold(0u32, |total, _| total.saturating_add(per_day))
}

/// Count of `Taken` events for the regimen on `day`.
pub fn taken_on(regimen: &MedicationRegimen, history: &[DoseEvent], day: NaiveDate) -> u32 {
    taken_between(regimen, history, day, day)
}

pub fn day_adherence(
    regimen: &MedicationRegimen,
    history: &[DoseEvent],
    day: NaiveDate,
) -> DayAdherence {
    let taken = taken_on(regimen, history, day);
    let expected = expected_doses(regimen, day, day);
    DayAdherence {
        taken,
        expected,
        overdose: expected > 0 && taken > expected,
    }
}

/// 多個療程在期間內的整體服藥率 (0..=100)。
///
/// Only regimens with at least one expected dose in the range contribute
/// taken doses; sporadic and paused regimens are left out entirely.
pub fn period_adherence(
    regimens: &[MedicationRegimen],
    history: &[DoseEvent],
    start: NaiveDate,
    end: NaiveDate,
) -> PeriodAdherence {
    let (taken, expected) = regimens
        .iter()
        .map(|regimen| (regimen, expected_doses(regimen, start, end)))
        .filter(|(_, expected)| *expected > 0)
        .fold((0u64, 0u64), |(taken, expected), (regimen, regimen_expected)| {
            (
                taken + u64::from(taken_between(regimen, history, start, end)),
                expected + u64::from(regimen_expected),
            )
        });

    if expected == 0 {
        return PeriodAdherence::NoData;
    }

    let percentage = (taken as f64 / expected as f64 * 100.0).clamp(0.0, 100.0);
    PeriodAdherence::Percentage(percentage)
}

fn taken_between(
    regimen: &MedicationRegimen,
    history: &[DoseEvent],
    start: NaiveDate,
    end: NaiveDate,
) -> u32 {
    history
        .iter()
        .filter(|event| {
            event.regimen_id == regimen.id
                && event.is_taken()
                && (start..=end).contains(&event.date())
        })
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        date(2024, 1, d).and_time(time(h, m))
    }

    fn twice_daily(id: &str) -> MedicationRegimen {
        MedicationRegimen::daily(id, date(2024, 1, 1), &[time(8, 0), time(20, 0)])
    }

    #[test]
    fn test_expected_doses_per_kind() {
        let day = date(2024, 1, 5);
        assert_eq!(expected_doses(&twice_daily("r"), day, day), 2);

        let weekly = MedicationRegimen::weekly("w", date(2024, 1, 1), &[1, 3], &[time(9, 0)]);
        // 2024-01-01..=2024-01-14 has two Mondays and two Wednesdays
        assert_eq!(expected_doses(&weekly, date(2024, 1, 1), date(2024, 1, 14)), 4);

        let interval = MedicationRegimen::every_n_days("i", date(2024, 1, 1), 3, &[time(9, 0)]);
        assert_eq!(expected_doses(&interval, date(2024, 1, 1), date(2024, 1, 10)), 4);
    }

    #[test]
    fn test_expected_doses_zero_cases() {
        let day = date(2024, 1, 5);
        assert_eq!(expected_doses(&twice_daily("r").with_paused(true), day, day), 0);
        assert_eq!(expected_doses(&twice_daily("r").with_sporadic_use(true), day, day), 0);
        assert_eq!(
            expected_doses(&MedicationRegimen::daily("r", date(2024, 1, 1), &[]), day, day),
            0
        );
        assert_eq!(expected_doses(&twice_daily("r"), date(2024, 1, 6), day), 0);
        let zero_interval = MedicationRegimen::every_n_days("i", date(2024, 1, 1), 0, &[time(9, 0)]);
        assert_eq!(expected_doses(&zero_interval, date(2024, 1, 1), date(2024, 1, 31)), 0);
    }

    #[test]
    fn test_expected_doses_saturates_on_huge_ranges() {
        // one slot per second of the day, over two centuries
        let every_second: Vec<NaiveTime> = (0..86_400)
            .map(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap())
            .collect();
        let regimen = MedicationRegimen::daily("r", date(2000, 1, 1), &every_second);

        assert_eq!(
            expected_doses(&regimen, date(2000, 1, 1), date(2199, 12, 31)),
            u32::MAX
        );
    }

    #[test]
    fn test_day_adherence_counts_only_taken() {
        let history = vec![
            DoseEvent::taken("1", "r", at(5, 8, 0)),
            DoseEvent::skipped("2", "r", at(5, 20, 0)),
            DoseEvent::taken("3", "other", at(5, 8, 0)),
            DoseEvent::taken("4", "r", at(4, 8, 0)),
        ];

        let result = day_adherence(&twice_daily("r"), &history, date(2024, 1, 5));
        assert_eq!(
            result,
            DayAdherence {
                taken: 1,
                expected: 2,
                overdose: false
            }
        );
    }

    #[test]
    fn test_overdose_requires_expected_doses() {
        let history = vec![
            DoseEvent::taken("1", "r", at(5, 8, 0)),
            DoseEvent::taken("2", "r", at(5, 12, 0)),
            DoseEvent::taken("3", "r", at(5, 20, 0)),
        ];
        assert!(day_adherence(&twice_daily("r"), &history, date(2024, 1, 5)).overdose);

        let sporadic = twice_daily("r").with_sporadic_use(true);
        assert!(!day_adherence(&sporadic, &history, date(2024, 1, 5)).overdose);
    }

    #[test]
    fn test_period_adherence_percentage_and_clamp() {
        let regimens = vec![twice_daily("a"), twice_daily("b")];
        let history = vec![
            DoseEvent::taken("1", "a", at(5, 8, 0)),
            DoseEvent::taken("2", "a", at(5, 20, 0)),
            DoseEvent::taken("3", "b", at(5, 8, 0)),
        ];
        assert_eq!(
            period_adherence(&regimens, &history, date(2024, 1, 5), date(2024, 1, 5)),
            PeriodAdherence::Percentage(75.0)
        );

        let overdosed: Vec<DoseEvent> = (0..6)
            .map(|i| DoseEvent::taken(&i.to_string(), "a", at(5, 8, i)))
            .collect();
        assert_eq!(
            period_adherence(&regimens[..1], &overdosed, date(2024, 1, 5), date(2024, 1, 5)),
            PeriodAdherence::Percentage(100.0)
        );
    }

    #[test]
    fn test_period_adherence_no_data() {
        let regimens = vec![twice_daily("a").with_sporadic_use(true)];
        let history = vec![DoseEvent::taken("1", "a", at(5, 8, 0))];
        assert_eq!(
            period_adherence(&regimens, &history, date(2024, 1, 5), date(2024, 1, 5)),
            PeriodAdherence::NoData
        );
        assert_eq!(
            period_adherence(&[], &history, date(2024, 1, 5), date(2024, 1, 5)),
            PeriodAdherence::NoData
        );
    }
}
