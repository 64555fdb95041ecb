use crate::core::adherence::{day_adherence, period_adherence, DayAdherence, PeriodAdherence};
use crate::core::classifier::{classify_day, DoseTiming};
use crate::core::rotation::{compute_sites, SiteSuggestion};
use crate::core::schedule::upcoming_doses;
use crate::core::settings::ScheduleSettings;
use crate::core::status::{resolve_status, MedicationStatus};
use crate::domain::model::MedicationRegimen;
use crate::domain::ports::{Clock, SnapshotProvider};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Number of upcoming reminders listed per regimen by default.
pub const DEFAULT_UPCOMING_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoseReport {
    pub event_id: String,
    pub timestamp: NaiveDateTime,
    pub timing: DoseTiming,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimenReport {
    pub regimen_id: String,
    pub status: MedicationStatus,
    pub missed_today: bool,
    pub today: DayAdherence,
    pub sites: SiteSuggestion,
    pub upcoming: Vec<NaiveDateTime>,
    pub doses_today: Vec<DoseReport>,
}

/// 照護者總覽：同一個 `now` 下所有療程的狀態
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareReport {
    pub generated_at: NaiveDateTime,
    pub overall_today: PeriodAdherence,
    pub regimens: Vec<RegimenReport>,
}

impl CareReport {
    pub fn missed_count(&self) -> usize {
        self.regimens.iter().filter(|r| r.missed_today).count()
    }

    pub fn regimen(&self, regimen_id: &str) -> Option<&RegimenReport> {
        self.regimens.iter().find(|r| r.regimen_id == regimen_id)
    }
}

pub struct CareEngine<C: Clock> {
    clock: C,
    settings: ScheduleSettings,
    upcoming_count: usize,
}

impl<C: Clock> CareEngine<C> {
    pub fn new(clock: C) -> Self {
        Self::with_settings(clock, ScheduleSettings::default())
    }

    pub fn with_settings(clock: C, settings: ScheduleSettings) -> Self {
        Self {
            clock,
            settings,
            upcoming_count: DEFAULT_UPCOMING_COUNT,
        }
    }

    pub fn with_upcoming_count(mut self, upcoming_count: usize) -> Self {
        self.upcoming_count = upcoming_count;
        self
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    /// Reads the clock exactly once and evaluates the whole snapshot against it.
    pub fn evaluate<P: SnapshotProvider>(&self, provider: &P) -> CareReport {
        let now = self.clock.now();
        self.evaluate_at(provider, now)
    }

    pub fn evaluate_at<P: SnapshotProvider>(&self, provider: &P, now: NaiveDateTime) -> CareReport {
        let regimens = provider.regimens();
        let history = provider.dose_events();
        let today = now.date();

        tracing::debug!(
            "Evaluating {} regimens and {} dose events at {}",
            regimens.len(),
            history.len(),
            now
        );

        let reports: Vec<RegimenReport> = regimens
            .iter()
            .map(|regimen| self.regimen_report(regimen, provider, now))
            .collect();

        let report = CareReport {
            generated_at: now,
            overall_today: period_adherence(regimens, history, today, today),
            regimens: reports,
        };

        if report.missed_count() > 0 {
            tracing::info!("{} regimen(s) overdue at {}", report.missed_count(), now);
        }
        report
    }

    /// 任意日期區間的整體服藥率
    pub fn period_report<P: SnapshotProvider>(
        &self,
        provider: &P,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PeriodAdherence {
        if start > end {
            tracing::warn!("Period start {} is after end {}, no doses expected", start, end);
        }
        period_adherence(provider.regimens(), provider.dose_events(), start, end)
    }

    fn regimen_report<P: SnapshotProvider>(
        &self,
        regimen: &MedicationRegimen,
        provider: &P,
        now: NaiveDateTime,
    ) -> RegimenReport {
        let history = provider.dose_events();
        let today = now.date();
        let status = resolve_status(regimen, history, now, &self.settings);

        let doses_today = classify_day(regimen, history, today, &self.settings)
            .into_iter()
            .map(|(event, timing)| DoseReport {
                event_id: event.id.clone(),
                timestamp: event.timestamp,
                timing,
            })
            .collect();

        let upcoming = match status {
            MedicationStatus::Late { .. } | MedicationStatus::Upcoming { .. } => {
                upcoming_doses(regimen, now, self.upcoming_count, &self.settings)
            }
            _ => Vec::new(),
        };

        tracing::debug!(regimen = %regimen.id, ?status, "Regimen evaluated");

        RegimenReport {
            regimen_id: regimen.id.clone(),
            status,
            missed_today: matches!(status, MedicationStatus::Late { .. }),
            today: day_adherence(regimen, history, today),
            sites: compute_sites(regimen, history),
            upcoming,
            doses_today,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::GracePolicy;
    use crate::domain::model::DoseEvent;
    use crate::domain::ports::FixedClock;
    use chrono::NaiveTime;

    struct InMemorySnapshot {
        regimens: Vec<MedicationRegimen>,
        doses: Vec<DoseEvent>,
    }

    impl SnapshotProvider for InMemorySnapshot {
        fn regimens(&self) -> &[MedicationRegimen] {
            &self.regimens
        }

        fn dose_events(&self) -> &[DoseEvent] {
            &self.doses
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn snapshot() -> InMemorySnapshot {
        InMemorySnapshot {
            regimens: vec![
                MedicationRegimen::daily("metformin", date(1), &[time(8, 0), time(20, 0)]),
                MedicationRegimen::daily("insulin", date(1), &[time(7, 0)])
                    .with_sites(&["left arm", "right arm"]),
                MedicationRegimen::daily("ibuprofen", date(1), &[]).with_sporadic_use(true),
            ],
            doses: vec![
                DoseEvent::taken("d1", "insulin", date(5).and_time(time(7, 5))).with_site("left arm"),
                DoseEvent::taken("d2", "ibuprofen", date(5).and_time(time(9, 0))),
            ],
        }
    }

    #[test]
    fn test_evaluate_uses_clock_once_for_all_regimens() {
        let now = date(5).and_time(time(9, 0));
        let engine = CareEngine::new(FixedClock(now));
        let report = engine.evaluate(&snapshot());

        assert_eq!(report.generated_at, now);
        assert_eq!(report.regimens.len(), 3);
        assert_eq!(report.missed_count(), 1);

        let metformin = report.regimen("metformin").unwrap();
        assert_eq!(
            metformin.status,
            MedicationStatus::Late {
                scheduled: date(5).and_time(time(8, 0))
            }
        );
        assert!(metformin.missed_today);
        assert_eq!(metformin.upcoming.len(), DEFAULT_UPCOMING_COUNT);

        let insulin = report.regimen("insulin").unwrap();
        assert_eq!(
            insulin.status,
            MedicationStatus::Upcoming {
                next_due: date(6).and_time(time(7, 0))
            }
        );
        assert_eq!(insulin.doses_today[0].timing, DoseTiming::OnTime);
        assert_eq!(insulin.sites.suggested_next.as_deref(), Some("right arm"));

        let ibuprofen = report.regimen("ibuprofen").unwrap();
        assert_eq!(ibuprofen.status, MedicationStatus::Sporadic);
        assert!(ibuprofen.upcoming.is_empty());
        assert_eq!(ibuprofen.doses_today[0].timing, DoseTiming::Sporadic);

        // metformin 0/2 + insulin 1/1
        match report.overall_today {
            PeriodAdherence::Percentage(value) => assert!((value - 100.0 / 3.0).abs() < 1e-9),
            PeriodAdherence::NoData => panic!("expected a percentage"),
        }
    }

    #[test]
    fn test_upcoming_count_and_settings_are_honoured() {
        let settings = ScheduleSettings::default().with_grace_policy(GracePolicy::Disabled);
        let engine = CareEngine::with_settings(FixedClock(date(5).and_time(time(9, 0))), settings)
            .with_upcoming_count(1);
        assert_eq!(engine.settings().grace_policy, GracePolicy::Disabled);

        let report = engine.evaluate(&snapshot());
        assert_eq!(report.regimen("metformin").unwrap().upcoming.len(), 1);
    }

    #[test]
    fn test_period_report_reversed_range_has_no_data() {
        let engine = CareEngine::new(FixedClock(date(5).and_time(time(9, 0))));
        assert_eq!(
            engine.period_report(&snapshot(), date(6), date(5)),
            PeriodAdherence::NoData
        );
    }
}
