use anyhow::Result;
use care_dose::app::report::{render_json, render_text};
use care_dose::utils::validation::Validate;
use care_dose::{
    CareEngine, DoseTiming, FixedClock, MedicationStatus, PeriodAdherence, SettingsConfig,
    SnapshotFile,
};
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

const SNAPSHOT: &str = r#"
[[regimens]]
id = "metformin"
frequency = "daily"
times_of_day = ["08:00:00", "20:00:00"]
start_date = "2024-01-01"
continuous_use = true
created_at = "2024-01-01T07:00:00"

[[regimens]]
id = "insulin"
frequency = "interval_days"
interval_days = 2
times_of_day = ["09:00:00"]
start_date = "2024-01-01"
duration_days = 30
application_sites = ["left abdomen", "right abdomen", "left thigh"]
created_at = "2024-01-01T07:00:00"

[[regimens]]
id = "paracetamol"
frequency = "daily"
start_date = "2024-01-01"
sporadic_use = true
created_at = "2024-01-01T07:00:00"

[[regimens]]
id = "vitamin-d"
frequency = "weekly"
week_days = [7]
times_of_day = ["10:00:00"]
start_date = "2024-01-01"
paused = true
created_at = "2024-01-01T07:00:00"

[[doses]]
id = "d1"
regimen_id = "insulin"
timestamp = "2024-01-03T09:05:00"
status = "taken"
application_site = "left abdomen"

[[doses]]
id = "d2"
regimen_id = "insulin"
timestamp = "2024-01-05T08:40:00"
status = "taken"
application_site = "right abdomen"

[[doses]]
id = "d3"
regimen_id = "insulin"
timestamp = "2024-01-05T09:20:00"
status = "taken"

[[doses]]
id = "d4"
regimen_id = "paracetamol"
timestamp = "2024-01-05T11:00:00"
status = "taken"

[[doses]]
id = "d5"
regimen_id = "metformin"
timestamp = "2024-01-04T20:10:00"
status = "taken"
"#;

fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn load_snapshot(dir: &TempDir) -> Result<SnapshotFile> {
    let path = dir.path().join("snapshot.toml");
    std::fs::write(&path, SNAPSHOT)?;
    let snapshot = SnapshotFile::from_file(&path)?;
    snapshot.validate()?;
    Ok(snapshot)
}

#[test]
fn test_report_from_snapshot_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let snapshot = load_snapshot(&temp_dir)?;

    let engine = CareEngine::new(FixedClock(at(5, 12, 0)));
    let report = engine.evaluate(&snapshot);

    let metformin = report.regimen("metformin").unwrap();
    assert_eq!(
        metformin.status,
        MedicationStatus::Late {
            scheduled: at(5, 8, 0)
        }
    );

    let insulin = report.regimen("insulin").unwrap();
    assert_eq!(
        insulin.status,
        MedicationStatus::Upcoming {
            next_due: at(7, 9, 0)
        }
    );
    assert!(!insulin.missed_today);
    assert!(insulin.today.overdose);
    let timings: Vec<DoseTiming> = insulin.doses_today.iter().map(|d| d.timing).collect();
    // 08:40 is 20 minutes off, 09:20 is 20 minutes off: equal distance keeps both
    assert_eq!(timings, vec![DoseTiming::OnTime, DoseTiming::OnTime]);
    assert_eq!(insulin.sites.last_used.as_deref(), Some("right abdomen"));
    assert_eq!(insulin.sites.suggested_next.as_deref(), Some("left thigh"));

    assert_eq!(
        report.regimen("paracetamol").unwrap().status,
        MedicationStatus::Sporadic
    );
    assert_eq!(
        report.regimen("vitamin-d").unwrap().status,
        MedicationStatus::Paused
    );

    // metformin 0/2, insulin 2/1 -> 2/3
    match report.overall_today {
        PeriodAdherence::Percentage(value) => assert!((value - 200.0 / 3.0).abs() < 1e-9),
        PeriodAdherence::NoData => panic!("expected a percentage"),
    }

    Ok(())
}

#[test]
fn test_period_report_and_rendering() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let snapshot = load_snapshot(&temp_dir)?;

    let settings_path = temp_dir.path().join("settings.toml");
    std::fs::write(&settings_path, "[windows]\nlate_threshold_minutes = 300\n")?;
    let settings = SettingsConfig::from_file(&settings_path)?;
    settings.validate()?;

    let engine = CareEngine::with_settings(FixedClock(at(5, 12, 0)), settings.to_schedule_settings()?);
    let report = engine.evaluate(&snapshot);
    assert_eq!(report.missed_count(), 0);

    let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    // metformin 1/10, insulin 3/3 (Jan 1, 3, 5)
    match engine.period_report(&snapshot, from, to) {
        PeriodAdherence::Percentage(value) => assert!((value - 4.0 / 13.0 * 100.0).abs() < 1e-9),
        PeriodAdherence::NoData => panic!("expected a percentage"),
    }

    let lines = render_text(&report, None);
    assert!(lines[0].starts_with("Report at 2024-01-05 12:00"));
    assert!(lines.iter().any(|line| line.starts_with("- paracetamol [as_needed]")));

    let json: serde_json::Value = serde_json::from_str(&render_json(&report, None)?)?;
    assert_eq!(json["report"]["regimens"].as_array().map(Vec::len), Some(4));

    Ok(())
}
