use care_dose::app::report::{render_json, render_text, PeriodSummary};
use care_dose::utils::error::{CareError, ErrorSeverity};
use care_dose::utils::{logger, validation::Validate};
use care_dose::{CareEngine, CliConfig, FixedClock, SettingsConfig, SnapshotFile, SystemClock};
use care_dose::{Clock, SnapshotProvider};
use clap::Parser;

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting care-dose CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config) {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ care-dose failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

fn run(config: &CliConfig) -> Result<(), CareError> {
    config.validate()?;

    let settings_config = match &config.settings {
        Some(path) => {
            tracing::info!("📁 Loading settings from: {}", path);
            SettingsConfig::from_file(path)?
        }
        None => SettingsConfig::default(),
    };
    settings_config.validate()?;

    tracing::info!("📁 Loading snapshot from: {}", config.snapshot);
    let snapshot = SnapshotFile::from_file(&config.snapshot)?;
    snapshot.validate()?;
    tracing::info!(
        "✅ Loaded {} regimens and {} dose events",
        snapshot.regimens().len(),
        snapshot.dose_events().len()
    );

    // 只讀一次時鐘
    let now = config.now.unwrap_or_else(|| SystemClock.now());

    let mut engine =
        CareEngine::with_settings(FixedClock(now), settings_config.to_schedule_settings()?);
    if let Some(count) = settings_config.upcoming_count {
        engine = engine.with_upcoming_count(count);
    }

    let report = engine.evaluate(&snapshot);
    let period = config.period().map(|(from, to)| PeriodSummary {
        from,
        to,
        adherence: engine.period_report(&snapshot, from, to),
    });

    if config.json {
        println!("{}", render_json(&report, period.as_ref())?);
    } else {
        for line in render_text(&report, period.as_ref()) {
            println!("{}", line);
        }
    }

    Ok(())
}
