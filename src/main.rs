use anyhow::{Context, Result};
use std::process::ExitCode;
use std::time::Duration;
use strompris::charger::EaseeClient;
use strompris::job::Job;
use strompris::lock::RunLock;
use strompris::logging::init_logging;
use strompris::onboarding::Onboarding;
use strompris::spot::HvaKosterStrommenClient;
use strompris::{Config, Settings, SettingsStore};
use tracing::{error, info};

fn main() -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run()) {
        Ok(status) => {
            println!("{}", status);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("Price update failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<String> {
    let config = Config::load().context("failed to load configuration")?;
    config.validate()?;
    init_logging(&config.logging)?;
    info!("Strompris {} starting", env!("APP_VERSION"));

    let store = SettingsStore::new(&config.settings_path);
    let _lock = if config.lock.enabled {
        Some(RunLock::acquire(
            &RunLock::path_for(store.path()),
            Duration::from_secs(config.lock.stale_after_seconds),
        )?)
    } else {
        None
    };

    let mut settings = load_or_onboard(&store)?;

    let tz = config.tz()?;
    let now = chrono::Utc::now().with_timezone(&tz);

    let source = HvaKosterStrommenClient::from_config(&config)?;
    let api = EaseeClient::from_config(&config)?;
    let job = Job {
        config: &config,
        store: &store,
        source: &source,
        api: &api,
    };

    let report = job.run_once(&mut settings, &now).await?;
    Ok(report.status_line())
}

fn load_or_onboard(store: &SettingsStore) -> Result<Settings> {
    match store.load() {
        Ok(settings) => Ok(settings),
        Err(e) if e.is_settings_not_found() => {
            info!("No settings at {}, starting setup", store.path().display());
            let stdin = std::io::stdin();
            let settings = Onboarding::new(stdin.lock(), std::io::stdout()).run()?;
            store.save(&settings)?;
            Ok(settings)
        }
        Err(e) => Err(e).context("failed to load settings"),
    }
}
