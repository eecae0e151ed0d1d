use anyhow::Result;
use argh::FromArgs;
use skycast_core::Config;
use skycast_weather::{PresentOutcome, WeatherApp};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

mod terminal;

use terminal::TerminalView;

#[derive(FromArgs)]
/// Current weather and a five-day forecast.
struct Args {
    /// city to look up; omit to use your saved or detected location
    #[argh(positional)]
    city: Option<String>,

    /// path to the configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// forget the last searched city before running
    #[argh(switch)]
    forget: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args: Args = argh::from_env();

    skycast_core::init()?;

    let (config, _) = Config::load_validated(args.config.as_deref())?;
    tracing::debug!("Config directory: {}", config.config_dir.display());

    let app = WeatherApp::new(&config, Arc::new(TerminalView))?;

    if args.forget {
        app.forget_last_city()?;
    }

    let outcome = match args.city.as_deref() {
        Some(city) => app.search(city).await,
        None => app.load().await,
    };

    Ok(match outcome {
        PresentOutcome::Rendered | PresentOutcome::Superseded => ExitCode::SUCCESS,
        PresentOutcome::Failed(e) => {
            tracing::debug!("Lookup failed: {}", e);
            ExitCode::FAILURE
        }
        PresentOutcome::Ignored => ExitCode::FAILURE,
    })
}
