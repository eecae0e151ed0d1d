use skycast_core::{AppError, Config};
use std::sync::Arc;

use crate::presenter::{PresentOutcome, WeatherPresenter};
use crate::provider::WeatherProvider;
use crate::resolver::LocationResolver;
use crate::store::LastCityStore;
use crate::types::Notice;
use crate::view::WeatherView;

const EMPTY_SEARCH_PROMPT: &str = "Enter a city name to search.";

/// Wires location resolution, presentation and the last-city store.
pub struct WeatherApp {
    resolver: LocationResolver,
    presenter: WeatherPresenter,
    store: LastCityStore,
}

impl WeatherApp {
    pub fn new(config: &Config, view: Arc<dyn WeatherView>) -> Result<Self, AppError> {
        let store = LastCityStore::new(&config.config_dir);
        let resolver = LocationResolver::from_config(config, store.clone())?;
        let provider = WeatherProvider::new(&config.weather)?;

        if !provider.has_api_key() {
            tracing::warn!("No weather API key configured; lookups will fail");
        }

        Ok(Self::from_parts(
            resolver,
            WeatherPresenter::new(provider, view),
            store,
        ))
    }

    pub fn from_parts(
        resolver: LocationResolver,
        presenter: WeatherPresenter,
        store: LastCityStore,
    ) -> Self {
        Self {
            resolver,
            presenter,
            store,
        }
    }

    pub fn presenter(&self) -> &WeatherPresenter {
        &self.presenter
    }

    /// Explicit search. The city is remembered when the lookup succeeds.
    pub async fn search(&self, input: &str) -> PresentOutcome {
        let Some(resolved) = LocationResolver::explicit(input) else {
            self.presenter
                .show_notice(Notice::search_prompt(EMPTY_SEARCH_PROMPT));
            return PresentOutcome::Ignored;
        };

        let outcome = self
            .presenter
            .present(&resolved.query, resolved.display_name.as_deref())
            .await;

        if outcome.is_rendered() {
            let city = resolved.query.token();
            if let Err(e) = self.store.save(&city) {
                tracing::warn!("Failed to save last city: {}", e);
            }
        }

        outcome
    }

    /// Startup lookup through the fallback chain.
    pub async fn load(&self) -> PresentOutcome {
        match self.resolver.resolve().await {
            Ok(resolved) => {
                self.presenter
                    .present(&resolved.query, resolved.display_name.as_deref())
                    .await
            }
            Err(e) => {
                let error = AppError::Location(e);
                self.presenter.show_notice(Notice::error(error.user_message()));
                PresentOutcome::Failed(error)
            }
        }
    }

    /// Forget the saved city.
    pub fn forget_last_city(&self) -> Result<(), AppError> {
        self.store.clear()?;
        tracing::info!("Cleared last city");
        Ok(())
    }
}
