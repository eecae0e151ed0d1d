//! Fetches weather for a location and drives the view.

use parking_lot::Mutex;
use skycast_core::{AppError, WeatherError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::provider::WeatherProvider;
use crate::render::build_card;
use crate::types::{DisplayState, LocationQuery, Notice};
use crate::view::WeatherView;

const BLOCKED_PROMPT: &str =
    "Couldn't reach the weather service automatically. Search for a city to try again.";

/// Result of one `present` call.
#[derive(Debug)]
pub enum PresentOutcome {
    /// Weather panel shown
    Rendered,
    /// Message panel shown
    Failed(AppError),
    /// Blank search input; a prompt was shown and nothing was fetched
    Ignored,
    /// A newer request started before this one finished; the view was left alone
    Superseded,
}

impl PresentOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered)
    }
}

pub struct WeatherPresenter {
    provider: WeatherProvider,
    view: Arc<dyn WeatherView>,
    state: Mutex<DisplayState>,
    generation: AtomicU64,
    attempts: AtomicU64,
}

impl WeatherPresenter {
    pub fn new(provider: WeatherProvider, view: Arc<dyn WeatherView>) -> Self {
        Self {
            provider,
            view,
            state: Mutex::new(DisplayState::default()),
            generation: AtomicU64::new(0),
            attempts: AtomicU64::new(0),
        }
    }

    /// Snapshot of what the view currently shows.
    pub fn state(&self) -> DisplayState {
        self.state.lock().clone()
    }

    /// Fetch and show weather for `query`.
    ///
    /// On return the loading indicator is cleared and exactly one of the
    /// weather and message panels is visible, unless a newer call has taken
    /// over the view.
    pub async fn present(
        &self,
        query: &LocationQuery,
        display_name: Option<&str>,
    ) -> PresentOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let first_attempt = self.attempts.fetch_add(1, Ordering::SeqCst) == 0;

        let label = display_name
            .map(str::to_string)
            .unwrap_or_else(|| query.to_string());
        self.update(|state| {
            state.notice = None;
            state.card = None;
            state.loading = Some(format!("Fetching weather for {}...", label));
        });

        let result = self.provider.fetch(query).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                location = %query.token(),
                "Discarding response superseded by a newer request"
            );
            return PresentOutcome::Superseded;
        }

        match result {
            Ok(snapshot) => {
                let card = build_card(&snapshot, display_name);
                tracing::info!(
                    city = %card.city,
                    temperature = ?card.temperature,
                    "Weather updated"
                );
                self.update(|state| {
                    state.loading = None;
                    state.notice = None;
                    state.card = Some(card);
                });
                PresentOutcome::Rendered
            }
            Err(error) => {
                let notice = notice_for(&error, first_attempt);
                tracing::error!("Failed to fetch weather for {}: {}", query.token(), error);
                self.update(|state| {
                    state.loading = None;
                    state.card = None;
                    state.notice = Some(notice);
                });
                PresentOutcome::Failed(error.into())
            }
        }
    }

    /// Replace whatever is shown with a message.
    ///
    /// Counts as a new request, so an in-flight fetch will not overwrite it.
    pub fn show_notice(&self, notice: Notice) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.update(|state| {
            state.loading = None;
            state.card = None;
            state.notice = Some(notice);
        });
    }

    fn update(&self, f: impl FnOnce(&mut DisplayState)) {
        let mut state = self.state.lock();
        f(&mut state);
        self.view.render(&state);
    }
}

/// Message panel content for a failed fetch.
///
/// A connection failure on the very first attempt is most likely a blocker or
/// an offline start, so it gets a softer prompt instead of an error.
fn notice_for(error: &WeatherError, first_attempt: bool) -> Notice {
    match error {
        WeatherError::Transport(net) if first_attempt && net.is_connection_failure() => {
            Notice::search_prompt(BLOCKED_PROMPT)
        }
        other => Notice::error(other.user_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::NetworkError;

    #[test]
    fn test_first_connection_failure_is_soft() {
        let err = WeatherError::Transport(NetworkError::ConnectionFailed("refused".into()));
        let notice = notice_for(&err, true);
        assert_eq!(notice.kind, crate::types::NoticeKind::SearchPrompt);

        let notice = notice_for(&err, false);
        assert_eq!(notice.kind, crate::types::NoticeKind::Error);
        assert!(notice.message.contains("Unable to connect"));
    }

    #[test]
    fn test_first_timeout_is_not_soft() {
        let err = WeatherError::Transport(NetworkError::Timeout);
        assert_eq!(notice_for(&err, true).kind, crate::types::NoticeKind::Error);
    }

    #[test]
    fn test_rejection_notice_forwards_text() {
        let err = WeatherError::Rejected {
            status: 401,
            body: "Invalid API key".into(),
        };
        assert!(notice_for(&err, true).message.contains("Invalid API key"));
    }
}
