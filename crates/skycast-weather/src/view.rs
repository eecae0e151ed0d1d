use crate::types::DisplayState;

/// Output surface for the presenter.
///
/// `render` receives the full state after every change; implementations
/// redraw from it and keep no state of their own.
pub trait WeatherView: Send + Sync {
    fn render(&self, state: &DisplayState);
}
