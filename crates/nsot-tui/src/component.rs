//! Container trait shared by every screen.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use nsot_core::AppState;

use crate::action::Action;

/// A container screen bound to the store.
///
/// Containers own only view-local state (selection, scroll). Domain data
/// is read from the `AppState` snapshot passed into every call, through
/// `nsot_core::store::selectors`.
pub trait Component: Send {
    /// Handle a key not consumed by the app. Return an action to dispatch.
    fn handle_key_event(&mut self, _key: KeyEvent, _state: &AppState) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Called after each new store snapshot (clamp selections etc.).
    fn on_state(&mut self, _state: &AppState) {}

    /// Advance animations.
    fn on_tick(&mut self) {}

    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);

    /// Short key hints for the status bar.
    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }
}
