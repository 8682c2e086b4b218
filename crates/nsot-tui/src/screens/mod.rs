//! Container screens, one per route.

mod attribute_detail;
mod change_detail;
mod device_detail;
mod home;
mod list;
mod network_detail;
mod not_found;

use std::collections::HashMap;
use std::fmt;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::ThrobberState;

use nsot_core::store::selectors;
use nsot_core::{AppState, Attribute, Change, Device, Network, Resource, Route};

use crate::component::Component;
use crate::theme;
use crate::views;
use crate::widgets::loading;

pub use list::ListScreen;

/// Which container renders a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Home,
    Devices,
    Device,
    Networks,
    Network,
    Attributes,
    Attribute,
    Changes,
    Change,
    NotFound,
}

impl ScreenId {
    /// Tab bar order; number keys 1-5 jump to these.
    pub const TABS: [ScreenId; 5] = [
        Self::Home,
        Self::Devices,
        Self::Networks,
        Self::Attributes,
        Self::Changes,
    ];

    pub fn for_route(route: &Route) -> Self {
        match route {
            Route::Home => Self::Home,
            Route::Devices => Self::Devices,
            Route::Device(_) => Self::Device,
            Route::Networks => Self::Networks,
            Route::Network(_) => Self::Network,
            Route::Attributes => Self::Attributes,
            Route::Attribute(_) => Self::Attribute,
            Route::Changes => Self::Changes,
            Route::Change(_) => Self::Change,
            Route::NotFound(_) => Self::NotFound,
        }
    }

    /// Tab a screen belongs to (detail screens highlight their list).
    pub fn tab(self) -> Self {
        match self {
            Self::Device => Self::Devices,
            Self::Network => Self::Networks,
            Self::Attribute => Self::Attributes,
            Self::Change => Self::Changes,
            Self::NotFound => Self::Home,
            other => other,
        }
    }

    pub fn tab_route(n: u8) -> Option<Route> {
        match n {
            1 => Some(Route::Home),
            2 => Some(Route::Devices),
            3 => Some(Route::Networks),
            4 => Some(Route::Attributes),
            5 => Some(Route::Changes),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Devices => "Devices",
            Self::Device => "Device",
            Self::Networks => "Networks",
            Self::Network => "Network",
            Self::Attributes => "Attributes",
            Self::Attribute => "Attribute",
            Self::Changes => "Changes",
            Self::Change => "Change",
            Self::NotFound => "Not found",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn create_screens(page_size: u64) -> HashMap<ScreenId, Box<dyn Component>> {
    let mut screens: HashMap<ScreenId, Box<dyn Component>> = HashMap::new();
    screens.insert(ScreenId::Home, Box::new(home::HomeScreen::new()));
    screens.insert(ScreenId::Devices, Box::new(ListScreen::<Device>::new(page_size)));
    screens.insert(ScreenId::Device, Box::new(device_detail::DeviceDetailScreen::new()));
    screens.insert(ScreenId::Networks, Box::new(ListScreen::<Network>::new(page_size)));
    screens.insert(ScreenId::Network, Box::new(network_detail::NetworkDetailScreen::new()));
    screens.insert(ScreenId::Attributes, Box::new(ListScreen::<Attribute>::new(page_size)));
    screens.insert(
        ScreenId::Attribute,
        Box::new(attribute_detail::AttributeDetailScreen::new()),
    );
    screens.insert(ScreenId::Changes, Box::new(ListScreen::<Change>::new(page_size)));
    screens.insert(ScreenId::Change, Box::new(change_detail::ChangeDetailScreen::new()));
    screens.insert(ScreenId::NotFound, Box::new(not_found::NotFoundScreen));
    screens
}

fn detail_block(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(theme::title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
}

/// Shared gate for detail containers: loading, failed, or the entity
/// handed to `body` once the selected item is the routed id.
fn render_entity<T: Resource>(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    throbber: &ThrobberState,
    body: impl FnOnce(&mut Frame, Rect, &T),
) {
    let Some(id) = state.route().entity_id() else {
        return;
    };
    let block = detail_block(format!(" {} {id} ", T::KIND));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let slice = selectors::slice::<T>(state);
    if let Some(entity) = selectors::item::<T>(state, id) {
        body(frame, inner, entity);
    } else if slice.is_fetching_item {
        loading::render_loading(frame, inner, "Loading...", throbber);
    } else if let Some(error) = &slice.error {
        frame.render_widget(Paragraph::new(views::error_line(error)), inner);
    } else {
        frame.render_widget(
            Paragraph::new(views::notice(format!("{} {id} not loaded", T::KIND), theme::muted())),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use nsot_core::EntityId;

    use super::*;

    #[test]
    fn every_route_has_a_screen() {
        let screens = create_screens(25);
        for route in [
            Route::Home,
            Route::Devices,
            Route::Device(EntityId::new(1)),
            Route::Networks,
            Route::Network(EntityId::new(1)),
            Route::Attributes,
            Route::Attribute(EntityId::new(1)),
            Route::Changes,
            Route::Change(EntityId::new(1)),
            Route::NotFound("/nope".into()),
        ] {
            assert!(screens.contains_key(&ScreenId::for_route(&route)), "{route}");
        }
    }

    #[test]
    fn detail_screens_highlight_their_list_tab() {
        assert_eq!(ScreenId::Device.tab(), ScreenId::Devices);
        assert_eq!(ScreenId::NotFound.tab(), ScreenId::Home);
        assert_eq!(ScreenId::tab_route(3), Some(Route::Networks));
        assert_eq!(ScreenId::tab_route(9), None);
    }
}
