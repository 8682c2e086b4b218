// ── Client-side routing ──
//
// Path table:
//
//   /                      Home
//   /devices               Devices          /devices/:id      Device
//   /networks              Networks         /networks/:id     Network
//   /attributes            Attributes       /attributes/:id   Attribute
//   /changes               Changes          /changes/:id      Change
//   anything else          NotFound
//
// Trailing slashes and query strings are ignored.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::model::EntityId;
use crate::store::ResourceKind;

/// Back-stack depth kept by [`Location`].
pub const HISTORY_LIMIT: usize = 32;

/// A resolved console route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Home,
    Devices,
    Device(EntityId),
    Networks,
    Network(EntityId),
    Attributes,
    Attribute(EntityId),
    Changes,
    Change(EntityId),
    /// Catch-all, keeping the path that failed to match.
    NotFound(String),
}

impl Route {
    /// Resolve a path against the route table. Never fails: unmatched
    /// paths (including non-numeric ids) become [`Route::NotFound`].
    pub fn parse(raw: &str) -> Self {
        let path = raw.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            [collection] => match ResourceKind::from_segment(collection) {
                Some(kind) if kind.is_routable() => Self::list(kind),
                _ => Self::NotFound(raw.to_owned()),
            },
            [collection, id] => {
                let kind = ResourceKind::from_segment(collection).filter(|k| k.is_routable());
                match (kind, id.parse::<EntityId>()) {
                    (Some(kind), Ok(id)) => Self::detail(kind, id),
                    _ => Self::NotFound(raw.to_owned()),
                }
            }
            _ => Self::NotFound(raw.to_owned()),
        }
    }

    /// Index route for a resource. Interfaces have no list screen of
    /// their own and map to devices.
    pub fn list(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Device | ResourceKind::Interface => Self::Devices,
            ResourceKind::Network => Self::Networks,
            ResourceKind::Attribute => Self::Attributes,
            ResourceKind::Change => Self::Changes,
        }
    }

    /// Detail route for a resource. Interfaces map to their list.
    pub fn detail(kind: ResourceKind, id: EntityId) -> Self {
        match kind {
            ResourceKind::Device => Self::Device(id),
            ResourceKind::Network => Self::Network(id),
            ResourceKind::Attribute => Self::Attribute(id),
            ResourceKind::Change => Self::Change(id),
            ResourceKind::Interface => Self::Devices,
        }
    }

    /// Canonical path, without trailing slash.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Devices => "/devices".into(),
            Self::Device(id) => format!("/devices/{id}"),
            Self::Networks => "/networks".into(),
            Self::Network(id) => format!("/networks/{id}"),
            Self::Attributes => "/attributes".into(),
            Self::Attribute(id) => format!("/attributes/{id}"),
            Self::Changes => "/changes".into(),
            Self::Change(id) => format!("/changes/{id}"),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Resource this route renders, if any.
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Self::Devices | Self::Device(_) => Some(ResourceKind::Device),
            Self::Networks | Self::Network(_) => Some(ResourceKind::Network),
            Self::Attributes | Self::Attribute(_) => Some(ResourceKind::Attribute),
            Self::Changes | Self::Change(_) => Some(ResourceKind::Change),
            Self::Home | Self::NotFound(_) => None,
        }
    }

    /// Id extracted from a parameterized route.
    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            Self::Device(id) | Self::Network(id) | Self::Attribute(id) | Self::Change(id) => {
                Some(*id)
            }
            _ => None,
        }
    }

    pub fn is_detail(&self) -> bool {
        self.entity_id().is_some()
    }

    /// The list route a detail route belongs to.
    pub fn parent(&self) -> Self {
        match self.kind() {
            Some(kind) if self.is_detail() => Self::list(kind),
            _ => Self::Home,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

// ── Location ────────────────────────────────────────────────────────

/// Router slice of the store: the current route plus a bounded
/// back-stack, most recent last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub current: Route,
    history: VecDeque<Route>,
}

impl Location {
    pub fn new(current: Route) -> Self {
        Self {
            current,
            history: VecDeque::new(),
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &Route> {
        self.history.iter()
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Move to `route`, pushing the current one. Returns `None` when
    /// already there.
    pub(crate) fn pushed(&self, route: &Route) -> Option<Self> {
        if *route == self.current {
            return None;
        }
        let mut history = self.history.clone();
        if history.len() == HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(self.current.clone());
        Some(Self {
            current: route.clone(),
            history,
        })
    }

    /// Pop the back-stack. Returns `None` when it is empty.
    pub(crate) fn popped(&self) -> Option<Self> {
        let mut history = self.history.clone();
        let current = history.pop_back()?;
        Some(Self { current, history })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const fn id(raw: u64) -> EntityId {
        EntityId::new(raw)
    }

    #[test]
    fn resolves_table() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/devices"), Route::Devices);
        assert_eq!(Route::parse("/devices/3"), Route::Device(id(3)));
        assert_eq!(Route::parse("/networks/12"), Route::Network(id(12)));
        assert_eq!(Route::parse("/attributes"), Route::Attributes);
        assert_eq!(Route::parse("/changes/9"), Route::Change(id(9)));
    }

    #[test]
    fn trailing_slash_and_query_ignored() {
        assert_eq!(Route::parse("/devices/"), Route::Devices);
        assert_eq!(Route::parse("/devices/3/"), Route::Device(id(3)));
        assert_eq!(Route::parse("/networks?limit=10"), Route::Networks);
    }

    #[test]
    fn unknown_paths_fall_through() {
        assert_eq!(Route::parse("/sites"), Route::NotFound("/sites".into()));
        assert_eq!(Route::parse("/devices/abc"), Route::NotFound("/devices/abc".into()));
        assert_eq!(Route::parse("/devices/3/edit"), Route::NotFound("/devices/3/edit".into()));
        assert_eq!(Route::parse("/interfaces/2"), Route::NotFound("/interfaces/2".into()));
    }

    #[test]
    fn path_round_trips_through_parse() {
        for route in [
            Route::Home,
            Route::Devices,
            Route::Device(id(1)),
            Route::Networks,
            Route::Network(id(2)),
            Route::Attributes,
            Route::Attribute(id(3)),
            Route::Changes,
            Route::Change(id(4)),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn detail_parent_is_its_list() {
        assert_eq!(Route::Device(id(5)).parent(), Route::Devices);
        assert_eq!(Route::Devices.parent(), Route::Home);
    }

    #[test]
    fn history_is_bounded() {
        let mut location = Location::default();
        for n in 0..50 {
            location = location.pushed(&Route::Device(id(n))).unwrap();
        }
        assert_eq!(location.history().count(), HISTORY_LIMIT);
    }

    #[test]
    fn go_back_restores_previous() {
        let location = Location::default().pushed(&Route::Devices).unwrap();
        let location = location.pushed(&Route::Device(id(1))).unwrap();
        let back = location.popped().unwrap();
        assert_eq!(back.current, Route::Devices);
        assert!(back.popped().unwrap().popped().is_none());
    }

    #[test]
    fn navigating_to_current_is_a_no_op() {
        assert!(Location::new(Route::Devices).pushed(&Route::Devices).is_none());
    }
}
