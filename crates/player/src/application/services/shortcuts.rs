//! Launcher shortcut actions.
//!
//! Each shortcut opens the tab it is named after: SEARCH opens Search and
//! LIBRARY opens Library. Earlier builds of the app had the two crossed; the
//! crossing is deliberately not reproduced.

use waveline_domain::NavigationTab;

use crate::ports::outbound::PreferencesPort;

pub const ACTION_SEARCH: &str = "app.waveline.action.SEARCH";
pub const ACTION_LIBRARY: &str = "app.waveline.action.LIBRARY";

/// Launcher shortcut the host was started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Search,
    Library,
}

impl ShortcutAction {
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            ACTION_SEARCH => Some(Self::Search),
            ACTION_LIBRARY => Some(Self::Library),
            _ => None,
        }
    }

    pub fn as_action(&self) -> &'static str {
        match self {
            Self::Search => ACTION_SEARCH,
            Self::Library => ACTION_LIBRARY,
        }
    }

    pub fn tab(&self) -> NavigationTab {
        match self {
            Self::Search => NavigationTab::Search,
            Self::Library => NavigationTab::Library,
        }
    }
}

/// Tab to open on launch: the shortcut's tab, else the persisted default.
pub fn initial_tab(action: Option<&str>, preferences: &dyn PreferencesPort) -> NavigationTab {
    match action.and_then(ShortcutAction::from_action) {
        Some(shortcut) => shortcut.tab(),
        None => preferences.default_open_tab(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::MockPreferencesPort;

    #[test]
    fn test_shortcut_selects_its_own_tab() {
        let mut prefs = MockPreferencesPort::new();
        prefs.expect_default_open_tab().never();

        assert_eq!(initial_tab(Some(ACTION_SEARCH), &prefs), NavigationTab::Search);
        assert_eq!(initial_tab(Some(ACTION_LIBRARY), &prefs), NavigationTab::Library);
    }

    #[test]
    fn test_no_shortcut_falls_back_to_preference() {
        let mut prefs = MockPreferencesPort::new();
        prefs
            .expect_default_open_tab()
            .times(2)
            .return_const(NavigationTab::Library);

        assert_eq!(initial_tab(None, &prefs), NavigationTab::Library);
        assert_eq!(
            initial_tab(Some("android.intent.action.VIEW"), &prefs),
            NavigationTab::Library
        );
    }

    #[test]
    fn test_action_strings_round_trip() {
        for shortcut in [ShortcutAction::Search, ShortcutAction::Library] {
            assert_eq!(ShortcutAction::from_action(shortcut.as_action()), Some(shortcut));
        }
    }
}
