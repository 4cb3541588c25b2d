//! Preferences Port - persisted user settings read by the controller

use waveline_domain::NavigationTab;

/// Port for persisted preferences
///
/// Values are read at the moment they are needed, never cached.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PreferencesPort: Send + Sync {
    /// Stop the engine when the host task is cleared while playing.
    fn stop_engine_on_task_clear(&self) -> bool;

    /// Tab opened on launch when no shortcut selects one.
    fn default_open_tab(&self) -> NavigationTab;
}
