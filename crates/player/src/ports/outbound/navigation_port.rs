//! Navigation Port - opens screens in the host's navigation graph

use waveline_domain::Destination;

/// Port for direct navigation
///
/// Implemented by the host once its navigation graph exists. A new instance is
/// registered every time the host recreates its navigation surface.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait NavigationPort: Send + Sync {
    /// Navigate to the given destination
    fn navigate(&self, destination: Destination) -> anyhow::Result<()>;
}
