//! Voice search episodes.
//!
//! An episode ducks the volume for as long as it lives. Finishing it with a
//! transcript yields the search to open; dropping it unfinished (cancelled
//! recognizer, host torn down mid-episode) still restores the volume.

use waveline_domain::Destination;

use super::volume_duck::VolumeDuckController;

/// Guard for one voice interaction.
#[must_use = "dropping the episode restores the volume immediately"]
pub struct VoiceEpisode {
    duck: VolumeDuckController,
    finished: bool,
}

impl VoiceEpisode {
    pub(crate) fn start(duck: VolumeDuckController) -> Self {
        duck.duck();
        tracing::debug!("Voice episode started");
        Self {
            duck,
            finished: false,
        }
    }

    /// End the episode. A non-blank transcript becomes a search destination.
    pub fn finish(mut self, transcript: Option<&str>) -> Option<Destination> {
        self.finished = true;
        self.duck.restore();

        let query = transcript.map(str::trim).filter(|q| !q.is_empty())?;
        tracing::debug!(query, "Voice episode produced a search");
        Some(Destination::Search(query.to_string()))
    }
}

impl Drop for VoiceEpisode {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!("Voice episode abandoned, restoring volume");
            self.duck.restore();
        }
    }
}
