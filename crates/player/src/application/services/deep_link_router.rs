//! Deep-link routing: external references to route intents.
//!
//! Parsing is a pure function of the URL. The router only decides *what* an
//! incoming reference means; dispatching it (direct navigation or a catalog
//! lookup) is the controller's business.

use std::str::FromStr;

use url::Url;
use waveline_domain::{AlbumId, ArtistId, PlaylistId, RouteIntent, VideoId};

const SHORT_LINK_HOST: &str = "youtu.be";

/// A reference handed over by the host (launch, share or new-intent).
///
/// Mirrors the host's intent payload: `data` is the URI proper, `extra_text`
/// the shared text that is tried when there is no URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingReference {
    pub action: Option<String>,
    pub data: Option<String>,
    pub extra_text: Option<String>,
}

impl IncomingReference {
    pub fn from_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::default()
        }
    }

    pub fn from_shared_text(text: impl Into<String>) -> Self {
        Self {
            extra_text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Take the URI out of this reference, clearing the field it came from.
    ///
    /// A second call on the same reference finds nothing to replay.
    pub fn take_url(&mut self) -> Option<Url> {
        let raw = match self.data.take() {
            Some(data) => data,
            None => self.extra_text.take()?,
        };
        match Url::parse(raw.trim()) {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring reference that is not a URL");
                None
            }
        }
    }
}

/// Turns incoming references into route intents.
#[derive(Debug, Clone)]
pub struct DeepLinkRouter {
    album_playlist_prefix: String,
}

impl DeepLinkRouter {
    pub fn new(album_playlist_prefix: impl Into<String>) -> Self {
        Self {
            album_playlist_prefix: album_playlist_prefix.into(),
        }
    }

    /// Consume `reference` and parse it. `None` means the reference is inert.
    pub fn route(&self, reference: &mut IncomingReference) -> Option<RouteIntent> {
        let url = reference.take_url()?;
        let intent = self.parse(&url);
        match &intent {
            Some(intent) => tracing::debug!(url = %url, intent = ?intent, "Routed reference"),
            None => tracing::debug!(url = %url, "Reference matched no route"),
        }
        intent
    }

    pub fn parse(&self, url: &Url) -> Option<RouteIntent> {
        parse_reference(url, &self.album_playlist_prefix)
    }
}

/// Map a URL onto a route intent, keyed on the first path segment.
pub fn parse_reference(url: &Url, album_playlist_prefix: &str) -> Option<RouteIntent> {
    let segments = path_segments(url);
    let first = segments.first().copied();

    match first {
        Some("playlist") => {
            let playlist_id = query_id::<PlaylistId>(url, "list")?;
            if playlist_id.is_album_surrogate(album_playlist_prefix) {
                Some(RouteIntent::ResolveAlbum { playlist_id })
            } else {
                Some(RouteIntent::OpenPlaylist { playlist_id })
            }
        }
        Some("browse") => {
            let album_id = last_segment_id::<AlbumId>(&segments)?;
            Some(RouteIntent::OpenAlbum { album_id })
        }
        Some("channel") | Some("c") => {
            let artist_id = last_segment_id::<ArtistId>(&segments)?;
            Some(RouteIntent::OpenArtist { artist_id })
        }
        Some("search") => {
            let query = query_param(url, "q")?;
            Some(RouteIntent::OpenSearch { query })
        }
        _ => {
            let video_id = if first == Some("watch") {
                query_id::<VideoId>(url, "v")
            } else if url.host_str() == Some(SHORT_LINK_HOST) {
                first.and_then(|id| VideoId::new(id).ok())
            } else {
                None
            };
            let playlist_id = query_id::<PlaylistId>(url, "list");

            match (video_id, playlist_id) {
                (None, None) => None,
                (video_id, playlist_id) => Some(RouteIntent::PlayResolved {
                    video_id,
                    playlist_id,
                }),
            }
        }
    }
}

/// Non-empty path segments, so trailing slashes do not produce empty ids.
fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn query_id<T: FromStr>(url: &Url, key: &str) -> Option<T> {
    query_param(url, key).and_then(|value| value.parse().ok())
}

fn last_segment_id<T: FromStr>(segments: &[&str]) -> Option<T> {
    segments.last().and_then(|id| id.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use waveline_domain::ALBUM_PLAYLIST_PREFIX;

    fn parse(raw: &str) -> Option<RouteIntent> {
        let url = Url::parse(raw).expect("valid url");
        parse_reference(&url, ALBUM_PLAYLIST_PREFIX)
    }

    fn video(id: &str) -> Option<VideoId> {
        Some(VideoId::new(id).expect("valid id"))
    }

    fn playlist(id: &str) -> PlaylistId {
        PlaylistId::new(id).expect("valid id")
    }

    #[test]
    fn test_album_surrogate_playlist_needs_lookup() {
        assert_eq!(
            parse("https://music.youtube.com/playlist?list=OLAK5uy_abc"),
            Some(RouteIntent::ResolveAlbum {
                playlist_id: playlist("OLAK5uy_abc")
            })
        );
    }

    #[test]
    fn test_regular_playlist_opens_directly() {
        assert_eq!(
            parse("https://music.youtube.com/playlist?list=PLfoo"),
            Some(RouteIntent::OpenPlaylist {
                playlist_id: playlist("PLfoo")
            })
        );
        assert_eq!(parse("https://music.youtube.com/playlist"), None);
    }

    #[test]
    fn test_browse_and_channel_use_last_segment() {
        assert_eq!(
            parse("https://music.youtube.com/browse/MPREb_123"),
            Some(RouteIntent::OpenAlbum {
                album_id: AlbumId::new("MPREb_123").expect("valid id")
            })
        );
        assert_eq!(
            parse("https://music.youtube.com/channel/UCxyz/"),
            Some(RouteIntent::OpenArtist {
                artist_id: ArtistId::new("UCxyz").expect("valid id")
            })
        );
        assert_eq!(
            parse("https://www.youtube.com/c/SomeBand"),
            Some(RouteIntent::OpenArtist {
                artist_id: ArtistId::new("SomeBand").expect("valid id")
            })
        );
    }

    #[test]
    fn test_search_link_decodes_query() {
        let intent = parse("https://music.youtube.com/search?q=daft%20punk");

        assert_eq!(
            intent,
            Some(RouteIntent::OpenSearch {
                query: "daft punk".into()
            })
        );
        let token = intent
            .and_then(|intent| intent.destination())
            .map(|destination| destination.token());
        assert_eq!(token.as_deref(), Some("search/daft+punk"));
    }

    #[test]
    fn test_watch_link_with_list_plays_resolved() {
        assert_eq!(
            parse("https://music.youtube.com/watch?v=V1&list=PLfoo"),
            Some(RouteIntent::PlayResolved {
                video_id: video("V1"),
                playlist_id: Some(playlist("PLfoo")),
            })
        );
    }

    #[test]
    fn test_short_link_uses_first_segment() {
        assert_eq!(
            parse("https://youtu.be/V2?si=share"),
            Some(RouteIntent::PlayResolved {
                video_id: video("V2"),
                playlist_id: None,
            })
        );
    }

    #[test]
    fn test_list_only_link_plays_playlist() {
        assert_eq!(
            parse("https://music.youtube.com/watch?list=PLbar"),
            Some(RouteIntent::PlayResolved {
                video_id: None,
                playlist_id: Some(playlist("PLbar")),
            })
        );
    }

    #[test]
    fn test_unrecognised_links_are_inert() {
        assert_eq!(parse("https://music.youtube.com/"), None);
        assert_eq!(parse("https://example.com/some/page"), None);
        assert_eq!(parse("https://music.youtube.com/watch?v="), None);
    }

    #[test]
    fn test_parse_is_pure() {
        let url = Url::parse("https://music.youtube.com/watch?v=V1").expect("valid url");
        assert_eq!(
            parse_reference(&url, ALBUM_PLAYLIST_PREFIX),
            parse_reference(&url, ALBUM_PLAYLIST_PREFIX)
        );
    }

    #[test]
    fn test_custom_album_prefix() {
        let router = DeepLinkRouter::new("ALB_");
        let url = Url::parse("https://music.youtube.com/playlist?list=ALB_1").expect("valid url");

        assert_eq!(
            router.parse(&url),
            Some(RouteIntent::ResolveAlbum {
                playlist_id: playlist("ALB_1")
            })
        );
    }

    #[test]
    fn test_route_clears_source_field() {
        let router = DeepLinkRouter::new(ALBUM_PLAYLIST_PREFIX);
        let mut reference = IncomingReference::from_data("https://youtu.be/V1");

        assert!(router.route(&mut reference).is_some());
        assert_eq!(reference.data, None);
        assert_eq!(router.route(&mut reference), None);
    }

    #[test]
    fn test_route_falls_back_to_shared_text() {
        let router = DeepLinkRouter::new(ALBUM_PLAYLIST_PREFIX);
        let mut reference =
            IncomingReference::from_shared_text(" https://music.youtube.com/watch?v=V9 ");

        assert_eq!(
            router.route(&mut reference),
            Some(RouteIntent::PlayResolved {
                video_id: video("V9"),
                playlist_id: None,
            })
        );
        assert_eq!(reference.extra_text, None);
    }

    #[test]
    fn test_shared_plain_text_is_inert() {
        let router = DeepLinkRouter::new(ALBUM_PLAYLIST_PREFIX);
        let mut reference = IncomingReference::from_shared_text("listen to this!");

        assert_eq!(router.route(&mut reference), None);
        assert_eq!(reference.extra_text, None);
    }
}
