use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of media a track slot carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSource {
    Camera,
    Microphone,
    ScreenShare,
    ScreenShareAudio,
    Unknown,
}

impl TrackSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackSource::Camera => "camera",
            TrackSource::Microphone => "microphone",
            TrackSource::ScreenShare => "screen_share",
            TrackSource::ScreenShareAudio => "screen_share_audio",
            TrackSource::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical slot identity: one participant's track of one source.
///
/// A placeholder and the live track that later replaces it share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackKey {
    pub participant_identity: String,
    pub source: TrackSource,
}

impl TrackKey {
    pub fn new(participant_identity: impl Into<String>, source: TrackSource) -> Self {
        Self {
            participant_identity: participant_identity.into(),
            source,
        }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.participant_identity, self.source)
    }
}

/// Anything the grid can place in a tile.
pub trait TrackLike: Clone {
    fn participant_identity(&self) -> &str;

    fn source(&self) -> TrackSource;

    /// True when no live track backs this slot yet.
    fn is_placeholder(&self) -> bool;

    fn key(&self) -> TrackKey {
        TrackKey::new(self.participant_identity(), self.source())
    }

    /// Identity of the content currently filling the slot. A new value under
    /// the same key means the tile must be redrawn.
    fn revision(&self) -> Option<&str> {
        None
    }
}

/// Participant state captured alongside a track, used for the default sort.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticipantActivity {
    pub is_local: bool,
    pub is_speaking: bool,
    pub audio_level: f32,
    pub last_spoke_at_ms: Option<u64>,
    pub joined_at_ms: Option<u64>,
}

/// A track reference as delivered by the participant observation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackReference {
    pub participant_identity: String,
    pub source: TrackSource,
    /// Server id of the published track; `None` marks a placeholder.
    pub track_sid: Option<String>,
    #[serde(default)]
    pub activity: ParticipantActivity,
}

impl TrackReference {
    pub fn placeholder(participant_identity: impl Into<String>, source: TrackSource) -> Self {
        Self {
            participant_identity: participant_identity.into(),
            source,
            track_sid: None,
            activity: ParticipantActivity::default(),
        }
    }

    pub fn published(
        participant_identity: impl Into<String>,
        source: TrackSource,
        track_sid: impl Into<String>,
    ) -> Self {
        Self {
            track_sid: Some(track_sid.into()),
            ..Self::placeholder(participant_identity, source)
        }
    }

    pub fn with_activity(mut self, activity: ParticipantActivity) -> Self {
        self.activity = activity;
        self
    }

    pub fn local(mut self) -> Self {
        self.activity.is_local = true;
        self
    }

    pub fn speaking(mut self, audio_level: f32) -> Self {
        self.activity.is_speaking = true;
        self.activity.audio_level = audio_level;
        self
    }
}

impl TrackLike for TrackReference {
    fn participant_identity(&self) -> &str {
        &self.participant_identity
    }

    fn source(&self) -> TrackSource {
        self.source
    }

    fn is_placeholder(&self) -> bool {
        self.track_sid.is_none()
    }

    fn revision(&self) -> Option<&str> {
        self.track_sid.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_survives_placeholder_to_live_transition() {
        let placeholder = TrackReference::placeholder("alice", TrackSource::Camera);
        let live = TrackReference::published("alice", TrackSource::Camera, "TR_1");
        assert!(placeholder.is_placeholder());
        assert!(!live.is_placeholder());
        assert_eq!(placeholder.key(), live.key());
    }

    #[test]
    fn revision_follows_published_track() {
        let placeholder = TrackReference::placeholder("alice", TrackSource::Camera);
        let live = TrackReference::published("alice", TrackSource::Camera, "TR_1");
        assert_eq!(placeholder.revision(), None);
        assert_eq!(live.revision(), Some("TR_1"));
    }

    #[test]
    fn key_distinguishes_sources() {
        let camera = TrackReference::placeholder("alice", TrackSource::Camera);
        let screen = TrackReference::placeholder("alice", TrackSource::ScreenShare);
        assert_ne!(camera.key(), screen.key());
    }

    #[test]
    fn key_display_is_identity_and_source() {
        let key = TrackKey::new("bob", TrackSource::ScreenShare);
        assert_eq!(key.to_string(), "bob:screen_share");
    }

    #[test]
    fn reference_deserializes_without_activity() {
        let json = r#"{"participant_identity":"carol","source":"camera","track_sid":"TR_9"}"#;
        let track: TrackReference = serde_json::from_str(json).unwrap();
        assert_eq!(track.source, TrackSource::Camera);
        assert!(!track.is_placeholder());
        assert_eq!(track.activity, ParticipantActivity::default());
    }
}
