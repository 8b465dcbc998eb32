//! Default ordering for track references.
//!
//! The local camera leads, screen shares follow, then every other track by
//! participant activity, with unknown sources last. Ties keep input order.

use std::cmp::Ordering;

use super::core::{TrackLike, TrackReference, TrackSource};

/// Compare two track references by the default grid ordering.
pub fn compare_track_references(a: &TrackReference, b: &TrackReference) -> Ordering {
    group_rank(a)
        .cmp(&group_rank(b))
        .then_with(|| compare_activity(a, b))
}

/// Sort in place using [`compare_track_references`]. The sort is stable.
pub fn sort_track_references(tracks: &mut [TrackReference]) {
    tracks.sort_by(compare_track_references);
}

fn group_rank(track: &TrackReference) -> u8 {
    match track.source {
        TrackSource::Camera if track.activity.is_local => 0,
        TrackSource::ScreenShare | TrackSource::ScreenShareAudio => 1,
        TrackSource::Unknown => 3,
        _ => 2,
    }
}

fn compare_activity(a: &TrackReference, b: &TrackReference) -> Ordering {
    let (aa, ba) = (&a.activity, &b.activity);

    // speakers first, loudest first
    match (aa.is_speaking, ba.is_speaking) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (true, true) => {
            let by_level = ba
                .audio_level
                .partial_cmp(&aa.audio_level)
                .unwrap_or(Ordering::Equal);
            if by_level != Ordering::Equal {
                return by_level;
            }
        }
        (false, false) => {}
    }

    descending_some_first(aa.last_spoke_at_ms, ba.last_spoke_at_ms)
        .then_with(|| a.is_placeholder().cmp(&b.is_placeholder()))
        .then_with(|| ascending_some_first(aa.joined_at_ms, ba.joined_at_ms))
}

fn descending_some_first(a: Option<u64>, b: Option<u64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn ascending_some_first(a: Option<u64>, b: Option<u64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::ParticipantActivity;

    fn identities(tracks: &[TrackReference]) -> Vec<&str> {
        tracks
            .iter()
            .map(|t| t.participant_identity.as_str())
            .collect()
    }

    #[test]
    fn local_camera_then_screen_share_then_others() {
        let mut tracks = vec![
            TrackReference::published("remote", TrackSource::Camera, "TR_r"),
            TrackReference::published("sharer", TrackSource::ScreenShare, "TR_s"),
            TrackReference::placeholder("me", TrackSource::Camera).local(),
            TrackReference::published("odd", TrackSource::Unknown, "TR_u"),
        ];
        sort_track_references(&mut tracks);
        assert_eq!(identities(&tracks), vec!["me", "sharer", "remote", "odd"]);
    }

    #[test]
    fn louder_speakers_lead() {
        let mut tracks = vec![
            TrackReference::published("quiet", TrackSource::Camera, "TR_1"),
            TrackReference::published("soft", TrackSource::Camera, "TR_2").speaking(0.2),
            TrackReference::published("loud", TrackSource::Camera, "TR_3").speaking(0.9),
        ];
        sort_track_references(&mut tracks);
        assert_eq!(identities(&tracks), vec!["loud", "soft", "quiet"]);
    }

    #[test]
    fn recency_then_video_then_join_time() {
        let recent = ParticipantActivity {
            last_spoke_at_ms: Some(2_000),
            ..Default::default()
        };
        let older = ParticipantActivity {
            last_spoke_at_ms: Some(1_000),
            ..Default::default()
        };
        let early = ParticipantActivity {
            joined_at_ms: Some(10),
            ..Default::default()
        };
        let late = ParticipantActivity {
            joined_at_ms: Some(20),
            ..Default::default()
        };
        let mut tracks = vec![
            TrackReference::published("late", TrackSource::Camera, "TR_l").with_activity(late),
            TrackReference::placeholder("early", TrackSource::Camera).with_activity(early),
            TrackReference::published("older", TrackSource::Camera, "TR_o").with_activity(older),
            TrackReference::published("recent", TrackSource::Camera, "TR_n").with_activity(recent),
        ];
        sort_track_references(&mut tracks);
        assert_eq!(
            identities(&tracks),
            vec!["recent", "older", "late", "early"]
        );
    }

    #[test]
    fn equal_tracks_keep_input_order() {
        let mut tracks = vec![
            TrackReference::published("b", TrackSource::Camera, "TR_b"),
            TrackReference::published("a", TrackSource::Camera, "TR_a"),
        ];
        sort_track_references(&mut tracks);
        assert_eq!(identities(&tracks), vec!["b", "a"]);
    }
}
