use blake3::{Hash, Hasher};

use crate::pagination::PageState;
use crate::track::TrackLike;

/// Digest of the tiles on a page plus the navigation state around them.
///
/// Each tile contributes its slot key, placeholder flag and revision, so a
/// placeholder turning live or a republished track counts as a change even
/// though the slot key is the same. Strings are length-prefixed.
pub fn fingerprint_page<T: TrackLike>(tiles: &[T], state: &PageState) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(&(tiles.len() as u64).to_le_bytes());
    for tile in tiles {
        hash_str(&mut hasher, tile.participant_identity());
        hash_str(&mut hasher, tile.source().as_str());
        hasher.update(&[u8::from(tile.is_placeholder())]);
        match tile.revision() {
            Some(revision) => {
                hasher.update(&[1]);
                hash_str(&mut hasher, revision);
            }
            None => {
                hasher.update(&[0]);
            }
        }
    }
    for value in [
        state.current_page,
        state.total_page_count,
        state.items_per_page,
        state.total_items,
    ] {
        hasher.update(&(value as u64).to_le_bytes());
    }
    hasher.finalize()
}

fn hash_str(hasher: &mut Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

/// Tracks the last published page so observers only hear about real changes.
#[derive(Debug, Default)]
pub struct PageRegistry {
    fingerprint: Option<Hash>,
    dirty: bool,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current page; returns true (and marks dirty) when it differs
    /// from the last one seen.
    pub fn sync_page<T: TrackLike>(&mut self, tiles: &[T], state: &PageState) -> bool {
        let next = fingerprint_page(tiles, state);
        if self.fingerprint.map(|h| h != next).unwrap_or(true) {
            self.fingerprint = Some(next);
            self.dirty = true;
            return true;
        }
        false
    }

    /// Clear and return the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn has_dirty(&self) -> bool {
        self.dirty
    }

    pub fn fingerprint(&self) -> Option<Hash> {
        self.fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Pagination;
    use crate::track::{TrackReference, TrackSource};

    fn state_for(tiles: &[TrackReference]) -> PageState {
        Pagination::configure(4, tiles, None).page_state()
    }

    #[test]
    fn first_sync_is_dirty() {
        let tiles = vec![TrackReference::published("a", TrackSource::Camera, "TR_a")];
        let mut registry = PageRegistry::new();
        assert!(registry.sync_page(&tiles, &state_for(&tiles)));
        assert!(registry.take_dirty());
        assert!(!registry.has_dirty());
    }

    #[test]
    fn identical_page_is_not_dirty() {
        let tiles = vec![TrackReference::published("a", TrackSource::Camera, "TR_a")];
        let state = state_for(&tiles);
        let mut registry = PageRegistry::new();
        registry.sync_page(&tiles, &state);
        registry.take_dirty();

        assert!(!registry.sync_page(&tiles, &state));
        assert!(!registry.take_dirty());
    }

    #[test]
    fn placeholder_going_live_is_a_change() {
        let placeholder = vec![TrackReference::placeholder("a", TrackSource::Camera)];
        let live = vec![TrackReference::published("a", TrackSource::Camera, "TR_a")];
        let state = state_for(&live);
        let mut registry = PageRegistry::new();
        registry.sync_page(&placeholder, &state);
        registry.take_dirty();

        assert!(registry.sync_page(&live, &state));
    }

    #[test]
    fn republished_track_is_a_change() {
        let old = vec![TrackReference::published("a", TrackSource::Camera, "TR_old")];
        let new = vec![TrackReference::published("a", TrackSource::Camera, "TR_new")];
        let state = state_for(&old);
        let mut registry = PageRegistry::new();
        registry.sync_page(&old, &state);
        registry.take_dirty();

        assert!(registry.sync_page(&new, &state));
        assert!(registry.take_dirty());
    }

    #[test]
    fn nul_in_identity_does_not_collide() {
        let joined = vec![TrackReference::placeholder("a\0camera", TrackSource::Camera)];
        let split = vec![TrackReference::placeholder("a", TrackSource::Camera)];
        let state = state_for(&joined);
        assert_ne!(fingerprint_page(&joined, &state), fingerprint_page(&split, &state));
    }

    #[test]
    fn page_navigation_is_a_change() {
        let tiles = vec![TrackReference::published("a", TrackSource::Camera, "TR_a")];
        let state = state_for(&tiles);
        let moved = PageState {
            current_page: 2,
            ..state
        };
        assert_ne!(fingerprint_page(&tiles, &state), fingerprint_page(&tiles, &moved));
    }
}
