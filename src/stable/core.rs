use std::collections::{HashMap, HashSet};

use crate::error::{ListRole, StabilizationError};
use crate::track::{TrackKey, TrackLike};

/// Previous ordering remembered between updates.
///
/// `last_items_on_page` is `None` until the first computation, which therefore
/// always counts as a layout change.
#[derive(Debug, Clone)]
pub struct ReorderMemory<T> {
    last_items_on_page: Option<usize>,
    last_ordered: Vec<T>,
}

impl<T> Default for ReorderMemory<T> {
    fn default() -> Self {
        Self {
            last_items_on_page: None,
            last_ordered: Vec::new(),
        }
    }
}

impl<T> ReorderMemory<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory as left by a computation at `items_on_page` that produced `ordered`.
    pub fn with_ordering(items_on_page: usize, ordered: Vec<T>) -> Self {
        Self {
            last_items_on_page: Some(items_on_page),
            last_ordered: ordered,
        }
    }

    pub fn last_items_on_page(&self) -> Option<usize> {
        self.last_items_on_page
    }

    pub fn last_ordered(&self) -> &[T] {
        &self.last_ordered
    }

    pub fn is_layout_change(&self, items_on_page: usize) -> bool {
        self.last_items_on_page != Some(items_on_page)
    }

    pub fn remember(&mut self, items_on_page: usize, ordered: Vec<T>) {
        self.last_items_on_page = Some(items_on_page);
        self.last_ordered = ordered;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StableOptions {
    /// Swap items that belong in the first window onto it, displacing window
    /// items that do not. Off keeps every surviving position.
    pub promote_visible: bool,
}

/// Stabilize `next` against `memory` with default options.
pub fn stabilize<T: TrackLike>(
    memory: &ReorderMemory<T>,
    next: &[T],
    max_items_on_page: usize,
) -> Result<Vec<T>, StabilizationError> {
    stabilize_with(memory, next, max_items_on_page, StableOptions::default())
}

/// Reorder `next` so items keep the slots they held in `memory`.
///
/// `next` is checked for malformed items first, on every path. A changed
/// `max_items_on_page` then returns `next` untouched. Otherwise surviving
/// items keep their remembered slot, vacated slots take newly added items in
/// `next` order, leftovers are appended, and any remaining holes are filled
/// from the tail so that no item below `next.len()` moves. The result always
/// has `next.len()` items.
pub fn stabilize_with<T: TrackLike>(
    memory: &ReorderMemory<T>,
    next: &[T],
    max_items_on_page: usize,
    options: StableOptions,
) -> Result<Vec<T>, StabilizationError> {
    let ranks = rank_keys(next)?;
    if memory.is_layout_change(max_items_on_page) {
        return Ok(next.to_vec());
    }

    let mut placed = vec![false; next.len()];
    let mut seen: HashSet<TrackKey> = HashSet::with_capacity(memory.last_ordered.len());
    let mut slots: Vec<Option<usize>> =
        Vec::with_capacity(memory.last_ordered.len().max(next.len()));

    for (position, item) in memory.last_ordered.iter().enumerate() {
        let key = checked_key(item, ListRole::Previous, position)?;
        let rank = ranks.get(&key).copied();
        if !seen.insert(key.clone()) {
            return Err(StabilizationError::DuplicateKey {
                list: ListRole::Previous,
                key,
            });
        }
        if let Some(rank) = rank {
            placed[rank] = true;
        }
        slots.push(rank);
    }

    let added: Vec<usize> = (0..next.len()).filter(|&rank| !placed[rank]).collect();
    let mut added = added.into_iter();
    for slot in slots.iter_mut().filter(|slot| slot.is_none()) {
        match added.next() {
            Some(rank) => *slot = Some(rank),
            None => break,
        }
    }
    slots.extend(added.map(Some));

    close_gaps(&mut slots, next.len());

    let mut order: Vec<usize> = slots.into_iter().flatten().collect();
    if options.promote_visible {
        promote_visible(&mut order, max_items_on_page);
    }

    Ok(order.into_iter().map(|rank| next[rank].clone()).collect())
}

fn checked_key<T: TrackLike>(
    item: &T,
    list: ListRole,
    position: usize,
) -> Result<TrackKey, StabilizationError> {
    if item.participant_identity().is_empty() {
        return Err(StabilizationError::MissingIdentity { list, position });
    }
    Ok(item.key())
}

fn rank_keys<T: TrackLike>(next: &[T]) -> Result<HashMap<TrackKey, usize>, StabilizationError> {
    let mut ranks = HashMap::with_capacity(next.len());
    for (rank, item) in next.iter().enumerate() {
        let key = checked_key(item, ListRole::Next, rank)?;
        if ranks.contains_key(&key) {
            return Err(StabilizationError::DuplicateKey {
                list: ListRole::Next,
                key,
            });
        }
        ranks.insert(key, rank);
    }
    Ok(ranks)
}

// Every filled slot at or past `len` pairs with exactly one hole before `len`.
fn close_gaps(slots: &mut Vec<Option<usize>>, len: usize) {
    if slots.len() <= len {
        return;
    }
    let mut overflow: Vec<usize> = slots.split_off(len).into_iter().flatten().collect();
    overflow.sort_unstable();
    let mut overflow = overflow.into_iter();
    for slot in slots.iter_mut().filter(|slot| slot.is_none()) {
        *slot = overflow.next();
    }
}

fn promote_visible(order: &mut [usize], max_items_on_page: usize) {
    let window = max_items_on_page.min(order.len());
    let outgoing: Vec<usize> = (0..window).filter(|&pos| order[pos] >= window).collect();
    let mut incoming: Vec<usize> = (window..order.len())
        .filter(|&pos| order[pos] < window)
        .collect();
    incoming.sort_by_key(|&pos| order[pos]);
    for (out, inc) in outgoing.into_iter().zip(incoming) {
        order.swap(out, inc);
    }
}
