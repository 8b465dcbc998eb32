use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::geometry::Size;

/// Declarative grid shape valid for a range of tile counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDefinition {
    pub columns: u32,
    pub rows: u32,
    pub min_tiles: usize,
    pub max_tiles: usize,
    /// Smallest container width (px) the layout should be used at.
    #[serde(default)]
    pub min_width: u32,
    /// Smallest container height (px) the layout should be used at.
    #[serde(default)]
    pub min_height: u32,
}

impl LayoutDefinition {
    pub const fn new(columns: u32, rows: u32, min_tiles: usize, max_tiles: usize) -> Self {
        Self {
            columns,
            rows,
            min_tiles,
            max_tiles,
            min_width: 0,
            min_height: 0,
        }
    }

    pub const fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = min_width;
        self
    }

    pub const fn with_min_height(mut self, min_height: u32) -> Self {
        self.min_height = min_height;
        self
    }

    pub fn accepts(&self, tile_count: usize) -> bool {
        self.min_tiles <= tile_count && tile_count <= self.max_tiles
    }

    pub fn fits(&self, container: Size) -> bool {
        container.width >= self.min_width as f32 && container.height >= self.min_height as f32
    }

    /// Check the definition is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(GridError::InvalidConfiguration(format!(
                "layout {}x{} must have at least one column and one row",
                self.columns, self.rows
            )));
        }
        if self.min_tiles > self.max_tiles {
            return Err(GridError::InvalidConfiguration(format!(
                "layout {}x{} has min_tiles {} above max_tiles {}",
                self.columns, self.rows, self.min_tiles, self.max_tiles
            )));
        }
        let cells = self.columns as usize * self.rows as usize;
        if self.max_tiles > cells {
            return Err(GridError::InvalidConfiguration(format!(
                "layout {}x{} cannot hold max_tiles {}",
                self.columns, self.rows, self.max_tiles
            )));
        }
        Ok(())
    }

    fn aspect_ratio(&self) -> f64 {
        self.columns.max(1) as f64 / self.rows.max(1) as f64
    }
}

/// The layout chosen for the current tile count and container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    pub name: String,
    pub columns: u32,
    pub rows: u32,
    pub min_tiles: usize,
    pub max_tiles: usize,
    pub min_width: u32,
    pub min_height: u32,
}

impl GridLayout {
    pub fn same_shape(&self, other: &GridLayout) -> bool {
        self.columns == other.columns && self.rows == other.rows
    }
}

impl From<&LayoutDefinition> for GridLayout {
    fn from(def: &LayoutDefinition) -> Self {
        Self {
            name: format!("{}x{}", def.columns, def.rows),
            columns: def.columns,
            rows: def.rows,
            min_tiles: def.min_tiles,
            max_tiles: def.max_tiles,
            min_width: def.min_width,
            min_height: def.min_height,
        }
    }
}

/// Pick the best layout for `tile_count` tiles in `container`.
///
/// Candidates whose tile range contains `tile_count` compete on how closely
/// their columns/rows ratio matches the container. When none accepts the
/// count, the most capacious candidate wins. A measured container that is too
/// small for every accepting candidate drops to the largest smaller layout
/// that fits, leaving the overflow to pagination. Ties go to the earlier
/// candidate.
pub fn select_layout(
    candidates: &[LayoutDefinition],
    tile_count: usize,
    container: Size,
) -> Result<GridLayout> {
    if candidates.is_empty() {
        return Err(GridError::InvalidConfiguration(
            "layout catalog is empty".to_string(),
        ));
    }

    let matching: Vec<&LayoutDefinition> =
        candidates.iter().filter(|c| c.accepts(tile_count)).collect();

    if matching.is_empty() {
        let chosen = most_capacious(candidates.iter()).unwrap_or(&candidates[0]);
        return Ok(GridLayout::from(chosen));
    }

    let aspect = container.aspect_ratio().map(f64::from);

    if container.is_measured() {
        let fitting: Vec<&LayoutDefinition> = matching
            .iter()
            .copied()
            .filter(|c| c.fits(container))
            .collect();
        if !fitting.is_empty() {
            return Ok(GridLayout::from(closest_aspect(&fitting, aspect)));
        }

        let smaller: Vec<&LayoutDefinition> = candidates
            .iter()
            .filter(|c| c.max_tiles < tile_count && c.fits(container))
            .collect();
        if let Some(capacity) = smaller.iter().map(|c| c.max_tiles).max() {
            let largest: Vec<&LayoutDefinition> = smaller
                .into_iter()
                .filter(|c| c.max_tiles == capacity)
                .collect();
            return Ok(GridLayout::from(closest_aspect(&largest, aspect)));
        }
    }

    Ok(GridLayout::from(closest_aspect(&matching, aspect)))
}

fn most_capacious<'a>(
    candidates: impl Iterator<Item = &'a LayoutDefinition>,
) -> Option<&'a LayoutDefinition> {
    let mut best: Option<&LayoutDefinition> = None;
    for candidate in candidates {
        match best {
            Some(current) if candidate.max_tiles <= current.max_tiles => {}
            _ => best = Some(candidate),
        }
    }
    best
}

// `pool` is never empty at the call sites.
fn closest_aspect<'a>(pool: &[&'a LayoutDefinition], aspect: Option<f64>) -> &'a LayoutDefinition {
    let mut best = pool[0];
    let mut best_score = aspect_score(best, aspect);
    for &candidate in pool.iter().skip(1) {
        let score = aspect_score(candidate, aspect);
        if score < best_score {
            best = candidate;
            best_score = score;
        }
    }
    best
}

fn aspect_score(def: &LayoutDefinition, aspect: Option<f64>) -> f64 {
    match aspect {
        Some(container) => (def.aspect_ratio().ln() - container.ln()).abs(),
        None => 0.0,
    }
}
