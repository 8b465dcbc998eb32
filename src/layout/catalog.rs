//! Layout catalogs: the built-in default plus JSON-loaded overrides.
//!
//! # Example
//! ```no_run
//! use track_grid::layout::parse_catalog;
//!
//! let catalog = parse_catalog(
//!     r#"[
//!         { "columns": 1, "rows": 1, "minTiles": 1, "maxTiles": 1 },
//!         { "columns": 3, "rows": 2, "minTiles": 2, "maxTiles": 6, "minWidth": 640 }
//!     ]"#,
//! )?;
//! assert_eq!(catalog.len(), 2);
//! # Ok::<(), track_grid::GridError>(())
//! ```

use std::fs;
use std::path::Path;

use super::core::LayoutDefinition;
use crate::error::{GridError, Result};

/// Built-in catalog covering 1 to 25 tiles.
pub fn default_layouts() -> Vec<LayoutDefinition> {
    vec![
        LayoutDefinition::new(1, 1, 1, 1),
        LayoutDefinition::new(1, 2, 2, 2),
        LayoutDefinition::new(2, 1, 2, 2),
        LayoutDefinition::new(2, 2, 3, 4).with_min_width(560),
        LayoutDefinition::new(3, 3, 5, 9).with_min_width(700),
        LayoutDefinition::new(4, 4, 10, 16).with_min_width(960),
        LayoutDefinition::new(5, 5, 17, 25).with_min_width(1100),
    ]
}

/// Parse and validate a JSON array of layout definitions.
pub fn parse_catalog(json: &str) -> Result<Vec<LayoutDefinition>> {
    let catalog: Vec<LayoutDefinition> = serde_json::from_str(json)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Read a catalog file and validate it.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<LayoutDefinition>> {
    let raw = fs::read_to_string(path)?;
    parse_catalog(&raw)
}

pub(crate) fn validate_catalog(catalog: &[LayoutDefinition]) -> Result<()> {
    if catalog.is_empty() {
        return Err(GridError::InvalidConfiguration(
            "layout catalog is empty".to_string(),
        ));
    }
    catalog.iter().try_for_each(LayoutDefinition::validate)
}
