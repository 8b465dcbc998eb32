//! CSS custom-property binding for the selected layout.
//!
//! Styling code sizes the grid from two properties on the grid root element.
//! Values are the layout's column and row counts as decimal integers.

use super::core::GridLayout;

pub const COL_COUNT_PROPERTY: &str = "--lk-col-count";
pub const ROW_COUNT_PROPERTY: &str = "--lk-row-count";

/// Element-like sink for style properties (a DOM element, a test double, ...).
pub trait StyleTarget {
    fn set_property(&mut self, name: &str, value: &str);
}

impl GridLayout {
    /// The custom properties describing this layout.
    pub fn css_variables(&self) -> [(&'static str, String); 2] {
        [
            (COL_COUNT_PROPERTY, self.columns.to_string()),
            (ROW_COUNT_PROPERTY, self.rows.to_string()),
        ]
    }
}

pub fn apply_layout_style<S>(target: &mut S, layout: &GridLayout)
where
    S: StyleTarget + ?Sized,
{
    for (name, value) in layout.css_variables() {
        target.set_property(name, &value);
    }
}
