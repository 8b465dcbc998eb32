//! Ready-made observers for common bindings.

use crate::layout::{GridLayout, StyleTarget, apply_layout_style};

use super::GridObserver;

/// Writes the column/row custom properties onto a style target on every layout change.
pub struct StyleObserver<S> {
    target: S,
}

impl<S: StyleTarget> StyleObserver<S> {
    pub fn new(target: S) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &S {
        &self.target
    }
}

impl<S: StyleTarget, T> GridObserver<T> for StyleObserver<S> {
    fn name(&self) -> &str {
        "style.grid_variables"
    }

    fn on_layout(&mut self, layout: &GridLayout) {
        apply_layout_style(&mut self.target, layout);
    }
}
