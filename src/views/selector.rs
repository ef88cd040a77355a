//! Location Selector
//!
//! Mutually exclusive toggle set: every catalog location followed by
//! Compare. Exactly one option is active.

use crate::catalog::{Catalog, Selection};

/// How the toggle set is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Stack vertically below `breakpoint` columns
    pub fn for_width(width: u16, breakpoint: u16) -> Self {
        if width < breakpoint {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }
}

pub struct LocationSelector {
    options: Vec<Selection>,
    active: usize,
}

impl LocationSelector {
    /// Build the option set. An `initial` selection not in the catalog
    /// falls back to the first option.
    pub fn new(catalog: &Catalog, initial: &Selection) -> Self {
        let options: Vec<Selection> = catalog
            .locations()
            .iter()
            .cloned()
            .map(Selection::Location)
            .chain(std::iter::once(Selection::Compare))
            .collect();
        let active = options.iter().position(|o| o == initial).unwrap_or(0);

        Self { options, active }
    }

    pub fn options(&self) -> &[Selection] {
        &self.options
    }

    pub fn active(&self) -> &Selection {
        &self.options[self.active]
    }

    /// Activate the option at a 1-based position
    pub fn select_index(&mut self, position: usize) -> Option<Selection> {
        let index = position.checked_sub(1).filter(|i| *i < self.options.len())?;
        self.active = index;
        Some(self.active().clone())
    }

    /// Activate an option by name (case-insensitive)
    pub fn select_name(&mut self, name: &str) -> Option<Selection> {
        let name = name.trim();
        let index = self
            .options
            .iter()
            .position(|o| o.name().eq_ignore_ascii_case(name))?;
        self.active = index;
        Some(self.active().clone())
    }

    /// Activate a selection produced elsewhere
    pub fn set_active(&mut self, selection: &Selection) -> bool {
        match self.options.iter().position(|o| o == selection) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }

    pub fn render(&self, orientation: Orientation) -> String {
        let labels = self.options.iter().enumerate().map(|(i, option)| {
            let label = format!("{} {}", i + 1, option.name());
            if i == self.active {
                format!("[{}]", label)
            } else {
                format!(" {} ", label)
            }
        });

        match orientation {
            Orientation::Horizontal => labels.collect::<Vec<_>>().join("│"),
            Orientation::Vertical => labels.collect::<Vec<_>>().join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> LocationSelector {
        let catalog = Catalog::builtin();
        LocationSelector::new(&catalog, &catalog.default_selection())
    }

    #[test]
    fn test_options_end_with_compare() {
        let selector = selector();
        assert_eq!(selector.options().len(), 7);
        assert_eq!(selector.options().last(), Some(&Selection::Compare));
        assert_eq!(selector.active().name(), "West End");
    }

    #[test]
    fn test_select_index() {
        let mut selector = selector();
        assert_eq!(selector.select_index(7), Some(Selection::Compare));
        assert_eq!(selector.select_index(2).unwrap().name(), "Milton");

        assert_eq!(selector.select_index(0), None);
        assert_eq!(selector.select_index(8), None);
        assert_eq!(selector.active().name(), "Milton");
    }

    #[test]
    fn test_select_name() {
        let mut selector = selector();
        assert_eq!(selector.select_name("compare"), Some(Selection::Compare));
        assert_eq!(selector.select_name(" newstead ").unwrap().name(), "Newstead");
        assert_eq!(selector.select_name("Nowhere"), None);
        assert_eq!(selector.active().name(), "Newstead");
    }

    #[test]
    fn test_orientation_breakpoint() {
        assert_eq!(Orientation::for_width(79, 80), Orientation::Vertical);
        assert_eq!(Orientation::for_width(80, 80), Orientation::Horizontal);
    }

    #[test]
    fn test_render_marks_active() {
        let selector = selector();

        let horizontal = selector.render(Orientation::Horizontal);
        assert_eq!(horizontal.lines().count(), 1);
        assert!(horizontal.starts_with("[1 West End]│ 2 Milton │"));
        assert!(horizontal.ends_with(" 7 Compare "));

        let vertical = selector.render(Orientation::Vertical);
        assert_eq!(vertical.lines().count(), 7);
        assert_eq!(vertical.lines().next(), Some("[1 West End]"));
    }
}
