//! Chart color assignment.
//!
//! Each analysis gets a color from a fixed palette the first time it is
//! seen, and keeps it for as long as the assigner lives. Colors cycle once
//! the palette is exhausted.

use std::collections::HashMap;

/// Default palette, in assignment order.
pub const PALETTE: [&str; 20] = [
    "#e6194B", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
    "#bcf60c", "#fabebe", "#008080", "#e6beff", "#9A6324", "#fffac8", "#800000", "#aaffc3",
    "#808000", "#ffd8b1", "#000075", "#808080",
];

/// Assigns stable colors to analyses in first-seen order.
///
/// # Examples
///
/// ```rust
/// use sugostat::ColorAssigner;
///
/// let mut colors = ColorAssigner::new();
/// let a = colors.color_for("Fest - Alpha").to_string();
/// let b = colors.color_for("Fest - Beta").to_string();
///
/// assert_ne!(a, b);
/// assert_eq!(colors.color_for("Fest - Alpha"), a);
/// ```
#[derive(Debug, Clone)]
pub struct ColorAssigner {
    palette: Vec<String>,
    assigned: HashMap<String, usize>,
    next: usize,
}

impl ColorAssigner {
    /// Create an assigner over the default palette.
    pub fn new() -> Self {
        Self::with_palette(PALETTE.iter().map(|c| c.to_string()).collect())
    }

    /// Create an assigner over a custom palette.
    ///
    /// An empty palette falls back to the default one.
    pub fn with_palette(palette: Vec<String>) -> Self {
        let palette = if palette.is_empty() {
            PALETTE.iter().map(|c| c.to_string()).collect()
        } else {
            palette
        };
        Self {
            palette,
            assigned: HashMap::new(),
            next: 0,
        }
    }

    /// Color for `key`, assigning the next palette entry on first use.
    pub fn color_for(&mut self, key: &str) -> &str {
        let index = match self.assigned.get(key) {
            Some(index) => *index,
            None => {
                let index = self.next % self.palette.len();
                self.next += 1;
                self.assigned.insert(key.to_string(), index);
                index
            }
        };
        &self.palette[index]
    }

    /// Number of distinct keys seen so far.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Whether no key has been assigned yet.
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let mut colors = ColorAssigner::new();
        assert_eq!(colors.color_for("a"), PALETTE[0]);
        assert_eq!(colors.color_for("b"), PALETTE[1]);
        assert_eq!(colors.color_for("a"), PALETTE[0]);
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn test_palette_cycles() {
        let mut colors = ColorAssigner::with_palette(vec!["red".into(), "blue".into()]);
        assert_eq!(colors.color_for("a"), "red");
        assert_eq!(colors.color_for("b"), "blue");
        assert_eq!(colors.color_for("c"), "red");
    }

    #[test]
    fn test_empty_palette_uses_default() {
        let mut colors = ColorAssigner::with_palette(Vec::new());
        assert!(colors.is_empty());
        assert_eq!(colors.color_for("a"), PALETTE[0]);
    }
}
