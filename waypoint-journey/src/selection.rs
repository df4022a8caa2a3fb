use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("'{0}' is not one of the offered options")]
    UnknownOption(String),
    #[error("already holding {required} selections")]
    Full { required: usize },
}

/// Multi-select over a fixed option set that must end with exactly `required` picks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedSelection {
    options: Vec<String>,
    required: usize,
    selected: Vec<String>,
}

impl BoundedSelection {
    #[must_use]
    pub fn new(options: &[&str], required: usize) -> Self {
        Self {
            options: options.iter().map(|o| (*o).to_string()).collect(),
            required,
            selected: Vec::with_capacity(required),
        }
    }

    /// Restore a previous answer, skipping unknown, repeated or surplus entries.
    #[must_use]
    pub fn with_selected<'a>(mut self, previous: impl IntoIterator<Item = &'a str>) -> Self {
        for option in previous {
            if self.is_selected(option) || self.selected.len() >= self.required {
                continue;
            }
            if self.options.iter().any(|o| o == option) {
                self.selected.push(option.to_string());
            }
        }
        self
    }

    /// Flip `option`. Adding while full is rejected and leaves the set untouched.
    ///
    /// # Errors
    ///
    /// Returns an error for options outside the offered set, or when the selection is
    /// already full.
    pub fn toggle(&mut self, option: &str) -> Result<SelectionChange, SelectionError> {
        if !self.options.iter().any(|o| o == option) {
            return Err(SelectionError::UnknownOption(option.to_string()));
        }
        if let Some(pos) = self.selected.iter().position(|s| s == option) {
            self.selected.remove(pos);
            return Ok(SelectionChange::Removed);
        }
        if self.selected.len() >= self.required {
            return Err(SelectionError::Full {
                required: self.required,
            });
        }
        self.selected.push(option.to_string());
        Ok(SelectionChange::Added)
    }

    #[must_use]
    pub fn is_selected(&self, option: &str) -> bool {
        self.selected.iter().any(|s| s == option)
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.selected.len() == self.required
    }

    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub const fn required(&self) -> usize {
        self.required
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.required.saturating_sub(self.selected.len())
    }

    /// `{ key: [..] }` in the order the options were picked.
    #[must_use]
    pub fn to_payload(&self, key: &str) -> Value {
        json!({ key: self.selected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget() -> BoundedSelection {
        BoundedSelection::new(&["housing", "transit", "parks", "schools", "safety"], 3)
    }

    #[test]
    fn advances_only_at_exact_count() {
        let mut selection = budget();
        selection.toggle("housing").unwrap();
        selection.toggle("parks").unwrap();
        assert!(!selection.can_advance());
        assert_eq!(selection.remaining(), 1);
        selection.toggle("safety").unwrap();
        assert!(selection.can_advance());
        assert_eq!(
            selection.to_payload("top3BudgetChoices"),
            json!({ "top3BudgetChoices": ["housing", "parks", "safety"] })
        );
    }

    #[test]
    fn fourth_pick_is_rejected_without_mutation() {
        let mut selection = budget();
        for option in ["housing", "transit", "parks"] {
            selection.toggle(option).unwrap();
        }
        let before = selection.clone();
        assert_eq!(
            selection.toggle("schools").unwrap_err(),
            SelectionError::Full { required: 3 }
        );
        assert_eq!(selection, before);
    }

    #[test]
    fn toggling_active_option_removes_it() {
        let mut selection = budget();
        selection.toggle("transit").unwrap();
        assert_eq!(selection.toggle("transit").unwrap(), SelectionChange::Removed);
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn unknown_options_are_rejected() {
        let mut selection = budget();
        assert!(matches!(
            selection.toggle("moon base"),
            Err(SelectionError::UnknownOption(_))
        ));
    }

    #[test]
    fn restoring_ignores_unknown_and_surplus() {
        let selection =
            budget().with_selected(["housing", "moon base", "parks", "safety", "schools"]);
        assert_eq!(selection.selected(), ["housing", "parks", "safety"]);
    }

    #[test]
    fn restoring_a_repeated_pick_keeps_it() {
        let selection = budget().with_selected(["parks", "parks", "safety"]);
        assert_eq!(selection.selected(), ["parks", "safety"]);
        assert_eq!(selection.remaining(), 1);
    }
}
