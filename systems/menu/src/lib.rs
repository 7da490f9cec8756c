#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure menu-editor system that turns list and form input into item commands.
//!
//! The view addresses items by the row they occupy in the list. This system
//! resolves rows against the current [`ItemView`] so stale rows never reach the
//! world as commands.

use lucky_wheel_core::{Command, ItemError, ItemView};

/// Action attached to one of the buttons rendered beside a menu row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowAction {
    /// Adds one to the item's weight.
    Increase,
    /// Subtracts one from the item's weight, removing it at zero.
    Decrease,
    /// Removes the item regardless of weight.
    Remove,
}

/// Raw contents of the add-item form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddItemForm {
    /// Text typed into the name field.
    pub name: String,
    /// Text typed into the count field.
    pub count: String,
}

impl AddItemForm {
    /// Creates a form submission from raw field contents.
    #[must_use]
    pub fn new(name: impl Into<String>, count: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: count.into(),
        }
    }

    /// Validates the form and produces the matching command.
    pub fn to_command(&self) -> Result<Command, ItemError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ItemError::InvalidItem);
        }

        let weight = self
            .count
            .trim()
            .parse::<u32>()
            .map_err(|_| ItemError::InvalidItem)?;
        if weight < 1 {
            return Err(ItemError::InvalidItem);
        }

        Ok(Command::AddItem {
            name: name.to_owned(),
            weight,
        })
    }
}

/// Input snapshot distilled from adapter-provided menu interactions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuInput {
    /// Form submitted on this frame, if any.
    pub submitted: Option<AddItemForm>,
    /// Row button pressed on this frame, as `(row, action)`.
    pub row_action: Option<(usize, RowAction)>,
}

/// Menu-editor system.
#[derive(Debug, Default)]
pub struct Menu {
    last_rejection: Option<ItemError>,
}

impl Menu {
    /// Creates a new menu system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates menu input into item commands.
    ///
    /// Invalid form submissions are recorded as [`Menu::last_rejection`] and
    /// emit nothing.
    pub fn handle(&mut self, items: &ItemView, input: &MenuInput, out: &mut Vec<Command>) {
        if let Some(form) = &input.submitted {
            match form.to_command() {
                Ok(command) => {
                    self.last_rejection = None;
                    out.push(command);
                }
                Err(reason) => self.last_rejection = Some(reason),
            }
        }

        if let Some((row, action)) = input.row_action {
            if let Some(item) = items.get(row) {
                let command = match action {
                    RowAction::Increase => Command::increase_weight(item.id),
                    RowAction::Decrease => Command::decrease_weight(item.id),
                    RowAction::Remove => Command::RemoveItem { item: item.id },
                };
                out.push(command);
            }
        }
    }

    /// Reason the most recent form submission was refused, if it was.
    #[must_use]
    pub const fn last_rejection(&self) -> Option<ItemError> {
        self.last_rejection
    }
}

/// Formats an item's chance of winning as a whole percentage.
#[must_use]
pub fn chance_label(weight: u32, total: u64) -> String {
    if total == 0 {
        return "0%".to_owned();
    }

    let percent = f64::from(weight) / total as f64 * 100.0;
    format!("{:.0}%", percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucky_wheel_core::{ItemId, ItemSnapshot};

    fn view() -> ItemView {
        ItemView::from_snapshots(vec![
            ItemSnapshot {
                id: ItemId::new(4),
                name: "Pho".to_owned(),
                weight: 1,
            },
            ItemSnapshot {
                id: ItemId::new(9),
                name: "Udon".to_owned(),
                weight: 2,
            },
        ])
    }

    #[test]
    fn form_trims_name_and_parses_count() {
        let form = AddItemForm::new("  Kimbap ", " 3 ");

        assert_eq!(
            form.to_command(),
            Ok(Command::AddItem {
                name: "Kimbap".to_owned(),
                weight: 3,
            })
        );
    }

    #[test]
    fn form_rejects_bad_counts() {
        for count in ["0", "-2", "abc", "", "1.5"] {
            assert_eq!(
                AddItemForm::new("Kimbap", count).to_command(),
                Err(ItemError::InvalidItem),
                "count {count:?} must be rejected",
            );
        }
        assert_eq!(
            AddItemForm::new("   ", "1").to_command(),
            Err(ItemError::InvalidItem)
        );
    }

    #[test]
    fn row_actions_target_the_item_in_that_row() {
        let mut menu = Menu::new();
        let mut out = Vec::new();

        for action in [RowAction::Increase, RowAction::Decrease, RowAction::Remove] {
            menu.handle(
                &view(),
                &MenuInput {
                    submitted: None,
                    row_action: Some((1, action)),
                },
                &mut out,
            );
        }

        let item = ItemId::new(9);
        assert_eq!(
            out,
            vec![
                Command::AdjustWeight { item, delta: 1 },
                Command::AdjustWeight { item, delta: -1 },
                Command::RemoveItem { item },
            ]
        );
    }

    #[test]
    fn out_of_range_rows_are_ignored() {
        let mut menu = Menu::new();
        let mut out = Vec::new();

        menu.handle(
            &view(),
            &MenuInput {
                submitted: None,
                row_action: Some((2, RowAction::Remove)),
            },
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn rejected_submissions_are_remembered_until_the_next_valid_one() {
        let mut menu = Menu::new();
        let mut out = Vec::new();

        menu.handle(
            &view(),
            &MenuInput {
                submitted: Some(AddItemForm::new("", "1")),
                row_action: None,
            },
            &mut out,
        );
        assert_eq!(menu.last_rejection(), Some(ItemError::InvalidItem));
        assert!(out.is_empty());

        menu.handle(
            &view(),
            &MenuInput {
                submitted: Some(AddItemForm::new("Bulgogi", "1")),
                row_action: None,
            },
            &mut out,
        );
        assert!(menu.last_rejection().is_none());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn chance_label_rounds_to_whole_percent() {
        assert_eq!(chance_label(1, 3), "33%");
        assert_eq!(chance_label(2, 3), "67%");
        assert_eq!(chance_label(1, 0), "0%");
        assert_eq!(chance_label(4, 4), "100%");
    }
}
