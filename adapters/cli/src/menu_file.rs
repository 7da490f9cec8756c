//! Menu files that pre-populate the wheel.
//!
//! ```toml
//! [[item]]
//! name = "Pizza"
//! weight = 3
//! ```

use std::{error::Error, fmt, fs, path::Path, str::FromStr};

use anyhow::{Context, Result};
use lucky_wheel_core::Command;
use serde::Deserialize;

/// Separates the name from the weight in `--item NAME:WEIGHT` arguments.
const ITEM_DELIMITER: char = ':';

const fn default_weight() -> u32 {
    1
}

/// Items listed by a menu file, in wheel order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MenuFile {
    /// Entries in the order they are added to the wheel.
    #[serde(default, rename = "item")]
    pub items: Vec<MenuEntry>,
}

impl MenuFile {
    /// Parses and validates the TOML contents of a menu file.
    pub(crate) fn parse(contents: &str) -> Result<Self, MenuFileError> {
        let file: Self = toml::from_str(contents).map_err(MenuFileError::InvalidToml)?;
        for (index, entry) in file.items.iter().enumerate() {
            entry.validate(index)?;
        }
        Ok(file)
    }

    /// Reads and parses the menu file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read menu file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load menu file {}", path.display()))
    }

    /// Appends entries given on the command line after the file's own.
    pub(crate) fn extend(&mut self, entries: impl IntoIterator<Item = MenuEntry>) {
        self.items.extend(entries);
    }

    /// Commands that add every entry to an empty wheel.
    #[must_use]
    pub(crate) fn to_commands(&self) -> Vec<Command> {
        self.items
            .iter()
            .map(|entry| Command::AddItem {
                name: entry.name.clone(),
                weight: entry.weight,
            })
            .collect()
    }
}

/// Single item of a menu.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MenuEntry {
    /// Name written on the wheel.
    pub name: String,
    /// Relative chance of the item being picked.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

impl MenuEntry {
    fn validate(&self, index: usize) -> Result<(), MenuFileError> {
        if self.name.trim().is_empty() {
            return Err(MenuFileError::BlankName { index });
        }
        if self.weight == 0 {
            return Err(MenuFileError::ZeroWeight { index });
        }
        Ok(())
    }
}

impl FromStr for MenuEntry {
    type Err = MenuFileError;

    /// Parses `NAME` or `NAME:WEIGHT`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || MenuFileError::InvalidArgument(value.to_owned());
        let (name, weight) = match value.rsplit_once(ITEM_DELIMITER) {
            Some((name, weight)) => {
                let weight = weight.trim().parse::<u32>().map_err(|_| invalid())?;
                (name, weight)
            }
            None => (value, default_weight()),
        };

        let name = name.trim();
        if name.is_empty() || weight == 0 {
            return Err(invalid());
        }

        Ok(Self {
            name: name.to_owned(),
            weight,
        })
    }
}

/// Errors that can occur while reading menu definitions.
#[derive(Debug)]
pub(crate) enum MenuFileError {
    /// The file is not valid TOML or does not match the menu layout.
    InvalidToml(toml::de::Error),
    /// The entry at `index` has a blank name.
    BlankName {
        /// Zero-based position of the entry.
        index: usize,
    },
    /// The entry at `index` has a weight of zero.
    ZeroWeight {
        /// Zero-based position of the entry.
        index: usize,
    },
    /// A `--item` argument could not be parsed.
    InvalidArgument(String),
}

impl fmt::Display for MenuFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToml(error) => write!(f, "could not parse menu: {error}"),
            Self::BlankName { index } => write!(f, "item #{} has a blank name", index + 1),
            Self::ZeroWeight { index } => {
                write!(f, "item #{} must have a weight of at least 1", index + 1)
            }
            Self::InvalidArgument(value) => {
                write!(f, "'{value}' is not a valid item, expected NAME or NAME:WEIGHT")
            }
        }
    }
}

impl Error for MenuFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidToml(error) => Some(error),
            _ => None,
        }
    }
}
