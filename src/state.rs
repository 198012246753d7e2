use crate::{city::City, clock::TimeFormat};
use indexmap::{map::Entry, IndexMap};
use serde::Deserialize;
use thiserror::Error;

/// Why a change to the selection was refused. The selection is untouched
/// whenever one of these comes back.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SelectionError {
    #[error("This city is already in your list!")]
    AlreadySelected { city: City },
    #[error("Cannot remove your primary city!")]
    RemovePrimary,
    #[error("There is no city at position {index}")]
    OutOfRange { index: usize },
    #[error("At least one city must be selected")]
    Empty,
}

/// The cities on the dashboard, in display order. One of them is the primary
/// city, which always exists and can't be removed.
#[derive(Clone, Debug)]
pub struct Selection {
    /// Keyed by zone ID, which is what makes two cities the same
    cities: IndexMap<&'static str, City>,
    primary: usize,
}

impl Selection {
    pub fn new(
        cities: impl IntoIterator<Item = City>,
        primary: usize,
    ) -> Result<Self, SelectionError> {
        let mut selection = Self {
            cities: IndexMap::new(),
            primary,
        };
        for city in cities {
            selection.add(city)?;
        }
        if selection.is_empty() {
            return Err(SelectionError::Empty);
        }
        if primary >= selection.len() {
            return Err(SelectionError::OutOfRange { index: primary });
        }
        Ok(selection)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Always false for a constructed selection, but clippy wants it
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn primary_index(&self) -> usize {
        self.primary
    }

    pub fn primary(&self) -> &City {
        &self.cities[self.primary]
    }

    pub fn get(&self, index: usize) -> Option<&City> {
        self.cities.get_index(index).map(|(_, city)| city)
    }

    pub fn iter(&self) -> impl '_ + Iterator<Item = &City> {
        self.cities.values()
    }

    pub fn contains(&self, city: &City) -> bool {
        self.cities.contains_key(city.zone_id())
    }

    /// Append a city to the end of the list. Return its new index.
    pub fn add(&mut self, city: City) -> Result<usize, SelectionError> {
        match self.cities.entry(city.zone_id()) {
            Entry::Occupied(_) => Err(SelectionError::AlreadySelected { city }),
            Entry::Vacant(entry) => {
                let index = entry.index();
                entry.insert(city);
                Ok(index)
            }
        }
    }

    /// Remove the city at an index. Whichever city is primary stays primary.
    pub fn remove(&mut self, index: usize) -> Result<City, SelectionError> {
        if index == self.primary {
            return Err(SelectionError::RemovePrimary);
        }
        let (_, city) = self
            .cities
            .shift_remove_index(index)
            .ok_or(SelectionError::OutOfRange { index })?;
        if index < self.primary {
            self.primary -= 1;
        }
        Ok(city)
    }

    pub fn set_primary(&mut self, index: usize) -> Result<(), SelectionError> {
        if index >= self.len() {
            return Err(SelectionError::OutOfRange { index });
        }
        self.primary = index;
        Ok(())
    }
}

/// Display settings, read by every render
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Settings {
    pub time_format: TimeFormat,
    pub theme: Theme,
}

impl Settings {
    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    }

    pub fn toggle_time_format(&mut self) {
        self.time_format = self.time_format.toggle();
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Icon for the theme toggle, which shows what you'd switch *to*
    pub fn icon(self) -> &'static str {
        match self {
            Self::Light => "🌙",
            Self::Dark => "☀️",
        }
    }
}
