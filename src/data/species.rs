use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesStub {
    /// 1-based position in the catalog.
    pub number: u32,
    pub identifier: String,
    pub display_name: String,
}

impl SpeciesStub {
    pub fn new(number: u32, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            number,
            display_name: capitalize(&identifier),
            identifier,
        }
    }

    /// Selection label, e.g. `"25 - Pikachu"`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.number, self.display_name)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ordered species catalog. Order is significant: search results follow it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpeciesCatalog {
    species: Vec<SpeciesStub>,
}

impl SpeciesCatalog {
    /// Numbers entries by position, starting at 1.
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let species = identifiers
            .into_iter()
            .enumerate()
            .map(|(index, id)| SpeciesStub::new(index as u32 + 1, id))
            .collect();
        Self { species }
    }

    pub fn push(&mut self, stub: SpeciesStub) {
        self.species.push(stub);
    }

    pub fn as_slice(&self) -> &[SpeciesStub] {
        &self.species
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}
