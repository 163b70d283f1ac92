use serde::Deserialize;

use crate::catalog::Catalog;
use crate::data::Country;

/// How the three criteria combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// Only the control that changed last filters the catalog; the other two
    /// selections stay on screen but have no effect.
    #[default]
    LastChanged,
    /// Every criterion applies at once.
    Combined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Search,
    Language,
    Region,
}

/// Current search text and selector values. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    search: String,
    language: Option<String>,
    region: Option<String>,
    last_changed: Option<Criterion>,
}

impl Criteria {
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn last_changed(&self) -> Option<Criterion> {
        self.last_changed
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.last_changed = Some(Criterion::Search);
    }

    pub fn set_language(&mut self, language: Option<String>) {
        self.language = language.filter(|l| !l.is_empty());
        self.last_changed = Some(Criterion::Language);
    }

    pub fn set_region(&mut self, region: Option<String>) {
        self.region = region.filter(|r| !r.is_empty());
        self.last_changed = Some(Criterion::Region);
    }
}

pub fn matches_search(country: &Country, query: &str) -> bool {
    country
        .common_name()
        .to_lowercase()
        .contains(&query.to_lowercase())
}

pub fn matches_language(country: &Country, language: Option<&str>) -> bool {
    match language {
        Some(language) => country.language_names().any(|name| name == language),
        None => true,
    }
}

pub fn matches_region(country: &Country, region: Option<&str>) -> bool {
    match region {
        Some(region) => country.region == region,
        None => true,
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterController {
    criteria: Criteria,
    mode: FilterMode,
}

impl FilterController {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            criteria: Criteria::default(),
            mode,
        }
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn criteria_mut(&mut self) -> &mut Criteria {
        &mut self.criteria
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Country> {
        apply(catalog, &self.criteria, self.mode)
    }
}

/// The catalog subsequence selected by `criteria`, order preserved.
pub fn apply<'a>(catalog: &'a Catalog, criteria: &Criteria, mode: FilterMode) -> Vec<&'a Country> {
    let records = catalog.records().iter();
    match mode {
        FilterMode::LastChanged => match criteria.last_changed {
            None => records.collect(),
            Some(Criterion::Search) => records
                .filter(|c| matches_search(c, criteria.search()))
                .collect(),
            Some(Criterion::Language) => records
                .filter(|c| matches_language(c, criteria.language()))
                .collect(),
            Some(Criterion::Region) => records
                .filter(|c| matches_region(c, criteria.region()))
                .collect(),
        },
        FilterMode::Combined => records
            .filter(|c| {
                matches_search(c, criteria.search())
                    && matches_language(c, criteria.language())
                    && matches_region(c, criteria.region())
            })
            .collect(),
    }
}
