use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

pub const APP_ID: &str = "com.toasterrepair.Passport";
pub const REST_COUNTRIES_URL: &str = "https://restcountries.com/v3.1/all";

/// Fields requested from the API. `/all` rejects requests without a field list.
pub const COUNTRY_FIELDS: &[&str] = &[
    "name",
    "flags",
    "capital",
    "region",
    "subregion",
    "population",
    "area",
    "languages",
    "maps",
];

/// Storage slot holding the favorites as a JSON array of names.
pub const FAVORITES_KEY: &str = "favorites";
pub const FAVORITES_CAPACITY: usize = 40;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CountryName {
    pub common: String,
    #[serde(default)]
    pub official: String,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct CountryFlags {
    #[serde(default)]
    pub svg: String,
    #[serde(default)]
    pub png: String,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct CountryMaps {
    #[serde(default, rename = "googleMaps")]
    pub google_maps: String,
}

/// One country as delivered by REST Countries. Immutable once loaded.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Country {
    pub name: CountryName,
    #[serde(default)]
    pub flags: CountryFlags,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: String,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub languages: Languages,
    #[serde(default)]
    pub maps: CountryMaps,
}

/// Language code -> name, in the order the API lists them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Languages(Vec<(String, String)>);

impl Languages {
    /// Replaces the name in place if `code` is already present.
    pub fn insert(&mut self, code: String, name: String) {
        match self.0.iter_mut().find(|(c, _)| *c == code) {
            Some(entry) => entry.1 = name,
            None => self.0.push((code, name)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, name)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Languages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LanguagesVisitor;

        impl<'de> Visitor<'de> for LanguagesVisitor {
            type Value = Languages;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of language codes to names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Languages, A::Error> {
                let mut languages = Languages::default();
                while let Some((code, name)) = map.next_entry::<String, String>()? {
                    languages.insert(code, name);
                }
                Ok(languages)
            }
        }

        deserializer.deserialize_map(LanguagesVisitor)
    }
}

impl Country {
    pub fn new(common_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: CountryName {
                common: common_name.into(),
                official: String::new(),
            },
            flags: CountryFlags::default(),
            capital: Vec::new(),
            region: region.into(),
            subregion: String::new(),
            population: 0,
            area: 0.0,
            languages: Languages::default(),
            maps: CountryMaps::default(),
        }
    }

    pub fn with_capital(mut self, capital: impl Into<String>) -> Self {
        self.capital = vec![capital.into()];
        self
    }

    pub fn with_language(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.languages.insert(code.into(), name.into());
        self
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = population;
        self
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    pub fn with_flag(mut self, svg: impl Into<String>) -> Self {
        self.flags.svg = svg.into();
        self
    }

    pub fn common_name(&self) -> &str {
        &self.name.common
    }

    pub fn flag_url(&self) -> &str {
        if self.flags.svg.is_empty() {
            &self.flags.png
        } else {
            &self.flags.svg
        }
    }

    /// Only the first listed capital is shown.
    pub fn capital(&self) -> Option<&str> {
        self.capital.first().map(String::as_str)
    }

    pub fn language_names(&self) -> impl Iterator<Item = &str> {
        self.languages.names()
    }

    pub fn maps_url(&self) -> Option<&str> {
        if self.maps.google_maps.is_empty() {
            None
        } else {
            Some(self.maps.google_maps.as_str())
        }
    }
}
