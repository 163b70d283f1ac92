//! Pure mapping from catalog state to what the window shows.
//!
//! Nothing here touches widgets; the GTK layer turns these models into cards,
//! rows and labels, and wires their actions back using the country name.

use chrono::{DateTime, Local};

use crate::data::Country;
use crate::favorites::{FavoritesStore, Storage};

pub const ADD_FAVORITE_LABEL: &str = "Add to Favorites";
pub const REMOVE_FAVORITE_LABEL: &str = "Remove from Favorites";
pub const VIEW_DETAILS_LABEL: &str = "View Details";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub name: String,
    pub flag_url: String,
    pub flag_alt: String,
    pub is_favorite: bool,
}

impl CardView {
    pub fn favorite_label(&self) -> &'static str {
        favorite_label(self.is_favorite)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteEntry {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub name: String,
    pub official_name: Option<String>,
    pub flag_url: String,
    pub capital: String,
    pub region: String,
    pub subregion: Option<String>,
    pub population: String,
    pub area: String,
    pub languages: String,
    pub maps_url: Option<String>,
}

pub fn favorite_label(is_favorite: bool) -> &'static str {
    if is_favorite {
        REMOVE_FAVORITE_LABEL
    } else {
        ADD_FAVORITE_LABEL
    }
}

/// One card per record, in the order given.
pub fn render_grid<S: Storage>(records: &[&Country], favorites: &FavoritesStore<S>) -> Vec<CardView> {
    records
        .iter()
        .map(|country| CardView {
            name: country.common_name().to_string(),
            flag_url: country.flag_url().to_string(),
            flag_alt: format!("{} Flag", country.common_name()),
            is_favorite: favorites.is_favorite(country.common_name()),
        })
        .collect()
}

pub fn render_favorites_list<S: Storage>(favorites: &FavoritesStore<S>) -> Vec<FavoriteEntry> {
    favorites
        .list()
        .iter()
        .map(|name| FavoriteEntry { name: name.clone() })
        .collect()
}

pub fn render_detail(country: &Country) -> DetailView {
    let languages: Vec<&str> = country.language_names().collect();
    DetailView {
        name: country.common_name().to_string(),
        official_name: non_empty(&country.name.official),
        flag_url: country.flag_url().to_string(),
        capital: country.capital().unwrap_or(NOT_AVAILABLE).to_string(),
        region: country.region.clone(),
        subregion: non_empty(&country.subregion),
        population: format_thousands(country.population),
        area: format_area(country.area),
        languages: if languages.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            languages.join(", ")
        },
        maps_url: country.maps_url().map(str::to_string),
    }
}

/// Status line under the header.
pub fn render_status(
    shown: usize,
    total: usize,
    loaded_at: Option<DateTime<Local>>,
    error: Option<&str>,
) -> String {
    if let Some(error) = error {
        return error.to_string();
    }
    let Some(loaded_at) = loaded_at else {
        return "Loading...".to_string();
    };
    if shown == total {
        format!(
            "{} countries · loaded {}",
            format_thousands(total as u64),
            loaded_at.format("%H:%M")
        )
    } else {
        format!(
            "Showing {} of {}",
            format_thousands(shown as u64),
            format_thousands(total as u64)
        )
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn format_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Area with grouped digits, at most three decimals, and a km² suffix.
pub fn format_area(area: f64) -> String {
    let rounded = format!("{:.3}", area.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if area < 0.0 && rounded.chars().any(|c| c != '0' && c != '.') {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out.push_str(" km²");
    out
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::MemoryStorage;
    use chrono::TimeZone;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1_000_000), "1,000,000");
        assert_eq!(format_thousands(67_391_582), "67,391,582");
    }

    #[test]
    fn area_formatting() {
        assert_eq!(format_area(100.0), "100 km²");
        assert_eq!(format_area(551_695.0), "551,695 km²");
        assert_eq!(format_area(0.44), "0.44 km²");
        assert_eq!(format_area(1234.56789), "1,234.568 km²");
        assert_eq!(format_area(-1.0), "-1 km²");
    }

    #[test]
    fn detail_without_capital_or_languages() {
        let detail = render_detail(&Country::new("Bouvet Island", "Antarctic").with_area(49.0));
        assert_eq!(detail.capital, "N/A");
        assert_eq!(detail.languages, "N/A");
        assert_eq!(detail.area, "49 km²");
        assert_eq!(detail.official_name, None);
    }

    #[test]
    fn detail_joins_language_names() {
        let country = Country::new("Belgium", "Europe")
            .with_capital("Brussels")
            .with_population(11_555_997)
            .with_language("deu", "German")
            .with_language("fra", "French")
            .with_language("nld", "Dutch");
        let detail = render_detail(&country);
        assert_eq!(detail.capital, "Brussels");
        assert_eq!(detail.population, "11,555,997");
        assert_eq!(detail.languages, "German, French, Dutch");
    }

    #[test]
    fn detail_lists_languages_in_api_order() {
        let country: Country = serde_json::from_str(
            r#"{"name": {"common": "Switzerland"}, "region": "Europe",
                "languages": {"gsw": "Swiss German", "fra": "French", "ita": "Italian", "roh": "Romansh"}}"#,
        )
        .unwrap();
        let detail = render_detail(&country);
        assert_eq!(detail.languages, "Swiss German, French, Italian, Romansh");
    }

    #[test]
    fn grid_labels_follow_membership() {
        let mut favorites = FavoritesStore::load(MemoryStorage::new());
        favorites.toggle("Chad").unwrap();
        let chad = Country::new("Chad", "Africa").with_flag("https://flagcdn.com/td.svg");
        let peru = Country::new("Peru", "Americas");

        let cards = render_grid(&[&chad, &peru], &favorites);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].favorite_label(), REMOVE_FAVORITE_LABEL);
        assert_eq!(cards[0].flag_url, "https://flagcdn.com/td.svg");
        assert_eq!(cards[0].flag_alt, "Chad Flag");
        assert_eq!(cards[1].favorite_label(), ADD_FAVORITE_LABEL);
    }

    #[test]
    fn favorites_list_in_insertion_order() {
        let mut favorites = FavoritesStore::load(MemoryStorage::new());
        favorites.toggle("Peru").unwrap();
        favorites.toggle("Chad").unwrap();
        let names: Vec<_> = render_favorites_list(&favorites).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Peru", "Chad"]);
    }

    #[test]
    fn status_line() {
        let at = Local.with_ymd_and_hms(2026, 3, 1, 14, 3, 0).unwrap();
        assert_eq!(render_status(0, 0, None, None), "Loading...");
        assert_eq!(render_status(250, 250, Some(at), None), "250 countries · loaded 14:03");
        assert_eq!(render_status(12, 250, Some(at), None), "Showing 12 of 250");
        assert_eq!(render_status(0, 0, None, Some("offline")), "offline");
    }
}
