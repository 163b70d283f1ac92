//! End-to-end flows through `App`, driven by the same actions the window sends.

use passport::data::FAVORITES_KEY;
use passport::{Action, App, Catalog, Country, FavoritesStore, FileStorage, FilterMode, MemoryStorage, PassportError, Storage};

fn europe() -> Catalog {
    Catalog::from_json(
        r#"[
            {"name": {"common": "France", "official": "French Republic"},
             "flags": {"svg": "https://flagcdn.com/fr.svg"},
             "capital": ["Paris"], "region": "Europe", "subregion": "Western Europe",
             "population": 67391582, "area": 551695, "languages": {"fra": "French"}},
            {"name": {"common": "Germany"},
             "flags": {"svg": "https://flagcdn.com/de.svg"},
             "capital": ["Berlin"], "region": "Europe",
             "population": 83240525, "area": 357114, "languages": {"deu": "German"}}
        ]"#,
    )
    .unwrap()
}

fn app_with(storage: MemoryStorage, mode: FilterMode) -> App<MemoryStorage> {
    let mut app = App::new(FavoritesStore::load(storage), mode);
    app.catalog_loaded(Ok(europe()));
    app
}

fn card_names(app: &App<MemoryStorage>) -> Vec<String> {
    app.visible_cards().into_iter().map(|c| c.name).collect()
}

#[test]
fn toggle_france_twice() {
    let mut app = app_with(MemoryStorage::new(), FilterMode::LastChanged);

    app.dispatch(Action::ToggleFavorite("France".into())).unwrap();
    assert_eq!(app.favorites().list(), ["France"]);
    assert_eq!(app.favorites().storage().get(FAVORITES_KEY).as_deref(), Some(r#"["France"]"#));

    app.dispatch(Action::ToggleFavorite("France".into())).unwrap();
    assert!(app.favorites().list().is_empty());
    assert_eq!(app.favorites().storage().get(FAVORITES_KEY).as_deref(), Some("[]"));
}

#[test]
fn forty_favorites_reject_a_new_one() {
    let names: Vec<String> = (0..40).map(|i| format!("Place {i}")).collect();
    let storage = MemoryStorage::with_slot(FAVORITES_KEY, serde_json::to_string(&names).unwrap());
    let mut app = app_with(storage, FilterMode::LastChanged);

    let err = app.dispatch(Action::ToggleFavorite("NewCountry".into())).unwrap_err();
    assert!(matches!(err, PassportError::FavoritesCapacityExceeded { capacity: 40 }));
    assert_eq!(err.to_string(), "You can only have 40 favorites.");
    assert_eq!(app.favorites().list(), names.as_slice());
}

#[test]
fn detail_view_formats_numbers() {
    let mut app = app_with(MemoryStorage::new(), FilterMode::LastChanged);
    app.dispatch(Action::ViewDetails("France".into())).unwrap();

    let detail = app.detail().unwrap();
    assert_eq!(detail.population, "67,391,582");
    assert_eq!(detail.area, "551,695 km²");
    assert_eq!(detail.capital, "Paris");
    assert_eq!(detail.subregion.as_deref(), Some("Western Europe"));
    assert!(!app.is_grid_visible());
}

#[test]
fn detail_view_for_small_record() {
    let catalog = Catalog::from_records(vec![Country::new("Nowhere", "Oceania")
        .with_population(1_000_000)
        .with_area(100.0)]);
    let mut app = App::new(FavoritesStore::load(MemoryStorage::new()), FilterMode::LastChanged);
    app.catalog_loaded(Ok(catalog));
    app.dispatch(Action::ViewDetails("Nowhere".into())).unwrap();

    let detail = app.detail().unwrap();
    assert_eq!(detail.capital, "N/A");
    assert_eq!(detail.population, "1,000,000");
    assert_eq!(detail.area, "100 km²");
}

#[test]
fn unknown_country_leaves_grid_showing() {
    let mut app = app_with(MemoryStorage::new(), FilterMode::LastChanged);
    let err = app.dispatch(Action::ViewDetails("Atlantis".into())).unwrap_err();
    assert!(matches!(err, PassportError::CountryNotFound { .. }));
    assert!(app.is_grid_visible());
}

#[test]
fn last_changed_control_wins() {
    let mut app = app_with(MemoryStorage::new(), FilterMode::LastChanged);

    app.dispatch(Action::SelectLanguage(Some("German".into()))).unwrap();
    assert_eq!(card_names(&app), vec!["Germany"]);

    // typing drops the language restriction
    app.dispatch(Action::Search("FRA".into())).unwrap();
    assert_eq!(card_names(&app), vec!["France"]);
    app.dispatch(Action::Search(String::new())).unwrap();
    assert_eq!(card_names(&app), vec!["France", "Germany"]);
}

#[test]
fn combined_mode_keeps_every_selection() {
    let mut app = app_with(MemoryStorage::new(), FilterMode::Combined);

    app.dispatch(Action::SelectLanguage(Some("German".into()))).unwrap();
    app.dispatch(Action::Search("FRA".into())).unwrap();
    assert!(card_names(&app).is_empty());

    app.dispatch(Action::SelectLanguage(None)).unwrap();
    assert_eq!(card_names(&app), vec!["France"]);
    app.dispatch(Action::SelectRegion(Some("Africa".into()))).unwrap();
    assert!(card_names(&app).is_empty());
}

#[test]
fn corrupt_store_is_replaced_on_next_toggle() {
    let storage = MemoryStorage::with_slot(FAVORITES_KEY, "[\"France\",");
    let mut app = app_with(storage, FilterMode::LastChanged);
    assert!(app.favorites().is_empty());

    app.dispatch(Action::ToggleFavorite("Germany".into())).unwrap();
    assert_eq!(app.favorites().storage().get(FAVORITES_KEY).as_deref(), Some(r#"["Germany"]"#));
}

#[test]
fn favorites_survive_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut app = App::new(
            FavoritesStore::load(FileStorage::open_in(dir.path()).unwrap()),
            FilterMode::LastChanged,
        );
        app.catalog_loaded(Ok(europe()));
        app.dispatch(Action::ToggleFavorite("Germany".into())).unwrap();
        app.dispatch(Action::ToggleFavorite("France".into())).unwrap();
    }

    let mut app = App::new(
        FavoritesStore::load(FileStorage::open_in(dir.path()).unwrap()),
        FilterMode::LastChanged,
    );
    app.catalog_loaded(Ok(europe()));
    let entries: Vec<_> = app.favorite_entries().into_iter().map(|e| e.name).collect();
    assert_eq!(entries, vec!["Germany", "France"]);
    assert!(app.visible_cards().iter().all(|card| card.is_favorite));
}
