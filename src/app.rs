use chrono::{DateTime, Local};

use crate::catalog::Catalog;
use crate::detail::DetailViewer;
use crate::error::Result;
use crate::favorites::{FavoritesStore, Storage, Toggled};
use crate::filter::{Criteria, FilterController, FilterMode};
use crate::render::{self, CardView, DetailView, FavoriteEntry};

/// Everything the user can do, carrying the country name where one applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    SelectLanguage(Option<String>),
    SelectRegion(Option<String>),
    ToggleFavorite(String),
    ViewDetails(String),
    CloseDetails,
    OpenFavorites,
    CloseFavorites,
    /// Open a country from the favorites overlay, closing the overlay.
    ShowFavorite(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready { at: DateTime<Local> },
    Failed(String),
}

/// Owns the catalog, favorites, criteria and view state for one session.
#[derive(Debug)]
pub struct App<S: Storage> {
    catalog: Catalog,
    favorites: FavoritesStore<S>,
    filter: FilterController,
    detail: DetailViewer,
    favorites_open: bool,
    load_state: LoadState,
}

impl<S: Storage> App<S> {
    pub fn new(favorites: FavoritesStore<S>, mode: FilterMode) -> Self {
        Self {
            catalog: Catalog::default(),
            favorites,
            filter: FilterController::new(mode),
            detail: DetailViewer::new(),
            favorites_open: false,
            load_state: LoadState::Loading,
        }
    }

    /// Installs the fetched catalog. A failed load leaves the catalog empty for good.
    pub fn catalog_loaded(&mut self, result: Result<Catalog>) {
        match result {
            Ok(catalog) => {
                self.catalog = catalog;
                self.load_state = LoadState::Ready { at: Local::now() };
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        tracing::debug!(?action, "dispatch");
        match action {
            Action::Search(query) => self.filter.criteria_mut().set_search(query),
            Action::SelectLanguage(language) => self.filter.criteria_mut().set_language(language),
            Action::SelectRegion(region) => self.filter.criteria_mut().set_region(region),
            Action::ToggleFavorite(name) => {
                let toggled = self.favorites.toggle(&name)?;
                if toggled == Toggled::Added {
                    tracing::info!("{} added to favorites ({} total)", name, self.favorites.len());
                }
            }
            Action::ViewDetails(name) => self.show(&name)?,
            Action::CloseDetails => self.detail.close(),
            Action::OpenFavorites => self.favorites_open = true,
            Action::CloseFavorites => self.favorites_open = false,
            Action::ShowFavorite(name) => {
                self.show(&name)?;
                self.favorites_open = false;
            }
        }
        Ok(())
    }

    fn show(&mut self, name: &str) -> Result<()> {
        self.detail.show(&self.catalog, name).inspect_err(|e| {
            tracing::warn!("Ignoring detail request: {}", e);
        })
    }

    pub fn visible_cards(&self) -> Vec<CardView> {
        render::render_grid(&self.filter.apply(&self.catalog), &self.favorites)
    }

    pub fn favorite_entries(&self) -> Vec<FavoriteEntry> {
        render::render_favorites_list(&self.favorites)
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.current()
    }

    pub fn is_grid_visible(&self) -> bool {
        self.detail.is_grid_visible()
    }

    pub fn is_favorites_open(&self) -> bool {
        self.favorites_open
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.is_favorite(name)
    }

    pub fn status(&self) -> String {
        match &self.load_state {
            LoadState::Loading => render::render_status(0, 0, None, None),
            LoadState::Failed(message) => render::render_status(0, 0, None, Some(message)),
            LoadState::Ready { at } => render::render_status(
                self.filter.apply(&self.catalog).len(),
                self.catalog.len(),
                Some(*at),
                None,
            ),
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn languages(&self) -> Vec<String> {
        self.catalog.available_languages()
    }

    pub fn regions(&self) -> Vec<String> {
        self.catalog.available_regions()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    pub fn criteria(&self) -> &Criteria {
        self.filter.criteria()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Country;
    use crate::error::{FetchError, PassportError};
    use crate::favorites::MemoryStorage;

    fn app() -> App<MemoryStorage> {
        let mut app = App::new(FavoritesStore::load(MemoryStorage::new()), FilterMode::LastChanged);
        app.catalog_loaded(Ok(Catalog::from_records(vec![
            Country::new("France", "Europe").with_language("fra", "French"),
            Country::new("Germany", "Europe").with_language("deu", "German"),
        ])));
        app
    }

    #[test]
    fn failed_load_keeps_catalog_empty_and_reports() {
        let mut app = App::new(FavoritesStore::load(MemoryStorage::new()), FilterMode::LastChanged);
        assert_eq!(app.status(), "Loading...");
        app.catalog_loaded(Err(FetchError::Timeout { seconds: 30 }.into()));
        assert!(app.visible_cards().is_empty());
        assert!(matches!(app.load_state(), LoadState::Failed(_)));
        assert_eq!(app.status(), "could not load countries: request timed out after 30s");
    }

    #[test]
    fn toggling_updates_card_labels() {
        let mut app = app();
        app.dispatch(Action::ToggleFavorite("France".into())).unwrap();
        let cards = app.visible_cards();
        assert!(cards[0].is_favorite);
        assert!(!cards[1].is_favorite);
    }

    #[test]
    fn favorites_overlay_opens_detail_and_closes() {
        let mut app = app();
        app.dispatch(Action::ToggleFavorite("Germany".into())).unwrap();
        app.dispatch(Action::OpenFavorites).unwrap();
        assert!(app.is_favorites_open());

        app.dispatch(Action::ShowFavorite("Germany".into())).unwrap();
        assert!(!app.is_favorites_open());
        assert!(!app.is_grid_visible());
        assert_eq!(app.detail().map(|d| d.languages.as_str()), Some("German"));

        app.dispatch(Action::CloseDetails).unwrap();
        assert!(app.is_grid_visible());
    }

    #[test]
    fn stale_favorite_does_not_close_overlay() {
        let mut app = App::new(
            FavoritesStore::load(MemoryStorage::with_slot("favorites", r#"["Yugoslavia"]"#)),
            FilterMode::LastChanged,
        );
        app.catalog_loaded(Ok(Catalog::default()));
        app.dispatch(Action::OpenFavorites).unwrap();
        let err = app.dispatch(Action::ShowFavorite("Yugoslavia".into())).unwrap_err();
        assert!(matches!(err, PassportError::CountryNotFound { .. }));
        assert!(app.is_favorites_open());
        assert!(app.is_grid_visible());
    }

    #[test]
    fn status_counts_filtered_cards() {
        let mut app = app();
        app.dispatch(Action::SelectLanguage(Some("German".into()))).unwrap();
        assert_eq!(app.visible_cards().len(), 1);
        assert_eq!(app.status(), "Showing 1 of 2");
        assert_eq!(app.languages(), vec!["French", "German"]);
        assert_eq!(app.regions(), vec!["Europe"]);
    }
}
