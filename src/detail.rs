use crate::catalog::Catalog;
use crate::error::Result;
use crate::render::{render_detail, DetailView};

/// The two mutually exclusive main views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Grid,
    Detail(DetailView),
}

#[derive(Debug, Clone, Default)]
pub struct DetailViewer {
    state: ViewState,
}

impl DetailViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_grid_visible(&self) -> bool {
        matches!(self.state, ViewState::Grid)
    }

    pub fn current(&self) -> Option<&DetailView> {
        match &self.state {
            ViewState::Detail(view) => Some(view),
            ViewState::Grid => None,
        }
    }

    /// Grid -> Detail. An unknown name leaves the current view untouched.
    pub fn show(&mut self, catalog: &Catalog, name: &str) -> Result<()> {
        self.state = ViewState::Detail(render_detail(catalog.find(name)?));
        Ok(())
    }

    /// Detail -> Grid.
    pub fn close(&mut self) {
        self.state = ViewState::Grid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Country;
    use crate::error::PassportError;

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            Country::new("Iceland", "Europe")
                .with_capital("Reykjavik")
                .with_population(366_425)
                .with_area(103_000.0)
                .with_language("isl", "Icelandic"),
        ])
    }

    #[test]
    fn starts_on_grid() {
        let viewer = DetailViewer::new();
        assert!(viewer.is_grid_visible());
        assert!(viewer.current().is_none());
    }

    #[test]
    fn show_then_close() {
        let catalog = catalog();
        let mut viewer = DetailViewer::new();

        viewer.show(&catalog, "Iceland").unwrap();
        let view = viewer.current().unwrap();
        assert_eq!(view.capital, "Reykjavik");
        assert_eq!(view.population, "366,425");
        assert_eq!(view.area, "103,000 km²");
        assert!(!viewer.is_grid_visible());

        viewer.close();
        assert_eq!(viewer.state(), &ViewState::Grid);
    }

    #[test]
    fn unknown_country_is_ignored() {
        let catalog = catalog();
        let mut viewer = DetailViewer::new();
        assert!(matches!(
            viewer.show(&catalog, "Atlantis"),
            Err(PassportError::CountryNotFound { .. })
        ));
        assert!(viewer.is_grid_visible());

        viewer.show(&catalog, "Iceland").unwrap();
        assert!(viewer.show(&catalog, "Atlantis").is_err());
        assert_eq!(viewer.current().map(|v| v.name.as_str()), Some("Iceland"));
    }
}
