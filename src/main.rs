use anyhow::Context;
use gtk::prelude::*;
use gtk::{glib, Application, DropDown, Label, Orientation, SearchEntry};
use libadwaita::{prelude::*, ApplicationWindow, ColorScheme, HeaderBar, StyleManager, Toast, ToastOverlay, ToolbarView};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

mod country_detail;
mod country_grid;
mod favorites_list;

use country_detail::DetailPanel;
use country_grid::{CountryGrid, FlagCache};
use favorites_list::FavoritesList;
use passport::data::APP_ID;
use passport::{Action, App, Catalog, Config, FavoritesStore, FileStorage, FlagLoads, PassportError};

const ANY_LANGUAGE: &str = "Any language";
const ANY_REGION: &str = "Any region";

type SharedApp = Rc<RefCell<App<FileStorage>>>;

fn main() -> glib::ExitCode {
    passport::logging::init();

    let config = Config::load();
    let storage = match open_storage(&config) {
        Ok(storage) => storage,
        Err(e) => {
            tracing::error!("{:#}", e);
            return glib::ExitCode::FAILURE;
        }
    };

    // Initialize Tokio runtime for async operations
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            return glib::ExitCode::FAILURE;
        }
    };
    let _guard = rt.enter();

    let state: SharedApp = Rc::new(RefCell::new(App::new(
        FavoritesStore::load(storage),
        config.filter_mode,
    )));

    let app = Application::builder()
        .application_id(APP_ID)
        .build();

    let handle = rt.handle().clone();
    app.connect_activate(move |app| {
        build_ui(app, state.clone(), &config, &handle);
    });

    let exit_code = app.run();

    // Keep runtime alive until app exits
    drop(_guard);
    drop(rt);

    exit_code
}

fn open_storage(config: &Config) -> anyhow::Result<FileStorage> {
    let dir = config.data_dir();
    let storage = FileStorage::open_in(&dir)
        .with_context(|| format!("cannot open favorites store in {}", dir.display()))?;
    tracing::debug!("Favorites stored at {}", storage.path().display());
    Ok(storage)
}

/// Widgets that get redrawn from `App` state after every action.
#[derive(Clone)]
struct Ui {
    state: SharedApp,
    actions: flume::Sender<Action>,
    stack: gtk::Stack,
    grid: CountryGrid,
    detail: DetailPanel,
    favorites: FavoritesList,
    status_label: Label,
    toasts: ToastOverlay,
    flags: FlagCache,
}

impl Ui {
    /// Full redraw from current state. The borrow is released before touching
    /// widgets, since some of them emit signals when changed.
    fn refresh(&self) {
        let (cards, show_empty, entries, favorites_open, detail, status) = {
            let state = self.state.borrow();
            let detail = state
                .detail()
                .map(|view| (view.clone(), state.is_favorite(&view.name)));
            (
                state.visible_cards(),
                !state.catalog().is_empty(),
                state.favorite_entries(),
                state.is_favorites_open(),
                detail,
                state.status(),
            )
        };

        self.grid.render(&cards, show_empty, &self.actions, &self.flags);
        self.favorites.render(&entries, favorites_open);
        self.status_label.set_label(&status);

        match detail {
            Some((view, is_favorite)) => {
                self.detail.fill(&view, is_favorite, &self.flags);
                self.stack.set_visible_child_name("detail");
            }
            None => self.stack.set_visible_child_name("grid"),
        }
    }

    fn notify(&self, error: &PassportError) {
        let toast = Toast::builder()
            .title(error.to_string())
            .timeout(3)
            .build();
        self.toasts.add_toast(toast);
    }
}

fn build_ui(app: &Application, state: SharedApp, config: &Config, handle: &tokio::runtime::Handle) {
    // Enable dark theme support
    let style_manager = StyleManager::default();
    style_manager.set_color_scheme(ColorScheme::PreferDark);

    let (action_tx, action_rx) = flume::unbounded::<Action>();

    // Filter controls
    let search_entry = SearchEntry::builder()
        .placeholder_text("Search countries...")
        .hexpand(true)
        .build();
    let language_dropdown = DropDown::from_strings(&[ANY_LANGUAGE]);
    let region_dropdown = DropDown::from_strings(&[ANY_REGION]);

    let controls = gtk::Box::builder()
        .orientation(Orientation::Horizontal)
        .spacing(8)
        .margin_top(12)
        .margin_start(12)
        .margin_end(12)
        .build();
    controls.append(&search_entry);
    controls.append(&language_dropdown);
    controls.append(&region_dropdown);

    let grid = CountryGrid::new();
    let detail = DetailPanel::new(&action_tx);
    let favorites = FavoritesList::new(&action_tx);

    let grid_page = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .build();
    grid_page.append(&controls);
    grid_page.append(&grid.scrolled);

    let stack = gtk::Stack::builder()
        .transition_type(gtk::StackTransitionType::Crossfade)
        .build();
    stack.add_named(&grid_page, Some("grid"));
    stack.add_named(&detail.scrolled, Some("detail"));

    let toasts = ToastOverlay::new();
    toasts.set_child(Some(&stack));

    // Header doubles as a status line
    let header_bar = HeaderBar::builder()
        .build();
    let status_label = Label::builder()
        .label("Loading...")
        .build();
    status_label.add_css_class("status-display");
    header_bar.set_title_widget(Some(&status_label));
    header_bar.pack_end(&favorites.button);

    let toolbar_view = ToolbarView::builder()
        .build();
    toolbar_view.add_top_bar(&header_bar);
    toolbar_view.set_content(Some(&toasts));

    let window = ApplicationWindow::builder()
        .application(app)
        .title("Passport")
        .default_width(1000)
        .default_height(700)
        .build();

    let css_provider = gtk::CssProvider::new();
    css_provider.load_from_data(
        ".country-card {
            background-color: @card_bg_color;
            border-radius: 12px;
            padding: 10px;
            border: 1px solid alpha(@borders, 0.2);
        }
        .country-card:hover {
            border-color: alpha(@accent_bg_color, 0.3);
            box-shadow: 0 4px 12px alpha(black, 0.12);
        }
        .country-name {
            font-size: 14px;
            font-weight: 600;
        }
        .country-flag {
            border-radius: 6px;
        }
        .favorite-active {
            color: @accent_color;
        }
        .status-display {
            font-size: 13px;
            font-weight: 600;
            padding: 4px 12px;
            background-color: alpha(@accent_bg_color, 0.15);
            border-radius: 6px;
        }"
    );
    gtk::style_context_add_provider_for_display(
        &gtk::prelude::WidgetExt::display(&window),
        &css_provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );

    let ui = Ui {
        state: state.clone(),
        actions: action_tx.clone(),
        stack,
        grid,
        detail,
        favorites,
        status_label,
        toasts,
        flags: Rc::new(RefCell::new(FlagLoads::new())),
    };

    // Controls only send actions; the loop below applies them and redraws
    let tx = action_tx.clone();
    search_entry.connect_search_changed(move |entry| {
        let _ = tx.send(Action::Search(entry.text().to_string()));
    });

    // Set while the selectors are refilled, so the reset selection is not taken as user input
    let populating = Rc::new(Cell::new(false));

    let tx = action_tx.clone();
    let populating_for_language = populating.clone();
    language_dropdown.connect_selected_notify(move |dropdown| {
        if !populating_for_language.get() {
            let _ = tx.send(Action::SelectLanguage(selected_option(dropdown)));
        }
    });

    let tx = action_tx.clone();
    let populating_for_region = populating.clone();
    region_dropdown.connect_selected_notify(move |dropdown| {
        if !populating_for_region.get() {
            let _ = tx.send(Action::SelectRegion(selected_option(dropdown)));
        }
    });

    let ui_for_actions = ui.clone();
    glib::spawn_future_local(async move {
        while let Ok(action) = action_rx.recv_async().await {
            let result = ui_for_actions.state.borrow_mut().dispatch(action);
            if let Err(e) = result {
                ui_for_actions.notify(&e);
            }
            ui_for_actions.refresh();
        }
    });

    // Fetch the catalog on the runtime and hand the result back to the main loop
    let (loaded_tx, loaded_rx) = flume::bounded::<passport::Result<Catalog>>(1);
    let url = config.api_url.clone();
    let timeout = config.fetch_timeout();
    handle.spawn(async move {
        let result = Catalog::fetch(&url, timeout).await;
        let _ = loaded_tx.send_async(result).await;
    });

    let ui_for_load = ui.clone();
    glib::spawn_future_local(async move {
        let Ok(result) = loaded_rx.recv_async().await else {
            return;
        };
        if let Err(e) = &result {
            ui_for_load.notify(e);
        }

        let (languages, regions) = {
            let mut state = ui_for_load.state.borrow_mut();
            state.catalog_loaded(result);
            (state.languages(), state.regions())
        };

        populating.set(true);
        set_options(&language_dropdown, ANY_LANGUAGE, &languages);
        set_options(&region_dropdown, ANY_REGION, &regions);
        populating.set(false);

        ui_for_load.refresh();
    });

    ui.refresh();

    window.set_content(Some(&toolbar_view));
    window.present();
}

fn set_options(dropdown: &DropDown, any_label: &str, options: &[String]) {
    let mut items: Vec<&str> = Vec::with_capacity(options.len() + 1);
    items.push(any_label);
    items.extend(options.iter().map(String::as_str));
    dropdown.set_model(Some(&gtk::StringList::new(&items)));
    dropdown.set_selected(0);
}

/// The selected option, or `None` for the leading "any" entry.
fn selected_option(dropdown: &DropDown) -> Option<String> {
    if dropdown.selected() == 0 {
        return None;
    }
    dropdown
        .selected_item()
        .and_downcast::<gtk::StringObject>()
        .map(|item| item.string().to_string())
}
