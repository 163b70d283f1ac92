use gtk::prelude::*;
use gtk::{Label, Orientation, ScrolledWindow};
use std::cell::RefCell;
use std::rc::Rc;

use passport::render::{favorite_label, DetailView};
use passport::Action;

use crate::country_grid::{load_flag, FlagCache};

/// The single-country panel shown in place of the grid.
#[derive(Clone)]
pub struct DetailPanel {
    pub scrolled: ScrolledWindow,
    flag: gtk::Picture,
    name: Label,
    official_name: Label,
    capital: Label,
    region: Label,
    population: Label,
    area: Label,
    languages: Label,
    favorite_button: gtk::Button,
    maps_button: gtk::Button,
    current: Rc<RefCell<Option<DetailView>>>,
}

impl DetailPanel {
    pub fn new(actions: &flume::Sender<Action>) -> Self {
        let container = gtk::Box::builder()
            .orientation(Orientation::Vertical)
            .spacing(12)
            .margin_top(18)
            .margin_bottom(18)
            .margin_start(18)
            .margin_end(18)
            .halign(gtk::Align::Center)
            .width_request(420)
            .build();
        container.add_css_class("country-details");

        let close_button = gtk::Button::builder()
            .label("Back")
            .halign(gtk::Align::Start)
            .tooltip_text("Back to all countries")
            .build();
        let tx = actions.clone();
        close_button.connect_clicked(move |_| {
            let _ = tx.send(Action::CloseDetails);
        });
        container.append(&close_button);

        let name = Label::builder().xalign(0.0).wrap(true).build();
        name.add_css_class("title-1");
        container.append(&name);

        let official_name = Label::builder().xalign(0.0).wrap(true).build();
        official_name.add_css_class("dim-label");
        container.append(&official_name);

        let flag = gtk::Picture::builder()
            .height_request(200)
            .can_shrink(true)
            .content_fit(gtk::ContentFit::Contain)
            .build();
        flag.add_css_class("country-flag");
        container.append(&flag);

        let facts = gtk::Grid::builder()
            .row_spacing(6)
            .column_spacing(18)
            .build();
        let capital = add_fact(&facts, 0, "Capital");
        let region = add_fact(&facts, 1, "Region");
        let population = add_fact(&facts, 2, "Population");
        let area = add_fact(&facts, 3, "Area");
        let languages = add_fact(&facts, 4, "Languages");
        container.append(&facts);

        let buttons = gtk::Box::builder()
            .orientation(Orientation::Horizontal)
            .spacing(8)
            .build();

        let favorite_button = gtk::Button::builder().build();
        favorite_button.add_css_class("suggested-action");
        buttons.append(&favorite_button);

        let maps_button = gtk::Button::builder()
            .label("Open in Maps")
            .visible(false)
            .build();
        buttons.append(&maps_button);
        container.append(&buttons);

        let scrolled = ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .hscrollbar_policy(gtk::PolicyType::Never)
            .build();
        scrolled.set_child(Some(&container));

        let current: Rc<RefCell<Option<DetailView>>> = Rc::new(RefCell::new(None));

        let tx = actions.clone();
        let current_for_favorite = current.clone();
        favorite_button.connect_clicked(move |_| {
            if let Some(view) = current_for_favorite.borrow().as_ref() {
                let _ = tx.send(Action::ToggleFavorite(view.name.clone()));
            }
        });

        let current_for_maps = current.clone();
        maps_button.connect_clicked(move |_| {
            let url = current_for_maps
                .borrow()
                .as_ref()
                .and_then(|view| view.maps_url.clone());
            if let Some(url) = url {
                if let Err(e) = open::that(&url) {
                    tracing::warn!("Failed to open URL: {}", e);
                }
            }
        });

        Self {
            scrolled,
            flag,
            name,
            official_name,
            capital,
            region,
            population,
            area,
            languages,
            favorite_button,
            maps_button,
            current,
        }
    }

    pub fn fill(&self, view: &DetailView, is_favorite: bool, flags: &FlagCache) {
        let flag_changed = self
            .current
            .borrow()
            .as_ref()
            .map_or(true, |shown| shown.flag_url != view.flag_url);

        self.name.set_label(&view.name);
        self.official_name.set_label(view.official_name.as_deref().unwrap_or_default());
        self.official_name.set_visible(view.official_name.is_some());
        self.capital.set_label(&view.capital);
        match &view.subregion {
            Some(subregion) => self.region.set_label(&format!("{} · {}", view.region, subregion)),
            None => self.region.set_label(&view.region),
        }
        self.population.set_label(&view.population);
        self.area.set_label(&view.area);
        self.languages.set_label(&view.languages);
        self.favorite_button.set_label(favorite_label(is_favorite));
        self.maps_button.set_visible(view.maps_url.is_some());

        if flag_changed {
            self.flag.set_paintable(None::<&gdk::Paintable>);
            let alt = format!("{} Flag", view.name);
            self.flag.set_alternative_text(Some(alt.as_str()));
            load_flag(&self.flag, &view.flag_url, flags);
        }

        *self.current.borrow_mut() = Some(view.clone());
    }
}

fn add_fact(grid: &gtk::Grid, row: i32, title: &str) -> Label {
    let title_label = Label::builder()
        .label(title)
        .xalign(0.0)
        .build();
    title_label.add_css_class("dim-label");

    let value_label = Label::builder()
        .xalign(0.0)
        .wrap(true)
        .selectable(true)
        .build();

    grid.attach(&title_label, 0, row, 1, 1);
    grid.attach(&value_label, 1, row, 1, 1);
    value_label
}
