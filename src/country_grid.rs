use gtk::prelude::*;
use gtk::{glib, Label, Orientation, ScrolledWindow};
use std::cell::RefCell;
use std::rc::Rc;

use passport::render::{CardView, VIEW_DETAILS_LABEL};
use passport::{Action, FlagLoads, FlagRequest};

/// Flag downloads shared by the grid cards and the detail panel.
pub type FlagCache = Rc<RefCell<FlagLoads<gdk::Texture, gtk::Picture>>>;

#[derive(Clone)]
pub struct CountryGrid {
    pub scrolled: ScrolledWindow,
    flow_box: gtk::FlowBox,
    empty_label: Label,
}

impl CountryGrid {
    pub fn new() -> Self {
        let flow_box = gtk::FlowBox::builder()
            .selection_mode(gtk::SelectionMode::None)
            .homogeneous(true)
            .min_children_per_line(1)
            .max_children_per_line(8)
            .row_spacing(12)
            .column_spacing(12)
            .margin_top(12)
            .margin_bottom(12)
            .margin_start(12)
            .margin_end(12)
            .valign(gtk::Align::Start)
            .build();

        let empty_label = Label::builder()
            .label("No countries match")
            .margin_top(24)
            .visible(false)
            .build();
        empty_label.add_css_class("dim-label");

        let content = gtk::Box::builder()
            .orientation(Orientation::Vertical)
            .build();
        content.append(&empty_label);
        content.append(&flow_box);

        let scrolled = ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .hscrollbar_policy(gtk::PolicyType::Never)
            .build();
        scrolled.set_child(Some(&content));

        Self {
            scrolled,
            flow_box,
            empty_label,
        }
    }

    /// Replaces every card. No diffing.
    pub fn render(&self, cards: &[CardView], show_empty: bool, actions: &flume::Sender<Action>, flags: &FlagCache) {
        while let Some(child) = self.flow_box.first_child() {
            self.flow_box.remove(&child);
        }

        for card in cards {
            self.flow_box.append(&create_country_card(card, actions, flags));
        }

        self.empty_label.set_visible(show_empty && cards.is_empty());
    }
}

fn create_country_card(card: &CardView, actions: &flume::Sender<Action>, flags: &FlagCache) -> gtk::Box {
    let container = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(6)
        .width_request(180)
        .build();
    container.add_css_class("country-card");

    let picture = gtk::Picture::builder()
        .height_request(100)
        .can_shrink(true)
        .content_fit(gtk::ContentFit::Contain)
        .alternative_text(&card.flag_alt)
        .build();
    picture.add_css_class("country-flag");
    load_flag(&picture, &card.flag_url, flags);
    container.append(&picture);

    let name_label = Label::builder()
        .label(&card.name)
        .wrap(true)
        .justify(gtk::Justification::Center)
        .build();
    name_label.add_css_class("country-name");
    container.append(&name_label);

    let details_button = gtk::Button::builder()
        .label(VIEW_DETAILS_LABEL)
        .build();
    let tx = actions.clone();
    let name = card.name.clone();
    details_button.connect_clicked(move |_| {
        let _ = tx.send(Action::ViewDetails(name.clone()));
    });
    container.append(&details_button);

    let favorite_button = gtk::Button::builder()
        .label(card.favorite_label())
        .build();
    if card.is_favorite {
        favorite_button.add_css_class("favorite-active");
    }
    let tx = actions.clone();
    let name = card.name.clone();
    favorite_button.connect_clicked(move |_| {
        let _ = tx.send(Action::ToggleFavorite(name.clone()));
    });
    container.append(&favorite_button);

    container
}

/// Shows the flag at `url` in `picture`. Each URL is downloaded at most once;
/// a download that finishes after `picture` moved to another URL is not shown.
pub fn load_flag(picture: &gtk::Picture, url: &str, flags: &FlagCache) {
    let request = flags.borrow_mut().request(url, picture.clone());
    match request {
        FlagRequest::Ready(texture) => picture.set_paintable(Some(&texture)),
        FlagRequest::Waiting | FlagRequest::Unavailable => {}
        FlagRequest::Start => {
            let url = url.to_string();
            let flags = flags.clone();
            glib::spawn_future_local(async move {
                let texture = download_flag(&url).await;
                let waiters = flags.borrow_mut().finish(&url, texture.clone());
                if let Some(texture) = texture {
                    for picture in waiters {
                        picture.set_paintable(Some(&texture));
                    }
                }
            });
        }
    }
}

async fn download_flag(url: &str) -> Option<gdk::Texture> {
    let response = match reqwest::get(url).await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Failed to load flag {}: {}", url, e);
            return None;
        }
    };
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Failed to read flag {}: {}", url, e);
            return None;
        }
    };
    let bytes = glib::Bytes::from(&bytes.to_vec());
    match gdk::Texture::from_bytes(&bytes) {
        Ok(texture) => Some(texture),
        Err(e) => {
            tracing::debug!("Cannot decode flag {}: {}", url, e);
            None
        }
    }
}
