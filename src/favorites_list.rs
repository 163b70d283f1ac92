use gtk::prelude::*;
use gtk::{Label, ListBox, Orientation, Popover, ScrolledWindow};

use passport::render::FavoriteEntry;
use passport::Action;

/// Popover listing the favorites, anchored to the header button.
#[derive(Clone)]
pub struct FavoritesList {
    pub button: gtk::Button,
    popover: Popover,
    list: ListBox,
}

impl FavoritesList {
    pub fn new(actions: &flume::Sender<Action>) -> Self {
        let button = gtk::Button::builder()
            .icon_name("starred-symbolic")
            .tooltip_text("Favorites")
            .build();

        let popover = Popover::builder().build();
        popover.add_css_class("favorites-popover");

        let popover_box = gtk::Box::builder()
            .orientation(Orientation::Vertical)
            .spacing(8)
            .margin_top(8)
            .margin_bottom(8)
            .margin_start(8)
            .margin_end(8)
            .build();

        let header = gtk::Box::builder()
            .orientation(Orientation::Horizontal)
            .spacing(8)
            .build();
        let title = Label::builder()
            .label("Favorites")
            .xalign(0.0)
            .hexpand(true)
            .build();
        title.add_css_class("heading");
        let close_button = gtk::Button::builder()
            .icon_name("window-close-symbolic")
            .tooltip_text("Close favorites")
            .build();
        close_button.add_css_class("flat");
        header.append(&title);
        header.append(&close_button);
        popover_box.append(&header);

        let list = ListBox::builder()
            .selection_mode(gtk::SelectionMode::None)
            .build();
        list.add_css_class("boxed-list");

        let scrolled = ScrolledWindow::builder()
            .min_content_height(60)
            .max_content_height(360)
            .min_content_width(240)
            .propagate_natural_height(true)
            .hscrollbar_policy(gtk::PolicyType::Never)
            .build();
        scrolled.set_child(Some(&list));
        popover_box.append(&scrolled);

        popover.set_child(Some(&popover_box));
        popover.set_parent(&button);

        let tx = actions.clone();
        button.connect_clicked(move |_| {
            let _ = tx.send(Action::OpenFavorites);
        });

        let tx = actions.clone();
        close_button.connect_clicked(move |_| {
            let _ = tx.send(Action::CloseFavorites);
        });

        // Escape or clicking outside closes the popover without going through us
        let tx = actions.clone();
        popover.connect_closed(move |_| {
            let _ = tx.send(Action::CloseFavorites);
        });

        let tx = actions.clone();
        list.connect_row_activated(move |_, row| {
            if let Some(name) = row.child().and_then(|child| child.downcast::<Label>().ok()) {
                let _ = tx.send(Action::ShowFavorite(name.label().to_string()));
            }
        });

        Self {
            button,
            popover,
            list,
        }
    }

    pub fn render(&self, entries: &[FavoriteEntry], open: bool) {
        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }

        if entries.is_empty() {
            let empty = Label::builder()
                .label("No favorites yet")
                .margin_top(12)
                .margin_bottom(12)
                .build();
            empty.add_css_class("dim-label");
            let row = gtk::ListBoxRow::builder()
                .child(&empty)
                .activatable(false)
                .build();
            self.list.append(&row);
        }

        for entry in entries {
            let label = Label::builder()
                .label(&entry.name)
                .xalign(0.0)
                .margin_top(8)
                .margin_bottom(8)
                .margin_start(10)
                .margin_end(10)
                .build();
            let row = gtk::ListBoxRow::builder()
                .child(&label)
                .activatable(true)
                .build();
            self.list.append(&row);
        }

        if open && !self.popover.is_visible() {
            self.popover.popup();
        } else if !open && self.popover.is_visible() {
            self.popover.popdown();
        }
    }
}
