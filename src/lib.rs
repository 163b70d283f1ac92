//! Passport: browse the REST Countries list, filter it, and keep favorites.
//!
//! The library holds all state and logic and never touches a widget:
//!
//! - [`catalog`]: fetches and queries the country list
//! - [`filter`]: search, language and region criteria
//! - [`favorites`]: the bookmark list and its key/value storage
//! - [`render`]: view models for cards, favorites and the detail panel
//! - [`detail`]: grid/detail view state
//! - [`flags`]: which flag downloads are running, done or failed
//! - [`app`]: ties the above together behind typed [`app::Action`]s
//!
//! The GTK front end lives in the `passport` binary (feature `gui`).

pub mod app;
pub mod catalog;
pub mod config;
pub mod data;
pub mod detail;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod flags;
pub mod logging;
pub mod render;

pub use app::{Action, App, LoadState};
pub use catalog::Catalog;
pub use config::Config;
pub use data::Country;
pub use error::{FetchError, PassportError, Result};
pub use favorites::{FavoritesStore, FileStorage, MemoryStorage, Storage, Toggled};
pub use filter::{Criteria, FilterMode};
pub use flags::{FlagLoads, FlagRequest};
