#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # bookstore
//!
//! bookstore keeps a catalog of books and fills in missing book data, such as the title, author,
//! editorial, genre, description and cover, by looking up the barcode of a product as an ISBN
//! using the Google Books API.
//!
//! ```no_run
//! use bookstore::{catalog::Catalog, import::Notification};
//!
//! fn main() -> Result<(), bookstore::Error> {
//!     let mut catalog = Catalog::new();
//!     let id = catalog.insert_product("", Some("978-0-7356-1967-8".to_owned()));
//!
//!     let mut sent: Vec<Notification> = Vec::new();
//!     if let Some(warning) = bookstore::import_from_isbn(&mut catalog, &mut sent, &[id])? {
//!         println!("{}", warning.message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod catalog;
mod error;
#[cfg(feature = "file")]
pub mod file;
pub mod import;
pub mod reference;

use catalog::{CatalogStore, Id};
pub use error::{Error, ErrorKind};
use import::{Notification, Notifier};

use log::trace;

/// Import book data for the products `ids` using the default Google Books API.
///
/// See [`import::import_from_isbn`] for the details of what is written.
///
/// # Errors
///
/// An `Err` is returned when a product has no barcode, when a product does not exist or when the
/// API cannot be reached.
#[inline]
pub fn import_from_isbn<S, N>(
    store: &mut S,
    notifier: &mut N,
    ids: &[Id],
) -> Result<Option<Notification>, Error>
where
    S: CatalogStore + ?Sized,
    N: Notifier + ?Sized,
{
    trace!("Import book data for products {ids:?}");
    let lookup: api::GoogleBooks = api::GoogleBooks::new();
    import::import_from_isbn(store, &lookup, notifier, ids)
}
