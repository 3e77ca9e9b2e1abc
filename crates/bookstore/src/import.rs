//! Import book data from a metadata service into catalog products, using the product barcode as
//! the ISBN.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Datelike, NaiveDate};
use log::{info, trace, warn};

use crate::{
    api::{Book, BookLookup},
    catalog::{CatalogStore, Id, Product, ProductUpdate},
    reference, Error,
};

/// How a [`Notification`] should be presented.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    /// The operation succeeded.
    Success,
    /// The operation did not do anything, but nothing went wrong either.
    Warning,
}

/// A non-blocking message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Presentation of the notification.
    pub kind: NotificationKind,
    /// Short heading, if any.
    pub title: Option<String>,
    /// The message itself.
    pub message: String,
    /// Whether the notification stays until dismissed.
    pub sticky: bool,
}

impl Notification {
    /// A success notification with only a message.
    #[must_use]
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: None,
            message: message.into(),
            sticky: false,
        }
    }

    /// The sticky warning returned when no book matched the ISBN.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            kind: NotificationKind::Warning,
            title: Some("Warning".to_owned()),
            message: "No book found with this data".to_owned(),
            sticky: true,
        }
    }
}

/// A side channel for [`Notification`]s sent while an action is still running.
pub trait Notifier {
    /// Deliver a notification to the user.
    fn notify(&mut self, notification: Notification);
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Fill in missing data of the products `ids` from the book found using each product's barcode.
///
/// Every product is processed in turn: the barcode is stripped of hyphens and looked up as an
/// ISBN-13 first and then as an ISBN-10. When a book is found its title and edition year are always
/// written, while the author, editorial, genre, description and cover image are only written when
/// the product does not have one yet. All changes to a product are written at once and then a
/// success notification is sent through `notifier`.
///
/// When no book is found for a product, a "not found" warning [`Notification`] is returned and
/// the remaining products are skipped. Products processed before it keep their changes.
///
/// # Errors
///
/// An [`ErrorKind::MissingIsbn`][crate::ErrorKind::MissingIsbn] error is returned, before anything
/// is written, when any of the products has no barcode.
/// An `Err` is returned when a product does not exist, or when the lookup service or the image
/// download fails.
pub fn import_from_isbn<S, L, N>(
    store: &mut S,
    lookup: &L,
    notifier: &mut N,
    ids: &[Id],
) -> Result<Option<Notification>, Error>
where
    S: CatalogStore + ?Sized,
    L: BookLookup + ?Sized,
    N: Notifier + ?Sized,
{
    let products = ids
        .iter()
        .map(|&id| store.product(id))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(product) = products.iter().find(|p| !has_barcode(p)) {
        warn!("Product {} has no barcode to use as the ISBN", product.id);
        return Err(Error::missing_isbn());
    }

    for (index, &id) in ids.iter().enumerate() {
        if ids[..index].contains(&id) {
            trace!("Product {id} was already imported");
            continue;
        }

        // earlier products may have created references this one should see
        let product = store.product(id)?;
        let isbn = product.barcode.as_deref().unwrap_or_default().replace('-', "");

        let book = match lookup.book_by_isbn13(&isbn)? {
            Some(book) => book,
            None => match lookup.book_by_isbn10(&isbn)? {
                Some(book) => book,
                None => {
                    info!("No book found for ISBN '{isbn}'");
                    return Ok(Some(Notification::not_found()));
                }
            },
        };

        let update = book_update(store, lookup, &product, book)?;
        trace!("Writing book data to product {id}: {update:?}");
        store.write_product(id, update)?;

        notifier.notify(Notification::success(
            "Book data updated from Google Books API",
        ));
    }

    Ok(None)
}

fn has_barcode(product: &Product) -> bool {
    product.barcode.as_deref().is_some_and(|b| !b.is_empty())
}

// The service sometimes returns empty strings instead of leaving a value out.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn book_update<S, L>(
    store: &mut S,
    lookup: &L,
    product: &Product,
    book: Book,
) -> Result<ProductUpdate, Error>
where
    S: CatalogStore + ?Sized,
    L: BookLookup + ?Sized,
{
    // Deconstruct book to take ownership of fields (avoids cloning).
    let Book {
        title,
        authors,
        publisher,
        published_date,
        mut subjects,
        description,
        large_thumbnail,
    } = book;

    let mut update = ProductUpdate {
        name: non_empty(title),
        year_edition: non_empty(published_date).as_deref().map(parse_year_edition),
        ..ProductUpdate::default()
    };

    if is_blank(product.description.as_deref()) {
        update.description = non_empty(description);
    }

    // The cover is downloaded before any reference is resolved so a failed download leaves the
    // store untouched.
    if is_blank(product.image.as_deref()) {
        if let Some(url) = non_empty(large_thumbnail) {
            let bytes = lookup.cover_image(&url)?;
            update.image = Some(STANDARD.encode(bytes));
        }
    }

    if product.author_id.is_none() {
        if let Some(name) = non_empty(authors.into_iter().next()) {
            update.author_id = Some(reference::author(store, &name)?.id);
        }
    }

    if product.editorial_id.is_none() {
        if let Some(name) = non_empty(publisher) {
            update.editorial_id = Some(reference::editorial(store, &name)?.id);
        }
    }

    if product.genre_id.is_none() {
        subjects.retain(|s| !s.is_empty());
        update.genre_id = reference::genre(store, subjects.as_slice())?.map(|r| r.id);
    }

    Ok(update)
}

fn is_blank(value: Option<&str>) -> bool {
    value.unwrap_or_default().is_empty()
}

/// Convert a published date into the edition year.
///
/// A full `YYYY-MM-DD` date is reduced to its year, anything else is kept as it is.
#[must_use]
pub fn parse_year_edition(published_date: &str) -> String {
    NaiveDate::parse_from_str(published_date, "%Y-%m-%d").map_or_else(
        |_| published_date.to_owned(),
        |date| date.year().to_string(),
    )
}
