//! The product catalog and its reference tables.
//!
//! [`CatalogStore`] is the seam the import action writes through. [`Catalog`] is the in-memory
//! implementation which can be persisted as JSON, see [`crate::file`].

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{Error, ErrorKind};

/// Identifier of a product or reference row. Ids are unique across a whole [`Catalog`].
pub type Id = u64;

/// The named reference tables a product links to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    /// Book authors.
    Author,
    /// Publishers.
    Editorial,
    /// Literary genres.
    Genre,
}

impl ReferenceKind {
    /// Lowercase display name of the table.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Editorial => "editorial",
            Self::Genre => "genre",
        }
    }
}

/// A row of one of the reference tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Row id.
    pub id: Id,
    /// Name as it was created, duplicates by near-name are allowed.
    pub name: String,
}

/// A book in the catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Row id.
    pub id: Id,
    /// Title of the book.
    pub name: String,
    /// Barcode, which for books is the ISBN (hyphens allowed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Year of the edition, usually four digits but may be any text the metadata service returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_edition: Option<String>,
    /// Link to the author table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<Id>,
    /// Link to the editorial table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editorial_id: Option<Id>,
    /// Link to the genre table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<Id>,
    /// Long form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cover image, base64 encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A set of field values to write to a [`Product`] in a single update.
///
/// Fields left as `None` are not touched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    /// New title.
    pub name: Option<String>,
    /// New edition year.
    pub year_edition: Option<String>,
    /// New author link.
    pub author_id: Option<Id>,
    /// New editorial link.
    pub editorial_id: Option<Id>,
    /// New genre link.
    pub genre_id: Option<Id>,
    /// New description.
    pub description: Option<String>,
    /// New base64 encoded cover image.
    pub image: Option<String>,
}

impl ProductUpdate {
    /// `true` when the update would not change any field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.year_edition.is_none()
            && self.author_id.is_none()
            && self.editorial_id.is_none()
            && self.genre_id.is_none()
            && self.description.is_none()
            && self.image.is_none()
    }

    fn apply(self, product: &mut Product) {
        let Self {
            name,
            year_edition,
            author_id,
            editorial_id,
            genre_id,
            description,
            image,
        } = self;

        if let Some(name) = name {
            product.name = name;
        }
        product.year_edition = year_edition.or(product.year_edition.take());
        product.author_id = author_id.or(product.author_id);
        product.editorial_id = editorial_id.or(product.editorial_id);
        product.genre_id = genre_id.or(product.genre_id);
        product.description = description.or(product.description.take());
        product.image = image.or(product.image.take());
    }
}

/// Storage operations the import action needs from the catalog.
pub trait CatalogStore {
    /// Read a product by id.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::NoValue`] error is returned when no product has the id.
    fn product(&self, id: Id) -> Result<Product, Error>;

    /// Case-insensitive substring search of a reference table by name, in id order.
    fn search_references(&self, kind: ReferenceKind, pattern: &str) -> Vec<Reference>;

    /// Create a new row in a reference table.
    ///
    /// # Errors
    ///
    /// An `Err` is returned when the row cannot be stored.
    fn create_reference(&mut self, kind: ReferenceKind, name: &str) -> Result<Reference, Error>;

    /// Write all the values of `update` to a product at once.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::NoValue`] error is returned when no product has the id.
    fn write_product(&mut self, id: Id, update: ProductUpdate) -> Result<(), Error>;
}

/// An in-memory catalog of products and their reference tables.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(skip)]
    dirty: bool,
    #[serde(default)]
    last_id: Id,
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    authors: Vec<Reference>,
    #[serde(default)]
    editorials: Vec<Reference>,
    #[serde(default)]
    genres: Vec<Reference>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks and resets the `dirty` flag.
    ///
    /// The `dirty` flag is `true` when this catalog has been edited since it was created or since
    /// the last call to this function.
    pub fn dirty(&mut self) -> bool {
        let dirty = self.dirty;
        self.dirty = false;
        dirty
    }

    fn next_id(&mut self) -> Id {
        self.last_id += 1;
        self.last_id
    }

    /// Add a new product and return its id.
    pub fn insert_product<S: Into<String>>(&mut self, name: S, barcode: Option<String>) -> Id {
        let id = self.next_id();
        self.products.push(Product {
            id,
            name: name.into(),
            barcode,
            ..Product::default()
        });
        self.dirty = true;
        id
    }

    /// Remove a product, returns `true` if it existed.
    pub fn remove_product(&mut self, id: Id) -> bool {
        let len = self.products.len();
        self.products.retain(|p| p.id != id);
        let removed = len != self.products.len();
        self.dirty |= removed;
        removed
    }

    /// All products in id order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Find the first product with exactly this barcode.
    #[must_use]
    pub fn find_by_barcode(&self, barcode: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.barcode.as_deref() == Some(barcode))
    }

    /// All rows of a reference table in id order.
    #[must_use]
    pub fn references(&self, kind: ReferenceKind) -> &[Reference] {
        self.table(kind)
    }

    /// Find a reference row by id.
    #[must_use]
    pub fn reference(&self, kind: ReferenceKind, id: Id) -> Option<&Reference> {
        self.table(kind).iter().find(|r| r.id == id)
    }

    fn table(&self, kind: ReferenceKind) -> &Vec<Reference> {
        match kind {
            ReferenceKind::Author => &self.authors,
            ReferenceKind::Editorial => &self.editorials,
            ReferenceKind::Genre => &self.genres,
        }
    }

    fn table_mut(&mut self, kind: ReferenceKind) -> &mut Vec<Reference> {
        match kind {
            ReferenceKind::Author => &mut self.authors,
            ReferenceKind::Editorial => &mut self.editorials,
            ReferenceKind::Genre => &mut self.genres,
        }
    }

    fn no_product(id: Id) -> Error {
        Error::new(ErrorKind::NoValue, format!("No product found with the id {id}"))
    }
}

impl CatalogStore for Catalog {
    fn product(&self, id: Id) -> Result<Product, Error> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Self::no_product(id))
    }

    fn search_references(&self, kind: ReferenceKind, pattern: &str) -> Vec<Reference> {
        let pattern = pattern.to_lowercase();
        self.table(kind)
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&pattern))
            .cloned()
            .collect()
    }

    fn create_reference(&mut self, kind: ReferenceKind, name: &str) -> Result<Reference, Error> {
        let reference = Reference {
            id: self.next_id(),
            name: name.to_owned(),
        };
        trace!(
            "Creating {} '{}' with id {}",
            kind.name(),
            reference.name,
            reference.id
        );
        self.table_mut(kind).push(reference.clone());
        self.dirty = true;
        Ok(reference)
    }

    fn write_product(&mut self, id: Id, update: ProductUpdate) -> Result<(), Error> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Self::no_product(id))?;

        if !update.is_empty() {
            update.apply(product);
            self.dirty = true;
        }
        Ok(())
    }
}
