//! Book metadata lookup over HTTP.
//!
//! The import action only depends on the [`BookLookup`] trait; [`GoogleBooks`] is the
//! implementation used by default and talks to the API through a [`Client`].

use serde::de::DeserializeOwned;

mod google_books;

pub use google_books::GoogleBooks;

use crate::{Error, ErrorKind};

/// Book metadata as returned by a lookup service.
///
/// Every field is optional as the upstream API omits anything it does not know about.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Book {
    /// Title of the book.
    pub title: Option<String>,
    /// Authors in the order listed by the service.
    pub authors: Vec<String>,
    /// Publisher (editorial) name.
    pub publisher: Option<String>,
    /// Published date exactly as returned, e.g. `2004`, `2004-06` or `2004-06-09`.
    pub published_date: Option<String>,
    /// Subjects or categories of the book.
    pub subjects: Vec<String>,
    /// Long form description.
    pub description: Option<String>,
    /// URL of the largest cover thumbnail available.
    pub large_thumbnail: Option<String>,
}

/// A service able to find [`Book`] metadata by ISBN and download cover images.
pub trait BookLookup {
    /// Lookup a book using an ISBN-13 string.
    ///
    /// # Errors
    ///
    /// An `Err` is returned when the service cannot be reached or its response cannot be parsed,
    /// a lookup that simply has no match returns `Ok(None)`.
    fn book_by_isbn13(&self, isbn: &str) -> Result<Option<Book>, Error>;

    /// Lookup a book using an ISBN-10 string.
    ///
    /// # Errors
    ///
    /// Same as [`BookLookup::book_by_isbn13`].
    fn book_by_isbn10(&self, isbn: &str) -> Result<Option<Book>, Error>;

    /// Download the raw bytes of a cover image.
    ///
    /// # Errors
    ///
    /// An `Err` is returned when the image cannot be fetched.
    fn cover_image(&self, url: &str) -> Result<Vec<u8>, Error>;
}

/// Minimal blocking HTTP client used by the lookup services.
pub trait Client
where
    Self: Default,
{
    /// GET `url` and deserialize the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::IO`] error if the request fails or the response status is not a
    /// success, and an
    /// [`ErrorKind::Deserialize`] error if the body is not the expected JSON.
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;

    /// GET `url` and return the body as bytes.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::IO`] error if the request fails, the response status is not a
    /// success or reading the body fails.
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, Error>;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| Error::wrap(ErrorKind::IO, e))
            .and_then(|r| r.json().map_err(|e| Error::wrap(ErrorKind::Deserialize, e)))
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, Error> {
        let resp = self
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;
        resp.bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|e| Error::wrap(ErrorKind::IO, e))
    }
}

#[cfg(test)]
pub(crate) use test::{assert_url, impl_text_producer, MockClient, NetworkErrorProducer};
