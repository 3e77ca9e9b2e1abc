use log::{info, trace};
use serde::Deserialize;

use crate::{Error, ErrorKind};

use super::{Book, BookLookup, Client};

const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// [`BookLookup`] backed by the Google Books volumes API.
#[derive(Debug)]
pub struct GoogleBooks<C: Client = reqwest::blocking::Client> {
    client: C,
    base_url: String,
}

impl<C: Client> Default for GoogleBooks<C> {
    fn default() -> Self {
        Self::with_base_url(GOOGLE_BOOKS_URL)
    }
}

impl<C: Client> GoogleBooks<C> {
    /// Use the public Google Books endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different volumes endpoint, e.g. a proxy or a local stub server.
    #[must_use]
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            client: C::default(),
            base_url: base_url.into(),
        }
    }

    fn volume_url(&self, isbn: &str) -> String {
        format!("{}?q=isbn:{isbn}", self.base_url.trim_end_matches('/'))
    }

    fn get_book_info(&self, isbn: &str) -> Result<Option<Book>, Error> {
        let url = self.volume_url(isbn);
        let GoogleModel { items, error } = self.client.get_json(&url)?;

        if let Some(ApiError { code, message }) = error {
            return Err(Error::new(
                ErrorKind::IO,
                format!("Google Books API responded with {code}: {message}"),
            ));
        }

        trace!("Request was successful");

        Ok(items.into_iter().next().map(Book::from))
    }
}

impl<C: Client> BookLookup for GoogleBooks<C> {
    fn book_by_isbn13(&self, isbn: &str) -> Result<Option<Book>, Error> {
        info!("Searching for ISBN-13 '{isbn}' using Google Books API");
        self.get_book_info(isbn)
    }

    fn book_by_isbn10(&self, isbn: &str) -> Result<Option<Book>, Error> {
        info!("Searching for ISBN-10 '{isbn}' using Google Books API");
        self.get_book_info(isbn)
    }

    fn cover_image(&self, url: &str) -> Result<Vec<u8>, Error> {
        trace!("Downloading cover image from '{url}'");
        self.client.get_bytes(url)
    }
}

// `items` is missing entirely when the query has no matches, `error` is only present when the
// request itself failed (quota, bad key, ...).
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct GoogleModel {
    #[serde(default)]
    items: Vec<Item>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct ApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Item {
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

/// Volume information from the Google Book API
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    image_links: Option<ImageLinks>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
}

impl From<Item> for Book {
    fn from(item: Item) -> Self {
        // Deconstruct to take ownership of fields (avoids cloning).
        let VolumeInfo {
            title,
            authors,
            publisher,
            published_date,
            description,
            categories,
            image_links,
        } = item.volume_info;

        Self {
            title,
            authors,
            publisher,
            published_date,
            subjects: categories,
            description,
            large_thumbnail: image_links.and_then(|links| links.thumbnail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GoogleBooks, GoogleModel};
    use crate::{
        api::{assert_url, impl_text_producer, BookLookup, MockClient, NetworkErrorProducer},
        ErrorKind,
    };

    const GOOGLE_BOOK_JSON: &str = include_str!("../../tests/data/google_book_json.txt");

    impl_text_producer! {
        ValidJsonProducer => Ok(GOOGLE_BOOK_JSON.to_owned()),
        EmptyBookProducer => Ok(
            r#"{
                "kind": "books#volumes",
                "totalItems": 0
            }"#.to_owned()
        ),
        QuotaErrorProducer => Ok(
            r#"{
                "error": {
                    "code": 429,
                    "message": "Quota exceeded for quota metric 'Queries'",
                    "errors": [{ "reason": "rateLimitExceeded" }]
                }
            }"#.to_owned()
        ),
        MalformedProducer => Ok("<html>Service unavailable</html>".to_owned()),
        ImageProducer => Ok("not really a jpeg".to_owned()),
    }

    #[test]
    fn isbn_13_url_format_is_correct() {
        let api = GoogleBooks::<MockClient<ValidJsonProducer>>::new();
        assert!(api.book_by_isbn13("9780735619678").unwrap().is_some());
        assert_url!("https://www.googleapis.com/books/v1/volumes?q=isbn:9780735619678");
    }

    #[test]
    fn isbn_10_url_format_is_correct() {
        let api = GoogleBooks::<MockClient<ValidJsonProducer>>::new();
        assert!(api.book_by_isbn10("0735619670").unwrap().is_some());
        assert_url!("https://www.googleapis.com/books/v1/volumes?q=isbn:0735619670");
    }

    #[test]
    fn custom_base_url_is_used() {
        let api = GoogleBooks::<MockClient<ValidJsonProducer>>::with_base_url(
            "http://localhost:8080/volumes/",
        );
        api.book_by_isbn13("0735619670").unwrap();
        assert_url!("http://localhost:8080/volumes?q=isbn:0735619670");
    }

    #[test]
    fn response_without_items_is_not_found() {
        let api = GoogleBooks::<MockClient<EmptyBookProducer>>::new();
        assert_eq!(None, api.book_by_isbn13("0000000000000").unwrap());
    }

    #[test]
    #[should_panic(expected = "Google Books API responded with 429")]
    fn error_body_is_not_treated_as_not_found() {
        let api = GoogleBooks::<MockClient<QuotaErrorProducer>>::new();
        let res = api.book_by_isbn13("9780735619678");

        assert_eq!(
            Some(ErrorKind::IO),
            res.as_ref().err().map(crate::Error::kind),
            "{res:?}"
        );
        drop(res.unwrap());
    }

    #[test]
    fn network_error_is_propagated() {
        let api = GoogleBooks::<MockClient<NetworkErrorProducer>>::new();
        let err = api.book_by_isbn13("0735619670").unwrap_err();
        assert_eq!(ErrorKind::IO, err.kind());
    }

    #[test]
    fn malformed_response_is_deserialize_error() {
        let api = GoogleBooks::<MockClient<MalformedProducer>>::new();
        let err = api.book_by_isbn10("0735619670").unwrap_err();
        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn cover_image_returns_body_bytes() {
        let api = GoogleBooks::<MockClient<ImageProducer>>::new();
        let bytes = api
            .cover_image("http://books.google.com/books/content?id=QnghAQAAIAAJ")
            .unwrap();

        assert_eq!(b"not really a jpeg".to_vec(), bytes);
        assert_url!("http://books.google.com/books/content?id=QnghAQAAIAAJ");
    }

    #[test]
    fn book_can_be_derived_from_json() {
        let api = GoogleBooks::<MockClient<ValidJsonProducer>>::new();
        let book = api
            .book_by_isbn13("9780735619678")
            .unwrap()
            .expect("fixture contains a single volume");

        assert_eq!(Some("Code Complete"), book.title.as_deref());
        assert_eq!(vec!["Steve McConnell".to_owned()], book.authors);
        assert_eq!(Some("DV-Professional"), book.publisher.as_deref());
        assert_eq!(Some("2004-06-09"), book.published_date.as_deref());
        assert_eq!(vec!["Computers".to_owned()], book.subjects);
        assert!(book
            .description
            .as_deref()
            .unwrap_or_default()
            .starts_with("Widely considered one of the best practical guides"));
        assert_eq!(
            Some("http://books.google.com/books/content?id=LpVCAwAAQBAJ&printsec=frontcover&img=1&zoom=1&source=gbs_api"),
            book.large_thumbnail.as_deref()
        );
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let model: GoogleModel =
            serde_json::from_str(r#"{"items": [{"volumeInfo": {"title": "Untitled"}}]}"#)
                .unwrap();

        let book = super::Book::from(model.items.into_iter().next().unwrap());
        assert_eq!(Some("Untitled"), book.title.as_deref());
        assert!(book.authors.is_empty());
        assert!(book.subjects.is_empty());
        assert_eq!(None, book.large_thumbnail);
    }
}
