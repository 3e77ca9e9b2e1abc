//! Find-or-create resolvers for the author, editorial and genre tables.
//!
//! A name matches every row containing it, ignoring case, so several rows may match. When that
//! happens a row with exactly the same name wins, otherwise the first row in id order is used.
//! Nothing stops near-duplicates from being created, the resolvers never fail because of them.

use log::trace;

use crate::{
    catalog::{CatalogStore, Reference, ReferenceKind},
    Error,
};

/// Find a reference row by name or create one if nothing matches.
///
/// # Errors
///
/// An `Err` is returned when a new row cannot be created in the store.
pub fn get_or_create<S>(store: &mut S, kind: ReferenceKind, name: &str) -> Result<Reference, Error>
where
    S: CatalogStore + ?Sized,
{
    let mut found = store.search_references(kind, name);

    if found.is_empty() {
        trace!("No {} found matching '{name}'", kind.name());
        return store.create_reference(kind, name);
    }

    if found.len() > 1 {
        trace!(
            "{} {} rows match '{name}' - preferring an exact match",
            found.len(),
            kind.name()
        );
        if let Some(index) = found.iter().position(|r| r.name == name) {
            return Ok(found.swap_remove(index));
        }
    }

    Ok(found.swap_remove(0))
}

/// Resolve an author by name.
///
/// # Errors
///
/// See [`get_or_create`].
#[inline]
pub fn author<S: CatalogStore + ?Sized>(store: &mut S, name: &str) -> Result<Reference, Error> {
    get_or_create(store, ReferenceKind::Author, name)
}

/// Resolve an editorial (publisher) by name.
///
/// # Errors
///
/// See [`get_or_create`].
#[inline]
pub fn editorial<S: CatalogStore + ?Sized>(store: &mut S, name: &str) -> Result<Reference, Error> {
    get_or_create(store, ReferenceKind::Editorial, name)
}

/// Resolve the genre of a book from its list of subjects.
///
/// Only the first subject is used, `Ok(None)` is returned when there are no subjects.
///
/// # Errors
///
/// See [`get_or_create`].
pub fn genre<S, T>(store: &mut S, subjects: &[T]) -> Result<Option<Reference>, Error>
where
    S: CatalogStore + ?Sized,
    T: AsRef<str>,
{
    subjects
        .first()
        .map(|subject| get_or_create(store, ReferenceKind::Genre, subject.as_ref()))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn catalog_with(kind: ReferenceKind, names: &[&str]) -> Catalog {
        let mut catalog = Catalog::new();
        for name in names {
            catalog.create_reference(kind, name).unwrap();
        }
        catalog
    }

    #[test]
    fn creates_when_absent() {
        let mut catalog = Catalog::new();
        let created = author(&mut catalog, "Ursula K. Le Guin").unwrap();

        assert_eq!("Ursula K. Le Guin", created.name);
        assert_eq!(
            vec![created.clone()],
            catalog.references(ReferenceKind::Author)
        );

        // second call finds the row instead of creating another one
        assert_eq!(created, author(&mut catalog, "ursula k. le guin").unwrap());
        assert_eq!(1, catalog.references(ReferenceKind::Author).len());
    }

    #[test]
    fn single_substring_match_is_reused() {
        let mut catalog = catalog_with(ReferenceKind::Editorial, &["Penguin Random House"]);
        let found = editorial(&mut catalog, "Penguin").unwrap();

        assert_eq!("Penguin Random House", found.name);
        assert_eq!(1, catalog.references(ReferenceKind::Editorial).len());
    }

    #[test]
    fn exact_match_wins_among_duplicates() {
        let mut catalog = catalog_with(
            ReferenceKind::Editorial,
            &["Penguin Random House", "penguin", "Penguin"],
        );
        let found = editorial(&mut catalog, "Penguin").unwrap();

        assert_eq!("Penguin", found.name);
        assert_eq!(3, found.id);
    }

    #[test]
    fn first_match_in_id_order_without_exact_match() {
        let mut catalog = catalog_with(
            ReferenceKind::Author,
            &["J. R. R. Tolkien", "Christopher Tolkien"],
        );

        for _ in 0..3 {
            let found = author(&mut catalog, "tolkien").unwrap();
            assert_eq!("J. R. R. Tolkien", found.name);
        }
        assert_eq!(2, catalog.references(ReferenceKind::Author).len());
    }

    #[test]
    fn genre_uses_first_subject_only() {
        let mut catalog = Catalog::new();
        let found = genre(&mut catalog, &["Fiction", "Science Fiction"][..])
            .unwrap()
            .expect("a subject was given");

        assert_eq!("Fiction", found.name);
        assert_eq!(1, catalog.references(ReferenceKind::Genre).len());
    }

    #[test]
    fn genre_without_subjects_is_none() {
        let mut catalog = Catalog::new();
        assert_eq!(None, genre::<_, &str>(&mut catalog, &[]).unwrap());
        assert!(catalog.references(ReferenceKind::Genre).is_empty());
    }
}
