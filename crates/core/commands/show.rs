use std::fmt::Write;

use bookstore::catalog::{Catalog, Id, Product, ReferenceKind};

pub fn list(catalog: &Catalog) -> String {
    let mut out = String::new();
    for product in catalog.products() {
        let _ = writeln!(
            out,
            "{}\t{}\t{}",
            product.id,
            product.barcode.as_deref().unwrap_or("-"),
            title(product)
        );
    }

    if out.is_empty() {
        "The catalog is empty".to_owned()
    } else {
        out.pop();
        out
    }
}

pub fn product(catalog: &Catalog, product: &Product) -> String {
    let reference = |kind, id| reference_name(catalog, kind, id);

    let mut out = String::new();
    let _ = writeln!(out, "id:          {}", product.id);
    let _ = writeln!(out, "title:       {}", title(product));
    let _ = writeln!(
        out,
        "barcode:     {}",
        product.barcode.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "year:        {}",
        product.year_edition.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "author:      {}",
        reference(ReferenceKind::Author, product.author_id)
    );
    let _ = writeln!(
        out,
        "editorial:   {}",
        reference(ReferenceKind::Editorial, product.editorial_id)
    );
    let _ = writeln!(
        out,
        "genre:       {}",
        reference(ReferenceKind::Genre, product.genre_id)
    );
    let _ = writeln!(
        out,
        "cover:       {}",
        if product.image.is_some() { "yes" } else { "no" }
    );
    let _ = write!(
        out,
        "description: {}",
        product.description.as_deref().unwrap_or("-")
    );
    out
}

fn reference_name(catalog: &Catalog, kind: ReferenceKind, id: Option<Id>) -> &str {
    id.and_then(|id| catalog.reference(kind, id))
        .map_or("-", |r| r.name.as_str())
}

fn title(product: &Product) -> &str {
    if product.name.is_empty() {
        "(untitled)"
    } else {
        &product.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore::catalog::{CatalogStore, ProductUpdate};

    #[test]
    fn empty_catalog_message() {
        assert_eq!("The catalog is empty", list(&Catalog::new()));
    }

    #[test]
    fn list_has_one_line_per_book() {
        let mut catalog = Catalog::new();
        catalog.insert_product("Dune", Some("9780441013593".to_owned()));
        catalog.insert_product("", None);

        assert_eq!("1\t9780441013593\tDune\n2\t-\t(untitled)", list(&catalog));
    }

    #[test]
    fn product_shows_reference_names() {
        let mut catalog = Catalog::new();
        let id = catalog.insert_product("Dune", None);
        let author = catalog
            .create_reference(ReferenceKind::Author, "Frank Herbert")
            .unwrap();
        catalog
            .write_product(
                id,
                ProductUpdate {
                    author_id: Some(author.id),
                    ..ProductUpdate::default()
                },
            )
            .unwrap();

        let shown = product(&catalog, &catalog.product(id).unwrap());
        assert!(shown.contains("author:      Frank Herbert"));
        assert!(shown.contains("editorial:   -"));
        assert!(shown.contains("cover:       no"));
    }
}
