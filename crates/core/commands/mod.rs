mod show;

use bookstore::{
    api::GoogleBooks,
    catalog::{Catalog, CatalogStore, Id},
    import::{self, Notifier},
};

use crate::notify::format_notification;

use clap::Subcommand;
use eyre::{eyre, Result};
use log::{trace, warn};

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Add a new book to the catalog
    #[clap(arg_required_else_help = true)]
    Add {
        /// Title of the book, can be left empty and filled in by `import`
        name: String,
        /// Barcode of the book, this is the ISBN used by `import`
        #[clap(short, long)]
        barcode: Option<String>,
    },

    /// Fill in missing book data using the barcode of each book as the ISBN
    ///
    /// The title and edition year are always replaced with the values found. The author,
    /// editorial, genre, description and cover image are only set when the book does not have
    /// one yet.
    #[clap(arg_required_else_help = true)]
    Import {
        /// Ids of the books to import data for
        #[clap(required = true)]
        ids: Vec<Id>,
        /// Google Books volumes endpoint to use instead of the public one
        #[clap(long)]
        api_url: Option<String>,
    },

    /// List all the books in the catalog
    List,

    /// Show all the data of a single book
    #[clap(arg_required_else_help = true)]
    Show {
        /// Id of the book
        id: Id,
    },

    /// Remove a book from the catalog
    #[clap(arg_required_else_help = true)]
    Rm {
        /// Id of the book
        id: Id,
    },
}

impl Commands {
    pub fn execute(self, catalog: &mut Catalog, notifier: &mut dyn Notifier) -> Result<String> {
        match self {
            Commands::Add { name, barcode } => {
                if let Some(barcode) = &barcode {
                    if let Some(existing) = catalog.find_by_barcode(barcode) {
                        warn!(
                            "The book with the id {} already has the barcode '{barcode}'",
                            existing.id
                        );
                    }
                }
                let id = catalog.insert_product(name, barcode);
                Ok(format!("Added book with the id {id}"))
            }
            Commands::Import { ids, api_url } => {
                let lookup: GoogleBooks = match api_url {
                    Some(url) => {
                        trace!("Using '{url}' as the Google Books endpoint");
                        GoogleBooks::with_base_url(url)
                    }
                    None => GoogleBooks::new(),
                };

                match import::import_from_isbn(catalog, &lookup, notifier, &ids)? {
                    Some(warning) => Ok(format_notification(&warning)),
                    None => Ok(format!("Book data imported for {} book(s)", ids.len())),
                }
            }
            Commands::List => Ok(show::list(catalog)),
            Commands::Show { id } => {
                let product = catalog.product(id)?;
                Ok(show::product(catalog, &product))
            }
            Commands::Rm { id } => {
                trace!("Checking the catalog for a book with this id..");
                if catalog.remove_product(id) {
                    Ok("Book removed from the catalog".to_owned())
                } else {
                    Err(eyre!("No book found with the id {id}"))
                }
            }
        }
    }
}
