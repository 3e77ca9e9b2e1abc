//! Catalog persistence on the filesystem.
//!
//! A catalog is stored as a single JSON document. [`CatalogFile`] keeps the file open for reading
//! and writing so a command can load the catalog, change it, and write it back in place.

use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, Write},
    path::{Path, PathBuf},
};

use crate::{catalog::Catalog, Error, ErrorKind};

use glob::glob;
use log::{info, trace};

/// File extension of catalog files.
pub const EXT: &str = "json";

const DEFAULT_NAME: &str = "catalog";

/// An open catalog file on the filesystem.
///
/// `CatalogFile`s are automatically closed when they go out of scope. Errors detected on closing
/// are ignored by the implementation of `Drop`.
#[derive(Debug)]
pub struct CatalogFile {
    file: File,
    path: PathBuf,
}

impl CatalogFile {
    const fn new(file: File, path: PathBuf) -> Self {
        Self { file, path }
    }

    /// Attempts to open a catalog file in read and write mode.
    ///
    /// The `.json` extension is added when `path` does not already have it.
    ///
    /// # Errors
    /// This function will return an error if `path` does not already exist or the user lacks
    /// permissions to open the file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        open_file_for_read_and_write(path.as_ref().with_extension(EXT))
    }

    /// Creates a new catalog file in read and write mode.
    ///
    /// # Errors
    /// This function will return an error if the file already exists or the user lacks
    /// permissions to create it.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        create_file_for_read_and_write(path.as_ref().with_extension(EXT))
    }

    /// Attempts to find a single catalog file in the directory.
    ///
    /// # Errors
    /// This function will return an error if:
    /// - The path is not a directory
    /// - No catalog file, or more than one, can be found in the directory
    /// - User lacks permissions to open the file
    pub fn find<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        find_catalog_file_in_directory(dir.as_ref())
    }

    /// Open the catalog file at `path`, creating it when it does not exist yet. Without a path,
    /// find the catalog file in the current directory or create a new `catalog.json` file when
    /// there is none.
    ///
    /// # Errors
    /// This function will return an error if the file cannot be opened or created.
    pub fn open_or_create(path: Option<PathBuf>) -> Result<Self, Error> {
        if let Some(path) = path {
            let path = path.with_extension(EXT);
            if path.exists() {
                trace!("opening {} as a catalog file", path.display());
                return Self::open(path);
            }
            info!("Creating the new catalog file `{}`", path.display());
            return Self::create(path);
        }

        trace!("Searching current directory for a catalog file");
        match Self::find(".") {
            Ok(file) => Ok(file),
            Err(_) => {
                let path = PathBuf::from(DEFAULT_NAME).with_extension(EXT);
                info!(
                    "No .{EXT} file found in current directory - creating the new file `{}`",
                    path.display()
                );
                Self::create(path)
            }
        }
    }

    /// Path of the open file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole catalog, an empty file is an empty catalog.
    ///
    /// # Errors
    /// Returns an [`ErrorKind::IO`] error when the file cannot be read and an
    /// [`ErrorKind::Deserialize`] error when it is not a valid catalog.
    pub fn read(&mut self) -> Result<Catalog, Error> {
        let mut content = String::new();
        self.file.rewind().map_err(|e| Error::wrap(ErrorKind::IO, e))?;
        let bytes = self
            .file
            .read_to_string(&mut content)
            .map_err(|e| Error::wrap_with(ErrorKind::IO, e, "Cannot read contents of file"))?;
        trace!("{bytes} read from the file");

        if content.trim().is_empty() {
            return Ok(Catalog::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            Error::wrap_with(
                ErrorKind::Deserialize,
                e,
                format!("'{}' is not a valid catalog", self.path.display()),
            )
        })
    }

    /// Replace the contents of the file with `catalog`.
    ///
    /// # Errors
    /// Returns an [`ErrorKind::IO`] error when the file cannot be written.
    pub fn write(&mut self, catalog: &Catalog) -> Result<(), Error> {
        fn overwrite_file_from_start(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
            // Rewind the cursor back to the start of the file to write over the contents and set
            // the length of the file to be equal to bytes so that existing data is removed
            file.rewind()?;
            file.set_len(bytes.len() as u64)?;
            file.write_all(bytes)
        }

        let bytes = serde_json::to_vec_pretty(catalog)
            .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?;
        overwrite_file_from_start(&mut self.file, &bytes).map_err(|e| Error::wrap(ErrorKind::IO, e))
    }
}

#[inline]
fn open_file_for_read_and_write(path: PathBuf) -> Result<CatalogFile, Error> {
    match OpenOptions::new().read(true).write(true).open(&path) {
        Ok(file) => Ok(CatalogFile::new(file, path)),
        Err(e) => Err(Error::wrap_with(
            ErrorKind::IO,
            e,
            format!(
                "Failed to open the '{}' file for reading and writing",
                path.display()
            ),
        )),
    }
}

#[inline]
fn create_file_for_read_and_write(path: PathBuf) -> Result<CatalogFile, Error> {
    match OpenOptions::new()
        .create_new(true)
        .read(true)
        .write(true)
        .open(&path)
    {
        Ok(file) => Ok(CatalogFile::new(file, path)),
        Err(e) => Err(Error::wrap_with(
            ErrorKind::IO,
            e,
            format!(
                "Failed to create and open the '{}' file for reading and writing",
                path.display()
            ),
        )),
    }
}

fn find_catalog_file_in_directory(path: &Path) -> Result<CatalogFile, Error> {
    if !path.is_dir() {
        return Err(Error::new(
            ErrorKind::IO,
            format!("{} is not a directory", path.display()),
        ));
    }

    let pattern = format!("{}/*.{EXT}", path.to_string_lossy());

    let mut iter = glob(&pattern).map_err(|e| Error::wrap(ErrorKind::IO, e))?;

    let path_buf = iter
        .next()
        .ok_or_else(|| {
            Error::new(
                ErrorKind::IO,
                format!("No .{EXT} file found in the '{}' directory", path.display()),
            )
        })?
        .map_err(|e| {
            Error::wrap_with(
                ErrorKind::IO,
                e,
                "Cannot determine a file path - Do you have the correct permissions?",
            )
        })?;

    if iter.next().is_some() {
        return Err(Error::new(
            ErrorKind::IO,
            format!("More than one .{EXT} file found - use the --file option to select one"),
        ));
    }

    open_file_for_read_and_write(path_buf)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::catalog::{CatalogStore, ReferenceKind};

    use assert_fs::{
        fixture::{FileTouch, FileWriteStr, PathChild},
        NamedTempFile, TempDir,
    };

    #[test]
    #[should_panic(
        expected = "Failed to open the 'file does not exist.json' file for reading and writing"
    )]
    fn err_when_trying_to_open_catalog_file_that_does_not_exist() {
        CatalogFile::open("file does not exist").unwrap();
    }

    fn create_temp_file(name: &str) -> NamedTempFile {
        let file = NamedTempFile::new(name).expect("Cannot create temp file for test");
        // touch the temp file so it can be discovered by code
        file.touch().expect("Failure on touch of new temp file");
        file
    }

    #[test]
    fn open_temp_catalog_file_by_name_without_ext() {
        let file = create_temp_file("temp.json");
        let path = NamedTempFile::path(&file).with_extension("");
        let res = CatalogFile::open(path);
        file.close().unwrap();

        assert!(res.is_ok());
    }

    #[test]
    fn empty_file_reads_as_empty_catalog() {
        let file = create_temp_file("empty.json");
        let mut catalog_file = CatalogFile::open(file.path()).unwrap();

        assert_eq!(Catalog::new(), catalog_file.read().unwrap());
    }

    #[test]
    fn invalid_json_is_deserialize_error() {
        let file = NamedTempFile::new("broken.json").unwrap();
        file.write_str("{ not json").unwrap();

        let err = CatalogFile::open(file.path()).unwrap().read().unwrap_err();
        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn written_catalog_is_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("shop.json");

        let mut catalog = Catalog::new();
        let id = catalog.insert_product("Dune", Some("9780441013593".to_owned()));
        catalog
            .create_reference(ReferenceKind::Genre, "Science Fiction")
            .unwrap();

        let mut file = CatalogFile::create(path.path()).unwrap();
        file.write(&catalog).unwrap();

        // a shorter rewrite must not leave trailing bytes behind
        catalog.remove_product(id);
        file.write(&catalog).unwrap();
        drop(file);

        let read = CatalogFile::open(path.path()).unwrap().read().unwrap();
        catalog.dirty();
        assert_eq!(catalog, read);
    }

    #[test]
    fn explicit_path_is_created_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("new-shop");

        let file = CatalogFile::open_or_create(Some(path.path().to_path_buf())).unwrap();
        assert!(file.path().ends_with("new-shop.json"));
        assert!(file.path().exists());

        // second time round the file is opened, not created
        assert!(CatalogFile::open_or_create(Some(path.path().to_path_buf())).is_ok());
    }

    #[test]
    #[should_panic(expected = "No .json file found")]
    fn no_files_in_directory() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");

        CatalogFile::find(TempDir::path(&dir)).unwrap();
    }

    #[test]
    #[should_panic(expected = "not a directory")]
    fn path_is_not_a_directory() {
        CatalogFile::find("not a directory").unwrap();
    }

    #[test]
    #[should_panic(expected = "More than one .json file")]
    fn multiple_catalog_files_in_directory() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        dir.child("one.json").touch().unwrap();
        dir.child("two.json").touch().unwrap();

        CatalogFile::find(TempDir::path(&dir)).unwrap();
    }

    #[test]
    fn single_catalog_file_is_found() {
        let dir = TempDir::new().unwrap();
        dir.child("shop.json").touch().unwrap();

        let file = CatalogFile::find(TempDir::path(&dir)).unwrap();
        assert_eq!(Some("shop.json"), file.path().file_name().and_then(|n| n.to_str()));
    }
}
