use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use indoc::formatdoc;
use thiserror::Error;
use tracing::{error, info};

use crate::types::migration::MigrationIdentifier;
use crate::utils::fs::ensure_dir;

/// Directory, relative to the application root, holding generated migration files
pub const MIGRATIONS_DIR: &str = "migrations";

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Failed to create migrations directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write migration file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of a MongoDB migration stub with no-op actions.
pub fn mongo_stub(identifier: MigrationIdentifier) -> String {
    formatdoc! {r#"
        use futures::FutureExt;
        use migrater::Migration;
        use mongodb::Database;

        pub fn migration_{identifier}() -> Migration<Database> {{
            Migration::new({identifier}, "Your description")
                .up(|_db: &Database| async move {{ Ok(()) }}.boxed())
                .down(|_db: &Database| async move {{ Ok(()) }}.boxed())
        }}
    "#, identifier = identifier}
}

/// Path of the migration file for `identifier` below `app_root`.
pub fn migration_path(app_root: &Path, identifier: MigrationIdentifier) -> PathBuf {
    app_root.join(MIGRATIONS_DIR).join(format!("{}.rs", identifier))
}

/// Writes a MongoDB migration stub named after the current timestamp.
///
/// Returns the path of the created file. An existing file with the same name is never
/// overwritten.
pub fn generate_mongo_migration(app_root: &Path) -> Result<PathBuf, GeneratorError> {
    generate_mongo_migration_at(app_root, MigrationIdentifier::now())
}

pub fn generate_mongo_migration_at(app_root: &Path, identifier: MigrationIdentifier) -> Result<PathBuf, GeneratorError> {
    let path = migration_path(app_root, identifier);

    ensure_dir(&path).map_err(|source| {
        let dir = app_root.join(MIGRATIONS_DIR);
        error!(path = %dir.display(), error = %source, "Error creating dir");
        GeneratorError::CreateDir { path: dir, source }
    })?;

    let write = || -> std::io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        file.write_all(mongo_stub(identifier).as_bytes())
    };
    write().map_err(|source| {
        error!(path = %path.display(), error = %source, "Error writing migration file");
        GeneratorError::WriteFile { path: path.clone(), source }
    })?;

    info!(path = %path.display(), "Created migration {}", identifier);
    Ok(path)
}
