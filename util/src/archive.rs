//! Struct archiving functionality
//!
//! Archives are CSV files written into the session's `arch` directory, one
//! row per call to [`Archiver::serialise`]. Records must be flat structs as
//! `csv` cannot write nested fields, so timestamps are carried as a field of
//! the record itself (see [`crate::session::get_elapsed_seconds`]).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::File;
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
pub struct Archiver {
    writer: Writer<File>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot create the archive file: {0}")]
    CreateError(std::io::Error),

    #[error("Cannot write the archive record: {0}")]
    WriteError(csv::Error),

    #[error("Cannot flush the archive file: {0}")]
    FlushError(std::io::Error)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let file = File::create(session.arch_root.join(path))
            .map_err(ArchiveError::CreateError)?;

        Ok(Self {
            writer: WriterBuilder::new()
                .has_headers(true)
                .from_writer(file)
        })
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(&mut self, record: &T) -> Result<(), ArchiveError> {
        self.writer
            .serialize(record)
            .map_err(ArchiveError::WriteError)?;

        self.writer.flush().map_err(ArchiveError::FlushError)
    }
}
