//! Catalogue ingestion from CSV datasets.
//!
//! The dataset is UTF-8 (a leading byte-order mark is tolerated) with
//! header-driven columns: `Title, Year, Actors, Director, Genre,
//! Description, Runtime (Minutes)`. Fields may be quoted RFC-4180 style, so
//! descriptions can embed commas and newlines. The Actors and Genre fields
//! are themselves comma-separated lists with no escaping for embedded
//! commas; that limitation is part of the dataset format.
//!
//! Row failures are the loader's concern, never the repository's: a
//! malformed row (short row, empty title, non-integer year or runtime) is
//! skipped and counted, while a missing required header column aborts the
//! load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::genre::Genre;
use crate::movie::Movie;
use crate::people::{Actor, Director};
use crate::repository::traits::{MovieRepository, RepositoryError};

const COL_TITLE: &str = "Title";
const COL_YEAR: &str = "Year";
const COL_ACTORS: &str = "Actors";
const COL_DIRECTOR: &str = "Director";
const COL_GENRE: &str = "Genre";
const COL_DESCRIPTION: &str = "Description";
const COL_RUNTIME: &str = "Runtime (Minutes)";

/// Errors that can occur while loading a catalogue file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read catalogue file: {0}")]
    Io(#[from] std::io::Error),

    /// The file has no header row.
    #[error("catalogue file has no header row")]
    MissingHeader,

    /// A required column is absent from the header.
    #[error("missing required column '{0}' in header")]
    MissingColumn(&'static str),

    /// The repository rejected an insert.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Outcome of a catalogue load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Rows turned into movies and handed to the repository.
    pub loaded: usize,
    /// Malformed rows that were skipped.
    pub skipped: usize,
}

/// Column positions resolved from the header row.
struct Columns {
    title: usize,
    year: usize,
    actors: usize,
    director: usize,
    genre: usize,
    description: usize,
    runtime: usize,
}

impl Columns {
    fn resolve(header: &[String]) -> Result<Self, LoadError> {
        let position = |name: &'static str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(LoadError::MissingColumn(name))
        };
        Ok(Self {
            title: position(COL_TITLE)?,
            year: position(COL_YEAR)?,
            actors: position(COL_ACTORS)?,
            director: position(COL_DIRECTOR)?,
            genre: position(COL_GENRE)?,
            description: position(COL_DESCRIPTION)?,
            runtime: position(COL_RUNTIME)?,
        })
    }
}

/// Splits CSV text into records, honoring RFC-4180 quoting.
///
/// Inside quotes, commas and newlines are literal and `""` is an escaped
/// quote. Outside quotes, `\r` is swallowed so CRLF input parses the same
/// as LF. Blank lines are dropped.
fn parse_records(input: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => record.push(std::mem::take(&mut field)),
                '\r' => {}
                '\n' => {
                    record.push(std::mem::take(&mut field));
                    if record.len() > 1 || !record[0].is_empty() {
                        records.push(std::mem::take(&mut record));
                    } else {
                        record.clear();
                    }
                }
                _ => field.push(c),
            }
        }
    }
    // Final record without a trailing newline.
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

/// Loads a catalogue CSV file into the repository.
///
/// # Errors
/// Returns [`LoadError`] on I/O failure, a missing required column, or a
/// repository backend failure. Malformed rows are skipped, not errors.
pub fn load_catalogue(
    path: impl AsRef<Path>,
    repo: &dyn MovieRepository,
) -> Result<LoadSummary, LoadError> {
    let file = File::open(path)?;
    load_catalogue_from_reader(file, repo)
}

/// Loads a catalogue CSV from any reader into the repository.
///
/// # Errors
/// Same contract as [`load_catalogue`].
pub fn load_catalogue_from_reader(
    mut reader: impl Read,
    repo: &dyn MovieRepository,
) -> Result<LoadSummary, LoadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let mut records = parse_records(text).into_iter();
    let header = records.next().ok_or(LoadError::MissingHeader)?;
    let columns = Columns::resolve(&header)?;

    let mut summary = LoadSummary {
        loaded: 0,
        skipped: 0,
    };

    for row in records {
        match build_movie(&row, &columns) {
            Some(movie) => {
                for name in &movie.actors {
                    repo.add_actor(Actor::new(name.clone()))?;
                }
                for name in &movie.genres {
                    repo.add_genre(Genre::new(name.clone()))?;
                }
                if let Some(name) = &movie.director {
                    repo.add_director(Director::new(name.clone()))?;
                }
                repo.add_movie(movie)?;
                summary.loaded += 1;
            }
            None => summary.skipped += 1,
        }
    }
    Ok(summary)
}

/// Builds a movie from one data row, or `None` if the row is malformed.
fn build_movie(row: &[String], columns: &Columns) -> Option<Movie> {
    let field = |idx: usize| row.get(idx).map(|s| s.trim());

    let title = field(columns.title)?;
    if title.is_empty() {
        return None;
    }
    let year: u16 = field(columns.year)?.parse().ok()?;
    let runtime: u32 = field(columns.runtime)?.parse().ok()?;

    let mut movie = Movie::new(title, year);
    movie.description = field(columns.description)?.to_string();
    movie.runtime_minutes = runtime;

    // Comma-split lists, no escaping: an actor name containing a comma
    // splits into two entries. Documented dataset limitation.
    for actor in field(columns.actors)?.split(',') {
        let actor = actor.trim();
        if !actor.is_empty() {
            movie.add_actor(actor);
        }
    }
    for genre in field(columns.genre)?.split(',') {
        let genre = genre.trim();
        if !genre.is_empty() {
            movie.add_genre(genre);
        }
    }

    let director = field(columns.director)?;
    if !director.is_empty() {
        movie.director = Some(director.to_string());
    }

    Some(movie)
}
