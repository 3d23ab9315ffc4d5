use std::path::Path;

use serde::Serialize;

use crate::error::ResolverFailure;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN: &str = "Unknown";

/// One `Entry` record of the playback log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayLogEntry {
    pub id: Option<String>,
    pub play_count: u64,
    pub first_played: Option<String>,
    pub last_played: Option<String>,
    pub file_path: String,
}

impl PlayLogEntry {
    /// The referenced audio file as a filesystem path.
    pub fn path(&self) -> &Path {
        Path::new(&self.file_path)
    }
}

/// Tags and duration of one audio file. Missing tags already hold their fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioMetadata {
    pub artist: String,
    pub album: String,
    pub title: String,
    pub date: String,
    pub genre: String,
    pub track_number: String,
    pub duration_seconds: f64,
}

/// A log entry together with the outcome of resolving its file.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedEntry {
    pub entry: PlayLogEntry,
    pub metadata: Result<AudioMetadata, ResolverFailure>,
}

/// Borrowed view of an entry whose metadata resolved.
#[derive(Debug, Clone, Copy)]
pub struct Validated<'a> {
    pub entry: &'a PlayLogEntry,
    pub metadata: &'a AudioMetadata,
}

/// One row of the top songs table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSong {
    pub rank: usize,
    pub artist: String,
    pub title: String,
    pub album: String,
    pub plays: u64,
    pub first_played: Option<String>,
    pub last_played: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedArtist {
    pub rank: usize,
    pub artist: String,
    pub plays: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedAlbum {
    pub rank: usize,
    pub artist: String,
    pub album: String,
    pub plays: u64,
}

/// Counters over every FLAC entry, readable or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub total_plays: u64,
    pub total_files: usize,
    pub successful_reads: usize,
    pub files_with_errors: usize,
}

/// Everything the CLI and the upload endpoint present to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub top_songs: Vec<RankedSong>,
    pub top_artists: Vec<RankedArtist>,
    pub top_albums: Vec<RankedAlbum>,
    pub total_time_minutes: u64,
    pub total_time_hours: f64,
    pub library_minutes: u64,
    #[serde(flatten)]
    pub summary: Summary,
    pub skipped_files: usize,
}
