use crate::core::enricher::enrich;
use crate::core::parser::{decode_document, parse_log};
use crate::core::resolver::MetadataSource;
use crate::core::stats;
use crate::error::ParseError;
use crate::models::{EnrichedEntry, Report};

/// How many rows each ranking keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLimits {
    pub songs: usize,
    pub artists: usize,
    pub albums: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            songs: 15,
            artists: 10,
            albums: 10,
        }
    }
}

/// Runs the whole pipeline on a playback log: parse, resolve every FLAC file,
/// then aggregate.
pub fn generate(
    document: &str,
    source: &dyn MetadataSource,
    limits: ReportLimits,
) -> Result<Report, ParseError> {
    let parsed = parse_log(document)?;
    let entries = enrich(parsed.entries, source);
    Ok(build_report(&entries, parsed.skipped, limits))
}

/// Same as [`generate`], for a log still in its raw file encoding.
pub fn generate_from_bytes(
    data: &[u8],
    source: &dyn MetadataSource,
    limits: ReportLimits,
) -> Result<Report, ParseError> {
    let document = decode_document(data)?;
    generate(&document, source, limits)
}

/// Assemble the report from already enriched entries.
pub fn build_report(entries: &[EnrichedEntry], skipped_files: usize, limits: ReportLimits) -> Report {
    let total_time_minutes = stats::total_time_minutes(entries);

    Report {
        top_songs: stats::top_songs(entries, limits.songs),
        top_artists: stats::top_artists(entries, limits.artists),
        top_albums: stats::top_albums(entries, limits.albums),
        total_time_minutes,
        total_time_hours: (total_time_minutes as f64 / 6.0).round() / 10.0,
        library_minutes: stats::library_minutes(entries),
        summary: stats::summarize(entries),
        skipped_files,
    }
}
