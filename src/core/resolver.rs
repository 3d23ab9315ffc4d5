use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::ItemKey;
use lofty::probe::Probe;
use lofty::tag::Tag;
use tracing::debug;

use crate::error::ResolverFailure;
use crate::models::{AudioMetadata, UNKNOWN, UNKNOWN_ALBUM, UNKNOWN_ARTIST};

/// Source of per-file audio metadata.
/// The pipeline only depends on this trait, so the FLAC reader can be swapped
/// for an in-memory source in tests.
pub trait MetadataSource {
    /// Resolve the metadata of the file at `path`.
    fn resolve(&self, path: &Path) -> Result<AudioMetadata, ResolverFailure>;
}

/// Reads Vorbis comments and stream info from FLAC files through lofty.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlacReader;

impl MetadataSource for FlacReader {
    fn resolve(&self, path: &Path) -> Result<AudioMetadata, ResolverFailure> {
        if !path.exists() {
            debug!("missing audio file: {}", path.display());
            return Err(ResolverFailure::NotFound);
        }

        // the `.flac` extension selects lofty's FLAC parser, so other content fails here
        let tagged_file = Probe::open(path)
            .and_then(|probe| probe.read())
            .map_err(|e| ResolverFailure::DecodeError(e.to_string()))?;

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag());

        let text = |key| tag_text(tag, key);
        Ok(AudioMetadata {
            artist: text(ItemKey::TrackArtist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            album: text(ItemKey::AlbumTitle).unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
            title: text(ItemKey::TrackTitle).unwrap_or_else(|| file_stem(path)),
            date: text(ItemKey::RecordingDate).unwrap_or_else(|| UNKNOWN.to_string()),
            genre: text(ItemKey::Genre).unwrap_or_else(|| UNKNOWN.to_string()),
            track_number: text(ItemKey::TrackNumber).unwrap_or_default(),
            duration_seconds: tagged_file.properties().duration().as_secs_f64(),
        })
    }
}

/// Text of `key` in `tag`, if the tag exists and carries it.
fn tag_text(tag: Option<&Tag>, key: ItemKey) -> Option<String> {
    tag.and_then(|tag| tag.get_string(key)).map(str::to_string)
}

/// File name without its extension, used as the title when no tag carries one.
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
