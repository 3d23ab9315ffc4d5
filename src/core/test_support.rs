use std::collections::HashMap;
use std::path::Path;

use crate::core::resolver::MetadataSource;
use crate::error::ResolverFailure;
use crate::models::{AudioMetadata, EnrichedEntry, PlayLogEntry};

const SAMPLE_RATE: u64 = 44_100;

/// Writes a minimal FLAC file: STREAMINFO, an optional VORBIS_COMMENT block
/// and a few bytes standing in for audio frames.
pub fn write_flac(path: &Path, seconds: u64, comments: &[(&str, &str)]) {
    let mut stream_info = Vec::with_capacity(34);
    stream_info.extend_from_slice(&4096u16.to_be_bytes());
    stream_info.extend_from_slice(&4096u16.to_be_bytes());
    stream_info.extend_from_slice(&[0; 6]);
    // sample rate (20 bits) | channels - 1 (3) | bits per sample - 1 (5) | total samples (36)
    let packed = (SAMPLE_RATE << 44) | (1 << 41) | (15 << 36) | (SAMPLE_RATE * seconds);
    stream_info.extend_from_slice(&packed.to_be_bytes());
    stream_info.extend_from_slice(&[0; 16]);

    let mut bytes = b"fLaC".to_vec();
    bytes.extend_from_slice(&block_header(0, comments.is_empty(), stream_info.len()));
    bytes.extend_from_slice(&stream_info);

    if !comments.is_empty() {
        let vendor = b"flacwrap";
        let mut block = Vec::new();
        block.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
        block.extend_from_slice(vendor);
        block.extend_from_slice(&(comments.len() as u32).to_le_bytes());
        for (key, value) in comments {
            let comment = format!("{key}={value}");
            block.extend_from_slice(&(comment.len() as u32).to_le_bytes());
            block.extend_from_slice(comment.as_bytes());
        }
        bytes.extend_from_slice(&block_header(4, true, block.len()));
        bytes.extend_from_slice(&block);
    }

    bytes.extend_from_slice(&[0xFF, 0xF8, 0x69, 0x08, 0x00, 0x00, 0x00, 0x00]);
    std::fs::write(path, bytes).expect("write flac fixture");
}

/// Metadata block header: last-block flag, 7-bit type, 24-bit length.
fn block_header(kind: u8, last: bool, len: usize) -> [u8; 4] {
    let flag = if last { 0x80 } else { 0x00 };
    [flag | kind, (len >> 16) as u8, (len >> 8) as u8, len as u8]
}

/// In-memory metadata keyed by file path. Unknown paths are `NotFound`.
#[derive(Default)]
pub struct FakeSource {
    files: HashMap<String, AudioMetadata>,
}

impl FakeSource {
    pub fn with(mut self, path: &str, metadata: AudioMetadata) -> Self {
        self.files.insert(path.to_string(), metadata);
        self
    }
}

impl MetadataSource for FakeSource {
    fn resolve(&self, path: &Path) -> Result<AudioMetadata, ResolverFailure> {
        self.files
            .get(path.to_string_lossy().as_ref())
            .cloned()
            .ok_or(ResolverFailure::NotFound)
    }
}

pub fn metadata(artist: &str, album: &str, title: &str, seconds: f64) -> AudioMetadata {
    AudioMetadata {
        artist: artist.to_string(),
        album: album.to_string(),
        title: title.to_string(),
        date: "Unknown".to_string(),
        genre: "Unknown".to_string(),
        track_number: String::new(),
        duration_seconds: seconds,
    }
}

pub fn entry(path: &str, plays: u64) -> PlayLogEntry {
    PlayLogEntry {
        id: Some(path.to_string()),
        play_count: plays,
        first_played: Some("1/1/2024".to_string()),
        last_played: Some("2/1/2024".to_string()),
        file_path: path.to_string(),
    }
}

pub fn resolved(path: &str, plays: u64, metadata: AudioMetadata) -> EnrichedEntry {
    EnrichedEntry {
        entry: entry(path, plays),
        metadata: Ok(metadata),
    }
}

pub fn failed(path: &str, plays: u64) -> EnrichedEntry {
    EnrichedEntry {
        entry: entry(path, plays),
        metadata: Err(ResolverFailure::NotFound),
    }
}
