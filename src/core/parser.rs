use roxmltree::{Document, Node, ParsingOptions};
use tracing::info;

use crate::error::ParseError;
use crate::models::PlayLogEntry;

/// Only entries pointing at files with this extension are kept.
pub const SUPPORTED_EXTENSION: &str = ".flac";

/// Result of reading a playback log.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub entries: Vec<PlayLogEntry>,
    pub skipped: usize,
}

/// Parse a playback log into its FLAC entries, in document order.
///
/// Expected shape:
/// ```xml
/// <Root>
///   <Entry ID="1" Count="12" FirstPlayedFriendly=".." LastPlayedFriendly="..">
///     <Item Path="C:\Music\song.flac"/>
///   </Entry>
/// </Root>
/// ```
/// Entries for other file types are dropped and counted in `skipped`.
pub fn parse_log(document: &str) -> Result<ParsedLog, ParseError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(document, options)?;
    let mut parsed = ParsedLog::default();

    let records = doc
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("Entry"));

    for (position, record) in records.enumerate() {
        let file_path = item_path(record).ok_or_else(|| ParseError::MissingItemReference {
            position: position + 1,
            id: record.attribute("ID").unwrap_or("?").to_string(),
        })?;

        if !is_supported(file_path) {
            parsed.skipped += 1;
            continue;
        }

        parsed.entries.push(PlayLogEntry {
            id: record.attribute("ID").map(str::to_string),
            play_count: parse_count(record.attribute("Count")),
            first_played: record.attribute("FirstPlayedFriendly").map(str::to_string),
            last_played: record.attribute("LastPlayedFriendly").map(str::to_string),
            file_path: file_path.to_string(),
        });
    }

    info!("Processed {} FLAC files", parsed.entries.len());
    info!("Skipped {} non-FLAC files", parsed.skipped);
    Ok(parsed)
}

/// Decode raw log bytes. UTF-16 needs a byte order mark; anything else must be UTF-8.
/// A leading BOM is dropped.
pub fn decode_document(bytes: &[u8]) -> Result<String, ParseError> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => decode_utf8(rest),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, false),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, true),
        _ => decode_utf8(bytes),
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String, ParseError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| ParseError::UnsupportedEncoding)
}

fn decode_utf16(bytes: &[u8], big_endian: bool) -> Result<String, ParseError> {
    if bytes.len() % 2 != 0 {
        return Err(ParseError::UnsupportedEncoding);
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| {
            if big_endian {
                u16::from_be_bytes([pair[0], pair[1]])
            } else {
                u16::from_le_bytes([pair[0], pair[1]])
            }
        })
        .collect();
    String::from_utf16(&units).map_err(|_| ParseError::UnsupportedEncoding)
}

/// `Path` attribute of the first `Item` child.
fn item_path<'a>(record: Node<'a, '_>) -> Option<&'a str> {
    record
        .children()
        .find(|node| node.has_tag_name("Item"))
        .and_then(|item| item.attribute("Path"))
}

/// Case-insensitive suffix match against [`SUPPORTED_EXTENSION`].
fn is_supported(path: &str) -> bool {
    let ext_len = SUPPORTED_EXTENSION.len();
    path.len() >= ext_len
        && path
            .get(path.len() - ext_len..)
            .is_some_and(|suffix| suffix.eq_ignore_ascii_case(SUPPORTED_EXTENSION))
}

/// Missing or unparseable counts become 0.
fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|count| count.trim().parse().ok()).unwrap_or(0)
}
