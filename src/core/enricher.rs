use tracing::debug;

use crate::core::resolver::MetadataSource;
use crate::models::{EnrichedEntry, PlayLogEntry, Validated};

/// Resolve metadata for every entry. One output per input, same order;
/// failures stay attached to their entry.
pub fn enrich(entries: Vec<PlayLogEntry>, source: &dyn MetadataSource) -> Vec<EnrichedEntry> {
    entries
        .into_iter()
        .map(|entry| {
            let metadata = source.resolve(entry.path());
            if let Err(ref failure) = metadata {
                debug!(
                    "entry {} ({}): {}",
                    entry.id.as_deref().unwrap_or("?"),
                    entry.file_path,
                    failure
                );
            }
            EnrichedEntry { entry, metadata }
        })
        .collect()
}

/// Entries whose metadata resolved, in their original order.
pub fn usable(entries: &[EnrichedEntry]) -> Vec<Validated<'_>> {
    entries
        .iter()
        .filter_map(|enriched| {
            enriched.metadata.as_ref().ok().map(|metadata| Validated {
                entry: &enriched.entry,
                metadata,
            })
        })
        .collect()
}
