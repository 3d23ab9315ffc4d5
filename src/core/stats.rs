use std::collections::HashMap;
use std::hash::Hash;

use crate::core::enricher::usable;
use crate::models::{EnrichedEntry, RankedAlbum, RankedArtist, RankedSong, Summary};

/// The `n` most played songs. Equal play counts keep log order.
pub fn top_songs(entries: &[EnrichedEntry], n: usize) -> Vec<RankedSong> {
    let mut valid = usable(entries);
    valid.sort_by(|a, b| b.entry.play_count.cmp(&a.entry.play_count));

    valid
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, song)| RankedSong {
            rank: i + 1,
            artist: song.metadata.artist.clone(),
            title: song.metadata.title.clone(),
            album: song.metadata.album.clone(),
            plays: song.entry.play_count,
            first_played: song.entry.first_played.clone(),
            last_played: song.entry.last_played.clone(),
        })
        .collect()
}

/// The `n` artists with the most plays, grouped by exact artist name.
pub fn top_artists(entries: &[EnrichedEntry], n: usize) -> Vec<RankedArtist> {
    let plays = usable(entries)
        .into_iter()
        .map(|v| (v.metadata.artist.as_str(), v.entry.play_count));

    ranked_tally(plays, n)
        .into_iter()
        .enumerate()
        .map(|(i, (artist, plays))| RankedArtist {
            rank: i + 1,
            artist: artist.to_string(),
            plays,
        })
        .collect()
}

/// The `n` albums with the most plays. Albums are keyed by (artist, album),
/// so two artists' "Greatest Hits" stay apart.
pub fn top_albums(entries: &[EnrichedEntry], n: usize) -> Vec<RankedAlbum> {
    let plays = usable(entries).into_iter().map(|v| {
        (
            (v.metadata.artist.as_str(), v.metadata.album.as_str()),
            v.entry.play_count,
        )
    });

    ranked_tally(plays, n)
        .into_iter()
        .enumerate()
        .map(|(i, ((artist, album), plays))| RankedAlbum {
            rank: i + 1,
            artist: artist.to_string(),
            album: album.to_string(),
            plays,
        })
        .collect()
}

/// Minutes actually spent listening: each track's duration times its play count.
pub fn total_time_minutes(entries: &[EnrichedEntry]) -> u64 {
    let seconds: f64 = usable(entries)
        .iter()
        .map(|v| v.metadata.duration_seconds * v.entry.play_count as f64)
        .sum();
    whole_minutes(seconds)
}

/// Combined length of the distinct tracks, ignoring play counts.
pub fn library_minutes(entries: &[EnrichedEntry]) -> u64 {
    let seconds: f64 = usable(entries)
        .iter()
        .map(|v| v.metadata.duration_seconds)
        .sum();
    whole_minutes(seconds)
}

/// Counters over all entries. Plays of unreadable files still count
/// towards `total_plays`, which stops at `u64::MAX`.
pub fn summarize(entries: &[EnrichedEntry]) -> Summary {
    let total_files = entries.len();
    let successful_reads = usable(entries).len();

    Summary {
        total_plays: entries
            .iter()
            .fold(0u64, |total, e| total.saturating_add(e.entry.play_count)),
        total_files,
        successful_reads,
        files_with_errors: total_files - successful_reads,
    }
}

/// Floor of `seconds / 60`.
fn whole_minutes(seconds: f64) -> u64 {
    (seconds / 60.0).floor() as u64
}

/// Sums plays per key (saturating at `u64::MAX`), then orders keys by total descending.
/// Ties keep the order in which keys were first seen.
fn ranked_tally<K, I>(plays: I, n: usize) -> Vec<(K, u64)>
where
    K: Eq + Hash + Copy,
    I: IntoIterator<Item = (K, u64)>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut totals: Vec<(K, u64)> = Vec::new();

    for (key, count) in plays {
        match index.get(&key) {
            Some(&slot) => totals[slot].1 = totals[slot].1.saturating_add(count),
            None => {
                index.insert(key, totals.len());
                totals.push((key, count));
            }
        }
    }

    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(n);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{failed, metadata, resolved};

    fn library() -> Vec<EnrichedEntry> {
        vec![
            resolved("1.flac", 5, metadata("A", "First", "a1", 120.0)),
            resolved("2.flac", 9, metadata("B", "Second", "b1", 200.0)),
            failed("3.flac", 50),
            resolved("4.flac", 5, metadata("A", "First", "a2", 90.0)),
            resolved("5.flac", 2, metadata("C", "First", "c1", 30.0)),
            resolved("6.flac", 9, metadata("C", "Third", "c2", 60.0)),
        ]
    }

    #[test]
    fn test_top_songs_sorted_with_stable_ties() {
        let songs = top_songs(&library(), 10);
        let titles: Vec<_> = songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["b1", "c2", "a1", "a2", "c1"]);
        let ranks: Vec<_> = songs.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_top_songs_length_is_min_of_n_and_valid() {
        assert_eq!(top_songs(&library(), 2).len(), 2);
        assert_eq!(top_songs(&library(), 100).len(), 5);
        assert!(top_songs(&library(), 0).is_empty());
    }

    #[test]
    fn test_top_songs_carry_play_dates() {
        let songs = top_songs(&library(), 1);
        assert_eq!(songs[0].plays, 9);
        assert_eq!(songs[0].first_played.as_deref(), Some("1/1/2024"));
        assert_eq!(songs[0].last_played.as_deref(), Some("2/1/2024"));
    }

    #[test]
    fn test_artists_sum_plays() {
        let entries = vec![
            resolved("x.flac", 3, metadata("A", "X", "x", 1.0)),
            resolved("y.flac", 7, metadata("A", "Y", "y", 1.0)),
        ];
        assert_eq!(
            top_artists(&entries, 1),
            vec![RankedArtist {
                rank: 1,
                artist: "A".to_string(),
                plays: 10
            }]
        );
    }

    #[test]
    fn test_artist_ties_keep_first_seen_order() {
        // A = 10, B = 9, C = 11
        let artists = top_artists(&library(), usize::MAX);
        let names: Vec<_> = artists.iter().map(|a| (a.artist.as_str(), a.plays)).collect();
        assert_eq!(names, vec![("C", 11), ("A", 10), ("B", 9)]);

        let entries = vec![
            resolved("1.flac", 4, metadata("Z", "X", "z", 1.0)),
            resolved("2.flac", 4, metadata("Y", "X", "y", 1.0)),
        ];
        let names: Vec<_> = top_artists(&entries, 2).into_iter().map(|a| a.artist).collect();
        assert_eq!(names, vec!["Z", "Y"]);
    }

    #[test]
    fn test_artist_names_are_case_sensitive() {
        let entries = vec![
            resolved("1.flac", 1, metadata("abba", "X", "a", 1.0)),
            resolved("2.flac", 1, metadata("ABBA", "X", "b", 1.0)),
        ];
        assert_eq!(top_artists(&entries, 10).len(), 2);
    }

    #[test]
    fn test_unrestricted_artist_total_matches_valid_plays() {
        let entries = library();
        let artist_total: u64 = top_artists(&entries, usize::MAX).iter().map(|a| a.plays).sum();
        let valid_total: u64 = usable(&entries).iter().map(|v| v.entry.play_count).sum();
        assert_eq!(artist_total, valid_total);
        assert_eq!(artist_total, 30);
    }

    #[test]
    fn test_albums_group_by_artist_and_album() {
        let albums = top_albums(&library(), 10);
        let rows: Vec<_> = albums
            .iter()
            .map(|a| (a.rank, a.artist.as_str(), a.album.as_str(), a.plays))
            .collect();
        assert_eq!(
            rows,
            vec![
                (1, "A", "First", 10),
                (2, "B", "Second", 9),
                (3, "C", "Third", 9),
                (4, "C", "First", 2),
            ]
        );
    }

    #[test]
    fn test_total_time_is_weighted_by_plays() {
        // 5*120 + 9*200 + 5*90 + 2*30 + 9*60 = 3450s
        assert_eq!(total_time_minutes(&library()), 57);
    }

    #[test]
    fn test_library_minutes_ignores_plays() {
        // 120 + 200 + 90 + 30 + 60 = 500s
        assert_eq!(library_minutes(&library()), 8);
    }

    #[test]
    fn test_summary_counts_errored_plays() {
        let summary = summarize(&library());
        assert_eq!(summary.total_files, 6);
        assert_eq!(summary.successful_reads, 5);
        assert_eq!(summary.files_with_errors, 1);
        assert_eq!(summary.total_plays, 80);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let entries = vec![
            resolved("1.flac", u64::MAX, metadata("A", "X", "a", 1.0)),
            resolved("2.flac", 1, metadata("A", "X", "b", 1.0)),
            failed("3.flac", 5),
        ];

        assert_eq!(top_artists(&entries, 1)[0].plays, u64::MAX);
        assert_eq!(top_albums(&entries, 1)[0].plays, u64::MAX);
        assert_eq!(top_songs(&entries, 1)[0].plays, u64::MAX);
        assert_eq!(summarize(&entries).total_plays, u64::MAX);
        assert!(total_time_minutes(&entries) > 0);
    }

    #[test]
    fn test_empty_inputs_produce_empty_results() {
        for entries in [vec![], vec![failed("a.flac", 3)]] {
            assert!(top_songs(&entries, 15).is_empty());
            assert!(top_artists(&entries, 10).is_empty());
            assert!(top_albums(&entries, 10).is_empty());
            assert_eq!(total_time_minutes(&entries), 0);
            assert_eq!(library_minutes(&entries), 0);
        }
    }
}
