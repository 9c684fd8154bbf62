//! Tests for the ingest module

use super::*;
use crate::store::memory::MemoryStore;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn movie(tmdb_id: i64, title: &str) -> CanonicalRecord {
    let mut record = CanonicalRecord::titled(title);
    record.tmdb_id = Some(tmdb_id);
    record
}

fn stats(inserted: usize, skipped: usize, errored: usize) -> IngestStats {
    IngestStats {
        inserted,
        skipped,
        errored,
    }
}

// ============================================================================
// Config and Stats Tests
// ============================================================================

#[test]
fn test_ingest_config_default() {
    let config = IngestConfig::default();
    assert_eq!(config.batch_size, 100);
    assert_eq!(config.sample_size, 5);
}

#[test]
fn test_ingest_config_builder() {
    let config = IngestConfig::new().with_batch_size(25).with_sample_size(3);
    assert_eq!(config.batch_size, 25);
    assert_eq!(config.sample_size, 3);
}

#[test]
fn test_ingest_stats_arithmetic() {
    let mut total = stats(2, 1, 0);
    total += stats(3, 0, 4);
    assert_eq!(total, stats(5, 1, 4));
    assert_eq!(total.total(), 10);
    assert_eq!(total.to_string(), "5 inserted, 1 skipped, 4 errors");
}

// ============================================================================
// Batch Tests
// ============================================================================

#[tokio::test]
async fn test_clean_batches_insert_everything() {
    let store = MemoryStore::new();
    let records: Vec<_> = (1..=5).map(|i| movie(i, &format!("Movie {i}"))).collect();

    let result = BatchIngestor::new(&store).ingest(&records, 2).await;

    assert_eq!(result, stats(5, 0, 0));
    assert_eq!(store.bulk_calls(), 3);
    assert_eq!(
        store.titles(),
        vec!["Movie 1", "Movie 2", "Movie 3", "Movie 4", "Movie 5"]
    );
}

#[tokio::test]
async fn test_conflicting_batch_falls_back_to_individual_inserts() {
    let store = MemoryStore::with_rows([movie(603, "The Matrix")]);
    let records = vec![
        movie(1, "Heat"),
        movie(603, "The Matrix (again)"),
        movie(2, "Ronin"),
    ];

    let result = BatchIngestor::new(&store).ingest(&records, 100).await;

    assert_eq!(result, stats(2, 1, 0));
    assert_eq!(store.titles(), vec!["The Matrix", "Heat", "Ronin"]);
}

#[tokio::test]
async fn test_failed_batch_falls_back_to_individual_inserts() {
    let store = MemoryStore {
        fail_bulk: true,
        ..MemoryStore::default()
    };
    let records = vec![movie(1, "Heat"), movie(2, "Ronin")];

    let result = BatchIngestor::new(&store).ingest(&records, 10).await;

    assert_eq!(result, stats(2, 0, 0));
    assert_eq!(store.titles(), vec!["Heat", "Ronin"]);
}

#[tokio::test]
async fn test_duplicates_within_one_batch() {
    let store = MemoryStore::new();
    let records = vec![movie(7, "Se7en"), movie(7, "Se7en")];

    let result = BatchIngestor::new(&store).ingest(&records, 10).await;

    assert_eq!(result, stats(1, 1, 0));
    assert_eq!(store.titles(), vec!["Se7en"]);
}

#[test_case(0 ; "zero clamps to one")]
#[test_case(1 ; "one")]
#[test_case(3 ; "uneven")]
#[test_case(1000 ; "larger than input")]
#[tokio::test]
async fn test_error_isolation_counters_cover_input(batch_size: usize) {
    let store = MemoryStore {
        fail_bulk: true,
        fail_titles: ["Broken".to_string()].into(),
        unreachable_titles: ["Lost".to_string()].into(),
        ..MemoryStore::default()
    };
    let mut records = vec![
        movie(1, "Heat"),
        movie(2, "Broken"),
        CanonicalRecord::titled("No Id"),
        movie(3, "Lost"),
        movie(4, "Ronin"),
    ];
    records.push(movie(1, "Heat"));

    let result = BatchIngestor::new(&store).ingest(&records, batch_size).await;

    assert_eq!(result.total(), records.len());
    assert_eq!(result, stats(3, 1, 2));
    assert_eq!(store.titles(), vec!["Heat", "No Id", "Ronin"]);
}

#[tokio::test]
async fn test_empty_input() {
    let store = MemoryStore::new();
    let result = BatchIngestor::new(&store).ingest(&[], 100).await;
    assert_eq!(result, IngestStats::default());
    assert_eq!(store.bulk_calls(), 0);
}

// ============================================================================
// Individual Insert Tests
// ============================================================================

#[tokio::test]
async fn test_insert_each_skips_known_ids_without_writing() {
    let store = MemoryStore::with_rows([movie(603, "The Matrix")]);
    let records = vec![movie(603, "Renamed"), movie(604, "Reloaded")];

    let result = BatchIngestor::new(&store).insert_each(&records).await;

    assert_eq!(result, stats(1, 1, 0));
    assert_eq!(store.titles(), vec!["The Matrix", "Reloaded"]);
}

#[tokio::test]
async fn test_insert_each_records_without_id_are_written() {
    let store = MemoryStore::new();
    let records = vec![
        CanonicalRecord::titled("Untracked"),
        CanonicalRecord::titled("Untracked"),
    ];

    let result = BatchIngestor::new(&store).insert_each(&records).await;

    assert_eq!(result, stats(2, 0, 0));
}

#[tokio::test]
async fn test_insert_each_attempts_write_when_lookup_fails() {
    let store = MemoryStore {
        fail_lookup: true,
        ..MemoryStore::with_rows([movie(603, "The Matrix")])
    };
    let records = vec![movie(603, "The Matrix"), movie(604, "Reloaded")];

    let result = BatchIngestor::new(&store).insert_each(&records).await;

    assert_eq!(result, stats(1, 1, 0));
    assert_eq!(store.titles(), vec!["The Matrix", "Reloaded"]);
}
