//! Tests for the normalize module

use super::*;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn raw(pairs: &[(&str, RawValue)]) -> RawRecord {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

fn titled(pairs: &[(&str, RawValue)]) -> RawRecord {
    let mut record = raw(pairs);
    record.insert("title".to_string(), RawValue::text("The Matrix"));
    record
}

fn sample_value(field: CanonicalField) -> RawValue {
    match field {
        CanonicalField::TmdbId => RawValue::Int(603),
        CanonicalField::ReleaseYear => RawValue::text("1999-03-31"),
        CanonicalField::Runtime | CanonicalField::MetacriticScore => RawValue::Float(136.0),
        CanonicalField::ImdbRating | CanonicalField::TmdbRating => RawValue::text("8.7"),
        CanonicalField::Genres | CanonicalField::CastList => RawValue::text("A, B"),
        CanonicalField::PosterUrl | CanonicalField::ThumbUrl => RawValue::text("/x.jpg"),
        _ => RawValue::text("value"),
    }
}

// ============================================================================
// Alias Table Tests
// ============================================================================

#[test]
fn test_alias_table_is_valid() {
    alias::validate().unwrap();
    Normalizer::new().unwrap();
}

#[test]
fn test_alias_table_rejects_duplicates() {
    let table = [
        ("title", CanonicalField::Title),
        ("title", CanonicalField::Overview),
    ];
    let err = alias::validate_table(&table).unwrap_err();
    assert!(err.to_string().contains("duplicate alias 'title'"));
}

#[test]
fn test_alias_table_requires_self_mapping() {
    let table: Vec<_> = alias::ALIASES
        .iter()
        .copied()
        .filter(|(alias, _)| *alias != "runtime")
        .collect();
    let err = alias::validate_table(&table).unwrap_err();
    assert!(err.to_string().contains("'runtime'"));
}

#[test_case("TMDB_ID", FieldKey::Canonical(CanonicalField::TmdbId) ; "upper snake alias")]
#[test_case("Release Year", FieldKey::Canonical(CanonicalField::ReleaseYear) ; "spaced alias")]
#[test_case("vote_average", FieldKey::Canonical(CanonicalField::TmdbRating) ; "api alias")]
#[test_case("TITLE", FieldKey::Canonical(CanonicalField::Title) ; "lowercased fallback hits canonical")]
#[test_case("DESCRIPTION", FieldKey::Canonical(CanonicalField::Overview) ; "lowercased fallback hits alias")]
#[test_case("Box Office", FieldKey::Unmapped("box office".to_string()) ; "unknown is lowercased")]
fn test_resolve(key: &str, expected: FieldKey) {
    assert_eq!(alias::resolve(key), expected);
}

#[test]
fn test_every_alias_populates_exactly_its_field() {
    for &(alias, field) in alias::ALIASES {
        let record = if field == CanonicalField::Title {
            raw(&[(alias, RawValue::text("The Matrix"))])
        } else {
            let mut record = raw(&[(alias, sample_value(field))]);
            record.insert("title".to_string(), RawValue::text("The Matrix"));
            record
        };

        let movie = normalize(&record).unwrap_or_else(|| panic!("alias {alias} rejected"));
        let mut expected = vec![CanonicalField::Title];
        if field != CanonicalField::Title {
            expected.push(field);
            expected.sort();
        }
        assert_eq!(movie.populated_fields(), expected, "alias {alias}");
        assert!(movie.extra.is_empty(), "alias {alias}");
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_missing_title_is_rejected() {
    let record = raw(&[
        ("tmdb_id", RawValue::Int(603)),
        ("overview", RawValue::text("A hacker learns the truth")),
    ]);
    assert!(normalize(&record).is_none());
}

#[test_case(RawValue::Null ; "null")]
#[test_case(RawValue::text("") ; "empty")]
#[test_case(RawValue::text("   ") ; "blank")]
#[test_case(RawValue::Float(f64::NAN) ; "nan")]
fn test_unusable_title_is_rejected(title: RawValue) {
    let record = raw(&[("Title", title), ("year", RawValue::Int(1999))]);
    assert!(normalize(&record).is_none());
}

#[test]
fn test_title_falls_back_to_alias_when_canonical_key_is_blank() {
    let record = raw(&[
        ("title", RawValue::text(" ")),
        ("Title", RawValue::text("Heat")),
    ]);
    assert_eq!(normalize(&record).unwrap().title, "Heat");
}

#[test]
fn test_canonical_key_wins_over_alias() {
    let record = raw(&[
        ("Title", RawValue::text("Alias Title")),
        ("title", RawValue::text("Canonical Title")),
        ("id", RawValue::Int(1)),
        ("tmdb_id", RawValue::Int(2)),
    ]);
    let movie = normalize(&record).unwrap();
    assert_eq!(movie.title, "Canonical Title");
    assert_eq!(movie.tmdb_id, Some(2));
}

#[test]
fn test_failed_alias_does_not_block_later_alias() {
    let record = titled(&[
        ("Release Year", RawValue::text("unknown")),
        ("year", RawValue::Int(1999)),
    ]);
    assert_eq!(normalize(&record).unwrap().release_year, Some(1999));
}

#[test]
fn test_normalize_all_counts_rejections() {
    let raws = vec![
        raw(&[("Title", RawValue::text("Heat"))]),
        raw(&[("overview", RawValue::text("no title"))]),
        raw(&[("title", RawValue::text("Ronin"))]),
    ];
    let outcome = Normalizer::default().normalize_all(&raws);
    assert_eq!(outcome.rejected, 1);
    let titles: Vec<_> = outcome.records.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Heat", "Ronin"]);
}

// ============================================================================
// Coercion Tests
// ============================================================================

#[test_case(RawValue::Int(603), Some(603) ; "integer")]
#[test_case(RawValue::Float(603.0), Some(603) ; "integral float")]
#[test_case(RawValue::Float(603.5), None ; "fractional float")]
#[test_case(RawValue::text(" 603 "), Some(603) ; "padded text")]
#[test_case(RawValue::text("603.0"), None ; "float text")]
#[test_case(RawValue::text("abc"), None ; "garbage")]
#[test_case(RawValue::Bool(true), None ; "bool")]
fn test_tmdb_id_coercion(value: RawValue, expected: Option<i64>) {
    let movie = normalize(&titled(&[("TMDB_ID", value)])).unwrap();
    assert_eq!(movie.tmdb_id, expected);
}

#[test_case(RawValue::text("1999-12-31"), Some(1999) ; "iso date")]
#[test_case(RawValue::text("1999"), Some(1999) ; "year text")]
#[test_case(RawValue::Int(1999), Some(1999) ; "year int")]
#[test_case(RawValue::Float(1999.0), Some(1999) ; "year float")]
#[test_case(RawValue::text("1999/12/31"), None ; "slashed date")]
#[test_case(RawValue::text("-12-31"), None ; "missing year")]
fn test_release_year_coercion(value: RawValue, expected: Option<i32>) {
    let movie = normalize(&titled(&[("release_year", value)])).unwrap();
    assert_eq!(movie.release_year, expected);
}

#[test_case(RawValue::text("136.9"), Some(136) ; "float text truncates")]
#[test_case(RawValue::Float(136.9), Some(136) ; "float truncates")]
#[test_case(RawValue::Int(136), Some(136) ; "int")]
#[test_case(RawValue::text("inf"), None ; "infinite")]
#[test_case(RawValue::text("2h 16m"), None ; "free text")]
fn test_runtime_coercion(value: RawValue, expected: Option<i32>) {
    let movie = normalize(&titled(&[("Runtime", value.clone()), ("Metascore", value)])).unwrap();
    assert_eq!(movie.runtime, expected);
    assert_eq!(movie.metacritic_score, expected);
}

#[test_case(RawValue::text("8.7"), Some(8.7) ; "text")]
#[test_case(RawValue::Int(8), Some(8.0) ; "int")]
#[test_case(RawValue::text("N/A"), None ; "marker")]
#[test_case(RawValue::text("NaN"), None ; "nan text")]
fn test_rating_coercion(value: RawValue, expected: Option<f64>) {
    let movie = normalize(&titled(&[("IMDB Rating", value.clone()), ("vote_average", value)]))
        .unwrap();
    assert_eq!(movie.imdb_rating, expected);
    assert_eq!(movie.tmdb_rating, expected);
}

#[test]
fn test_array_normalization_forms_agree() {
    let expected = Some(vec!["Drama".to_string(), "Thriller".to_string()]);

    let json_string = RawValue::text("[\"Drama\", \"Thriller\"]");
    let real_array = RawValue::from(vec!["Drama".to_string(), "Thriller".to_string()]);
    let comma_string = RawValue::text("Drama, Thriller");

    for value in [json_string, real_array, comma_string] {
        let movie = normalize(&titled(&[("Genres", value)])).unwrap();
        assert_eq!(movie.genres, expected);
    }
}

#[test_case(RawValue::text("Keanu Reeves"), vec!["Keanu Reeves"] ; "single name")]
#[test_case(RawValue::text(" a , ,b,"), vec!["a", "b"] ; "empty elements dropped")]
#[test_case(RawValue::text("42"), vec!["42"] ; "json scalar")]
#[test_case(RawValue::Int(18), vec!["18"] ; "scalar wrapped")]
#[test_case(RawValue::List(vec![RawValue::Int(18), RawValue::Null, RawValue::text("53")]), vec!["18", "53"] ; "mixed list")]
fn test_string_list_coercion(value: RawValue, expected: Vec<&str>) {
    let movie = normalize(&titled(&[("cast", value)])).unwrap();
    let expected: Vec<String> = expected.into_iter().map(String::from).collect();
    assert_eq!(movie.cast_list, Some(expected));
}

#[test]
fn test_url_completion() {
    let movie = normalize(&titled(&[
        ("poster_path", RawValue::text("/pB8BM7.jpg")),
        ("backdrop_path", RawValue::text("/bg.jpg")),
    ]))
    .unwrap();
    assert_eq!(
        movie.poster_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/pB8BM7.jpg")
    );
    assert_eq!(
        movie.thumb_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w300/bg.jpg")
    );
}

#[test]
fn test_absolute_url_passes_through() {
    let url = "https://cdn.example.com/poster.jpg";
    let movie = normalize(&titled(&[("Poster URL", RawValue::text(url))])).unwrap();
    assert_eq!(movie.poster_url.as_deref(), Some(url));
}

#[test]
fn test_custom_image_bases() {
    let normalizer = Normalizer::default().with_image_bases("http://img/big/", "http://img/small");
    let movie = normalizer
        .normalize(&titled(&[
            ("poster_url", RawValue::text("/p.jpg")),
            ("thumb_url", RawValue::text("/t.jpg")),
        ]))
        .unwrap();
    assert_eq!(movie.poster_url.as_deref(), Some("http://img/big/p.jpg"));
    assert_eq!(movie.thumb_url.as_deref(), Some("http://img/small/t.jpg"));
}

#[test]
fn test_other_fields_become_strings() {
    let movie = normalize(&titled(&[
        ("Director", RawValue::text("Lana Wachowski")),
        ("IMDB ID", RawValue::text("tt0133093")),
        ("rated", RawValue::Float(13.0)),
        ("Box Office", RawValue::Int(463_517_383)),
    ]))
    .unwrap();
    assert_eq!(movie.director.as_deref(), Some("Lana Wachowski"));
    assert_eq!(movie.imdb_id.as_deref(), Some("tt0133093"));
    assert_eq!(movie.mpaa_rating.as_deref(), Some("13"));
    assert_eq!(
        movie.extra.get("box office").map(String::as_str),
        Some("463517383")
    );
}

#[test]
fn test_missing_values_are_skipped() {
    let movie = normalize(&titled(&[
        ("overview", RawValue::Null),
        ("director", RawValue::text("")),
        ("runtime", RawValue::Float(f64::NAN)),
    ]))
    .unwrap();
    assert_eq!(movie.populated_fields(), vec![CanonicalField::Title]);
}

// ============================================================================
// Round Trip Tests
// ============================================================================

#[test]
fn test_renormalizing_canonical_record_is_identity() {
    let source = raw(&[
        ("TMDB_ID", RawValue::Float(603.0)),
        ("Title", RawValue::text("The Matrix")),
        ("description", RawValue::text("Neo wakes up")),
        ("Release Year", RawValue::text("1999-03-31")),
        ("Runtime", RawValue::text("136")),
        ("poster_path", RawValue::text("/m.jpg")),
        ("IMDB Rating", RawValue::text("8.7")),
        ("Genres", RawValue::text("[\"Action\", \"Science Fiction\"]")),
        ("cast", RawValue::text("Keanu Reeves, Carrie-Anne Moss")),
        ("Studio", RawValue::text("Warner Bros.")),
    ]);

    let first = normalize(&source).unwrap();
    let second = normalize(&first.to_raw()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_serialized_payload_omits_absent_fields() {
    let mut movie = CanonicalRecord::titled("Heat");
    movie.tmdb_id = Some(949);
    movie.extra.insert("studio".to_string(), "Warner".to_string());

    let json = serde_json::to_value(&movie).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"tmdb_id": 949, "title": "Heat", "studio": "Warner"})
    );
    assert_eq!(movie.column_names(), vec!["tmdb_id", "title", "studio"]);
}

#[test]
fn test_merge_from_prefers_populated_fields() {
    let mut base = CanonicalRecord::titled("Heat");
    base.tmdb_id = Some(949);
    base.runtime = Some(170);

    let mut update = CanonicalRecord::default();
    update.overview = Some("Cops and robbers".to_string());
    update.runtime = Some(171);
    base.merge_from(update);

    assert_eq!(base.title, "Heat");
    assert_eq!(base.tmdb_id, Some(949));
    assert_eq!(base.runtime, Some(171));
    assert_eq!(base.overview.as_deref(), Some("Cops and robbers"));
}

#[test]
fn test_raw_from_json() {
    let value = serde_json::json!({
        "id": 603,
        "vote_average": 8.2,
        "genre_ids": [28, 878],
        "adult": false,
        "belongs_to_collection": {"id": 2344}
    });
    let record = raw_from_json(&value).unwrap();
    assert_eq!(record["id"], RawValue::Int(603));
    assert_eq!(record["vote_average"], RawValue::Float(8.2));
    assert_eq!(
        record["genre_ids"],
        RawValue::List(vec![RawValue::Int(28), RawValue::Int(878)])
    );
    assert_eq!(record["adult"], RawValue::Bool(false));
    assert_eq!(
        record["belongs_to_collection"],
        RawValue::text("{\"id\":2344}")
    );
    assert!(raw_from_json(&serde_json::json!([1, 2])).is_none());
}
