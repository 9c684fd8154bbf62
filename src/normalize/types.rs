//! Raw and canonical record types

use crate::types::JsonValue;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Raw side
// ============================================================================

/// A loosely-typed value as produced by a file reader or a provider
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Absent / null
    Null,
    /// Boolean
    Bool(bool),
    /// Integral number
    Int(i64),
    /// Floating-point number (may be NaN for blank spreadsheet cells)
    Float(f64),
    /// Text
    Text(String),
    /// Sequence of values
    List(Vec<RawValue>),
}

impl RawValue {
    /// Whether the value is one of the source formats' "missing" markers
    pub fn is_missing(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(s) => s.is_empty(),
            RawValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Convenience constructor for text values
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }
}

impl From<&JsonValue> for RawValue {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => RawValue::Null,
            JsonValue::Bool(b) => RawValue::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Int(i),
                None => n.as_f64().map_or(RawValue::Null, RawValue::Float),
            },
            JsonValue::String(s) => RawValue::Text(s.clone()),
            JsonValue::Array(items) => RawValue::List(items.iter().map(RawValue::from).collect()),
            JsonValue::Object(_) => RawValue::Text(value.to_string()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(values: Vec<String>) -> Self {
        RawValue::List(values.into_iter().map(RawValue::Text).collect())
    }
}

/// One input record: source field name → raw value
pub type RawRecord = BTreeMap<String, RawValue>;

/// Build a raw record from a JSON object; non-objects yield `None`
pub fn raw_from_json(value: &JsonValue) -> Option<RawRecord> {
    let object = value.as_object()?;
    Some(
        object
            .iter()
            .map(|(key, value)| (key.clone(), RawValue::from(value)))
            .collect(),
    )
}

// ============================================================================
// Canonical side
// ============================================================================

/// Fields of the canonical movie schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanonicalField {
    TmdbId,
    Title,
    Overview,
    ReleaseYear,
    Runtime,
    PosterUrl,
    ThumbUrl,
    MpaaRating,
    ImdbRating,
    TmdbRating,
    MetacriticScore,
    ImdbId,
    Director,
    Genres,
    CastList,
}

impl CanonicalField {
    /// Every canonical field, in schema order
    pub const ALL: [CanonicalField; 15] = [
        CanonicalField::TmdbId,
        CanonicalField::Title,
        CanonicalField::Overview,
        CanonicalField::ReleaseYear,
        CanonicalField::Runtime,
        CanonicalField::PosterUrl,
        CanonicalField::ThumbUrl,
        CanonicalField::MpaaRating,
        CanonicalField::ImdbRating,
        CanonicalField::TmdbRating,
        CanonicalField::MetacriticScore,
        CanonicalField::ImdbId,
        CanonicalField::Director,
        CanonicalField::Genres,
        CanonicalField::CastList,
    ];

    /// Column name in the store
    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::TmdbId => "tmdb_id",
            CanonicalField::Title => "title",
            CanonicalField::Overview => "overview",
            CanonicalField::ReleaseYear => "release_year",
            CanonicalField::Runtime => "runtime",
            CanonicalField::PosterUrl => "poster_url",
            CanonicalField::ThumbUrl => "thumb_url",
            CanonicalField::MpaaRating => "mpaa_rating",
            CanonicalField::ImdbRating => "imdb_rating",
            CanonicalField::TmdbRating => "tmdb_rating",
            CanonicalField::MetacriticScore => "metacritic_score",
            CanonicalField::ImdbId => "imdb_id",
            CanonicalField::Director => "director",
            CanonicalField::Genres => "genres",
            CanonicalField::CastList => "cast_list",
        }
    }

    /// Look up a field by its exact column name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a raw field name lands after alias resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    /// A known schema field
    Canonical(CanonicalField),
    /// Unknown name, lower-cased and passed through
    Unmapped(String),
}

/// A movie record conforming to the canonical schema
///
/// Only `title` is guaranteed; absent optional fields are left out of the
/// serialized payload so the store applies its column defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CanonicalRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<i64>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpaa_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metacritic_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast_list: Option<Vec<String>>,
    /// Unmapped source fields, keyed by their lower-cased name
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl CanonicalRecord {
    /// Create a record with only a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Value of a canonical field, expressed as a raw value
    pub fn get(&self, field: CanonicalField) -> Option<RawValue> {
        fn text(value: &Option<String>) -> Option<RawValue> {
            value.clone().map(RawValue::Text)
        }
        fn list(value: &Option<Vec<String>>) -> Option<RawValue> {
            value.clone().map(RawValue::from)
        }

        match field {
            CanonicalField::TmdbId => self.tmdb_id.map(RawValue::Int),
            CanonicalField::Title => Some(RawValue::Text(self.title.clone())),
            CanonicalField::Overview => text(&self.overview),
            CanonicalField::ReleaseYear => self.release_year.map(|v| RawValue::Int(v.into())),
            CanonicalField::Runtime => self.runtime.map(|v| RawValue::Int(v.into())),
            CanonicalField::PosterUrl => text(&self.poster_url),
            CanonicalField::ThumbUrl => text(&self.thumb_url),
            CanonicalField::MpaaRating => text(&self.mpaa_rating),
            CanonicalField::ImdbRating => self.imdb_rating.map(RawValue::Float),
            CanonicalField::TmdbRating => self.tmdb_rating.map(RawValue::Float),
            CanonicalField::MetacriticScore => {
                self.metacritic_score.map(|v| RawValue::Int(v.into()))
            }
            CanonicalField::ImdbId => text(&self.imdb_id),
            CanonicalField::Director => text(&self.director),
            CanonicalField::Genres => list(&self.genres),
            CanonicalField::CastList => list(&self.cast_list),
        }
    }

    /// Canonical fields that carry a value
    pub fn populated_fields(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .filter(|field| match field {
                CanonicalField::Title => !self.title.is_empty(),
                other => self.get(*other).is_some(),
            })
            .collect()
    }

    /// Column names present in the serialized payload
    pub fn column_names(&self) -> Vec<String> {
        self.populated_fields()
            .into_iter()
            .map(|field| field.name().to_string())
            .chain(self.extra.keys().cloned())
            .collect()
    }

    /// Express this record as raw input keyed by canonical names
    pub fn to_raw(&self) -> RawRecord {
        let mut raw: RawRecord = CanonicalField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|v| (field.name().to_string(), v)))
            .collect();
        for (key, value) in &self.extra {
            raw.insert(key.clone(), RawValue::Text(value.clone()));
        }
        raw
    }

    /// Copy every populated field of `other` over this record
    ///
    /// The title is only replaced when `other` has one.
    pub fn merge_from(&mut self, other: CanonicalRecord) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }

        if !other.title.is_empty() {
            self.title = other.title;
        }
        take!(
            tmdb_id,
            overview,
            release_year,
            runtime,
            poster_url,
            thumb_url,
            mpaa_rating,
            imdb_rating,
            tmdb_rating,
            metacritic_score,
            imdb_id,
            director,
            genres,
            cast_list
        );
        self.extra.extend(other.extra);
    }
}
