use serde::{Deserialize, Serialize};

/// Discriminator between the two catalogued media kinds. Affects endpoint
/// selection and which name/date fields the upstream populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

/// One page of search or trending results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MediaSummary>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// A movie or TV show as it appears in search and trending results. Movies
/// carry `title`/`release_date`, shows carry `name`/`first_air_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSummary {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub video: bool,
    #[serde(default)]
    pub original_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// Full movie record, optionally carrying embedded credits, external ids
/// and best-effort ratings enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub budget: i64,
    #[serde(default)]
    pub revenue: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub video: bool,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ids: Option<ExternalIds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omdb_data: Option<OmdbRecord>,
}

/// Full TV show record, shaped like [`MovieDetails`] but with the
/// show-specific naming and season fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvDetails {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub first_air_date: String,
    #[serde(default)]
    pub last_air_date: String,
    #[serde(default)]
    pub number_of_episodes: u32,
    #[serde(default)]
    pub number_of_seasons: u32,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "type")]
    pub show_type: String,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub networks: Vec<Network>,
    #[serde(default)]
    pub created_by: Vec<Creator>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ids: Option<ExternalIds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omdb_data: Option<OmdbRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub credit_id: String,
    #[serde(default)]
    pub gender: i32,
    #[serde(default)]
    pub known_for_department: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub credit_id: String,
    #[serde(default)]
    pub gender: i32,
    #[serde(default)]
    pub known_for_department: String,
}

/// Cross-reference identifiers for other metadata databases. `imdb_id` is
/// the key that unlocks ratings enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalIds {
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub facebook_id: Option<String>,
    #[serde(default)]
    pub instagram_id: Option<String>,
    #[serde(default)]
    pub twitter_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub iso_639_1: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub english_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionCountry {
    #[serde(default)]
    pub iso_3166_1: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creator {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub credit_id: String,
    #[serde(default)]
    pub gender: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub season_number: u32,
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub air_date: Option<String>,
}

/// Supplementary ratings data keyed by IMDb id. The upstream reports both
/// success and logical not-found with HTTP 200; `response` carries the
/// distinction and `error` the not-found message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub rated: String,
    #[serde(default)]
    pub released: String,
    #[serde(default)]
    pub runtime: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub writer: String,
    #[serde(default)]
    pub actors: String,
    #[serde(default)]
    pub plot: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub awards: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub ratings: Vec<OmdbRating>,
    #[serde(default)]
    pub metascore: String,
    #[serde(default, rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(default, rename = "imdbVotes")]
    pub imdb_votes: String,
    #[serde(default, rename = "imdbID")]
    pub imdb_id: String,
    #[serde(default, rename = "Type")]
    pub media_type: String,
    #[serde(default, rename = "totalSeasons", skip_serializing_if = "Option::is_none")]
    pub total_seasons: Option<String>,
    #[serde(default)]
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbRating {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub value: String,
}
