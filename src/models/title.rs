use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Kind of content a title represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    #[serde(alias = "tv")]
    Show,
}

impl MediaType {
    /// Parses the metadata provider's `media_type` tag
    ///
    /// Anything other than a movie or a TV show (e.g. `person`) is not a title.
    pub fn from_provider_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "movie" => Some(MediaType::Movie),
            "tv" | "show" => Some(MediaType::Show),
            _ => None,
        }
    }

    /// Path segment of the metadata provider's detail endpoint
    pub fn path_segment(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Show => "tv",
        }
    }

    /// Value of the availability provider's `content_type` search filter
    pub fn content_type(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Show => "tv",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Show => write!(f, "show"),
        }
    }
}

/// A movie or TV show as normalized from the metadata provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    /// Provider-native identifier, stringified
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    /// ISO date (`YYYY-MM-DD`)
    #[serde(default)]
    pub release_date: Option<String>,
    pub media_type: MediaType,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Title {
    /// Year component of the release date, when it parses
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .map(|date| date.year())
    }

    /// Full poster image URL at the given size (e.g. `w500`)
    pub fn poster_url(&self, size: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}/{}{}", POSTER_BASE_URL, size, path))
    }
}

/// Key used to find a title on the availability provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLookup {
    pub title: String,
    pub year: Option<i32>,
    pub media_type: MediaType,
    pub region: String,
}

impl TitleLookup {
    pub fn from_title(title: &Title, region: &str) -> Self {
        Self {
            title: title.title.clone(),
            year: title.release_year(),
            media_type: title.media_type,
            region: region.to_string(),
        }
    }
}
