use {
    crate::{error::Error, model::Meal},
    chrono::NaiveDateTime,
    serde::{Deserialize, Serialize},
    std::{fs, path::Path},
};

static DEFAULT_CONTENT: &str = include_str!("../content/site.json");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub address: String,
    pub map_link: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgendaItem {
    pub time: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    pub color: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DressCode {
    pub description: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub palette: Vec<Swatch>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter: String,
    pub title: String,
    pub date: String,
    pub paragraphs: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub src: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub name: String,
    pub distance: String,
    pub address: String,
    pub rating: f32,
    pub link: String,
}

/// Everything static the page shows
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    pub couple: [String; 2],
    pub tagline: String,
    /// Local wall-clock time the countdown runs to
    pub wedding_date: NaiveDateTime,
    pub date_label: String,
    pub time_label: String,
    pub venue: Venue,
    pub agenda: Vec<AgendaItem>,
    pub dress_code: DressCode,
    pub chapters: Vec<Chapter>,
    pub photos: Vec<Photo>,
    pub hotels: Vec<Hotel>,
    pub registry_url: String,
    pub menu: Vec<Meal>,
}

impl SiteContent {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::from)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The content shipped with the binary
    pub fn embedded() -> Result<Self, Error> {
        Self::from_json(DEFAULT_CONTENT)
    }
}
