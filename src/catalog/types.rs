//! Listing data model.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::GuiaError;

/// Supported display locales.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Es => Self::En,
            Self::En => Self::Es,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = GuiaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "es" | "es-mx" | "spanish" => Ok(Self::Es),
            "en" | "en-us" | "english" => Ok(Self::En),
            other => Err(GuiaError::Config(format!(
                "invalid locale {other} (expected es|en)"
            ))),
        }
    }
}

/// A value with one variant per locale. Either side may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Localized<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<T>,
}

impl<T> Localized<T> {
    #[must_use]
    pub const fn new(es: Option<T>, en: Option<T>) -> Self {
        Self { es, en }
    }

    #[must_use]
    pub const fn get(&self, locale: Locale) -> Option<&T> {
        match locale {
            Locale::Es => self.es.as_ref(),
            Locale::En => self.en.as_ref(),
        }
    }

    /// Variant for `locale`, falling back to the other locale.
    #[must_use]
    pub fn get_or_other(&self, locale: Locale) -> Option<&T> {
        self.get(locale).or_else(|| self.get(locale.other()))
    }

    pub fn variants(&self) -> impl Iterator<Item = &T> {
        self.es.iter().chain(self.en.iter())
    }
}

impl Localized<String> {
    /// Both locale variants joined with a space.
    #[must_use]
    pub fn joined(&self) -> String {
        self.variants().map(String::as_str).collect::<Vec<_>>().join(" ")
    }
}

impl Localized<Vec<String>> {
    #[must_use]
    pub fn joined(&self) -> String {
        self.variants()
            .flat_map(|items| items.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Fixed set of listing categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Restaurant,
    Hotel,
    Attraction,
    Shopping,
    Service,
    Activity,
    Wellness,
    Nightlife,
}

impl Category {
    pub const ALL: [Self; 8] = [
        Self::Restaurant,
        Self::Hotel,
        Self::Attraction,
        Self::Shopping,
        Self::Service,
        Self::Activity,
        Self::Wellness,
        Self::Nightlife,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Hotel => "hotel",
            Self::Attraction => "attraction",
            Self::Shopping => "shopping",
            Self::Service => "service",
            Self::Activity => "activity",
            Self::Wellness => "wellness",
            Self::Nightlife => "nightlife",
        }
    }

    /// Human label in the given locale.
    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Restaurant, Locale::Es) => "restaurantes",
            (Self::Restaurant, Locale::En) => "restaurants",
            (Self::Hotel, Locale::Es) => "hoteles",
            (Self::Hotel, Locale::En) => "hotels",
            (Self::Attraction, Locale::Es) => "atracciones",
            (Self::Attraction, Locale::En) => "attractions",
            (Self::Shopping, Locale::Es) => "compras",
            (Self::Shopping, Locale::En) => "shopping",
            (Self::Service, Locale::Es) => "servicios",
            (Self::Service, Locale::En) => "services",
            (Self::Activity, Locale::Es) => "actividades",
            (Self::Activity, Locale::En) => "activities",
            (Self::Wellness, Locale::Es) => "bienestar",
            (Self::Wellness, Locale::En) => "wellness",
            (Self::Nightlife, Locale::Es) => "vida nocturna",
            (Self::Nightlife, Locale::En) => "nightlife",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = GuiaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.id() == wanted)
            .ok_or_else(|| GuiaError::Config(format!("unknown category {value}")))
    }
}

/// A `(longitude, latitude)` pair in degrees. Serialized as `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(value: Coordinates) -> Self {
        [value.lon, value.lat]
    }
}

impl FromStr for Coordinates {
    type Err = GuiaError;

    /// Parses `"lon,lat"`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (lon, lat) = value
            .split_once(',')
            .ok_or_else(|| GuiaError::Config(format!("expected LON,LAT, got {value}")))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|err| GuiaError::Config(format!("invalid coordinate {part}: {err}")))
        };
        let coords = Self::new(parse(lon)?, parse(lat)?);
        if !coords.is_valid() {
            return Err(GuiaError::Config(format!(
                "coordinate out of range: {value}"
            )));
        }
        Ok(coords)
    }
}

/// Opening window for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayHours {
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    pub open: Option<NaiveTime>,
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    pub close: Option<NaiveTime>,
    #[serde(default)]
    pub closed: bool,
}

impl DayHours {
    #[must_use]
    pub const fn window(open: NaiveTime, close: NaiveTime) -> Self {
        Self {
            open: Some(open),
            close: Some(close),
            closed: false,
        }
    }

    #[must_use]
    pub const fn closed() -> Self {
        Self {
            open: None,
            close: None,
            closed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperatingHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayHours>,
}

impl OperatingHours {
    #[must_use]
    pub const fn day(&self, weekday: Weekday) -> Option<&DayHours> {
        match weekday {
            Weekday::Mon => self.monday.as_ref(),
            Weekday::Tue => self.tuesday.as_ref(),
            Weekday::Wed => self.wednesday.as_ref(),
            Weekday::Thu => self.thursday.as_ref(),
            Weekday::Fri => self.friday.as_ref(),
            Weekday::Sat => self.saturday.as_ref(),
            Weekday::Sun => self.sunday.as_ref(),
        }
    }

    /// Same hours for every day of the week.
    #[must_use]
    pub const fn every_day(hours: DayHours) -> Self {
        Self {
            monday: Some(hours),
            tuesday: Some(hours),
            wednesday: Some(hours),
            thursday: Some(hours),
            friday: Some(hours),
            saturday: Some(hours),
            sunday: Some(hours),
        }
    }
}

/// A place or business in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    #[serde(default)]
    pub name: Localized<String>,
    #[serde(default)]
    pub description: Localized<String>,
    #[serde(default)]
    pub address: Localized<String>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(
        default,
        deserialize_with = "lenient::rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::price_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub tags: Localized<Vec<String>>,
    #[serde(default)]
    pub amenities: Localized<Vec<String>>,
    #[serde(default)]
    pub has_wifi: bool,
    #[serde(default)]
    pub has_parking: bool,
    #[serde(default)]
    pub accepts_cards: bool,
    #[serde(default)]
    pub is_pet_friendly: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<OperatingHours>,
}

impl Listing {
    /// Display name in `locale`, falling back to the other locale, then the id.
    #[must_use]
    pub fn display_name(&self, locale: Locale) -> &str {
        self.name
            .get_or_other(locale)
            .map_or(self.id.as_str(), String::as_str)
    }
}

/// Numeric fields that read as `None` when the value is not a usable number,
/// so one bad listing never rejects the whole catalog.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(Value::as_f64).filter(|r| r.is_finite()))
    }

    pub fn price_level<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(Value::as_u64)
            .and_then(|level| u8::try_from(level).ok()))
    }
}

/// `"HH:MM"` (or `"HH:MM:SS"`) serde for optional times.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|value| {
            NaiveTime::parse_from_str(&value, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M:%S"))
                .map_err(|err| serde::de::Error::custom(format!("invalid time {value}: {err}")))
        })
        .transpose()
    }
}
