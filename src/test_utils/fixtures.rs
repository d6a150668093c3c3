use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tempfile::TempDir;

use crate::catalog::{
    Catalog, Category, Coordinates, DayHours, Listing, Localized, OperatingHours,
};

/// Fluent builder for test listings. Everything optional starts empty.
#[derive(Debug, Clone)]
pub struct ListingBuilder {
    listing: Listing,
}

impl ListingBuilder {
    #[must_use]
    pub fn new(id: &str, category: Category) -> Self {
        Self {
            listing: Listing {
                id: id.to_string(),
                name: Localized::default(),
                description: Localized::default(),
                address: Localized::default(),
                category,
                subcategory: None,
                coordinates: None,
                rating: None,
                price_level: None,
                tags: Localized::default(),
                amenities: Localized::default(),
                has_wifi: false,
                has_parking: false,
                accepts_cards: false,
                is_pet_friendly: false,
                featured: false,
                operating_hours: None,
            },
        }
    }

    #[must_use]
    pub fn name_es(mut self, name: &str) -> Self {
        self.listing.name.es = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn name_en(mut self, name: &str) -> Self {
        self.listing.name.en = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn description_es(mut self, text: &str) -> Self {
        self.listing.description.es = Some(text.to_string());
        self
    }

    #[must_use]
    pub fn description_en(mut self, text: &str) -> Self {
        self.listing.description.en = Some(text.to_string());
        self
    }

    #[must_use]
    pub fn address_es(mut self, text: &str) -> Self {
        self.listing.address.es = Some(text.to_string());
        self
    }

    #[must_use]
    pub fn tags_es(mut self, tags: &[&str]) -> Self {
        self.listing.tags.es = Some(tags.iter().map(|t| (*t).to_string()).collect());
        self
    }

    #[must_use]
    pub fn tags_en(mut self, tags: &[&str]) -> Self {
        self.listing.tags.en = Some(tags.iter().map(|t| (*t).to_string()).collect());
        self
    }

    #[must_use]
    pub fn subcategory(mut self, subcategory: &str) -> Self {
        self.listing.subcategory = Some(subcategory.to_string());
        self
    }

    #[must_use]
    pub const fn at(mut self, lon: f64, lat: f64) -> Self {
        self.listing.coordinates = Some(Coordinates::new(lon, lat));
        self
    }

    #[must_use]
    pub const fn rating(mut self, rating: f64) -> Self {
        self.listing.rating = Some(rating);
        self
    }

    #[must_use]
    pub const fn price(mut self, level: u8) -> Self {
        self.listing.price_level = Some(level);
        self
    }

    #[must_use]
    pub const fn featured(mut self, featured: bool) -> Self {
        self.listing.featured = featured;
        self
    }

    #[must_use]
    pub const fn wifi(mut self, value: bool) -> Self {
        self.listing.has_wifi = value;
        self
    }

    #[must_use]
    pub const fn parking(mut self, value: bool) -> Self {
        self.listing.has_parking = value;
        self
    }

    #[must_use]
    pub const fn cards(mut self, value: bool) -> Self {
        self.listing.accepts_cards = value;
        self
    }

    #[must_use]
    pub const fn pet_friendly(mut self, value: bool) -> Self {
        self.listing.is_pet_friendly = value;
        self
    }

    #[must_use]
    pub fn hours(mut self, hours: OperatingHours) -> Self {
        self.listing.operating_hours = Some(hours);
        self
    }

    #[must_use]
    pub fn build(self) -> Listing {
        self.listing
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Monday 2026-10-19 at 12:00 local time.
#[must_use]
pub fn monday_noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .unwrap_or_default()
}

/// Small Tepoztlán directory covering every category of data quirk the
/// engine has to tolerate. Every listing has a valid price and rating.
#[must_use]
pub fn sample_listings() -> Vec<Listing> {
    let mut market_hours = OperatingHours::every_day(DayHours::window(hm(8, 0), hm(18, 0)));
    market_hours.monday = Some(DayHours::closed());

    vec![
        ListingBuilder::new("pyramid-es", Category::Attraction)
            .name_es("Pirámide del Tepozteco")
            .description_es("Templo prehispánico en la cima del cerro")
            .address_es("Cerro del Tepozteco, Tepoztlán")
            .at(-99.0989, 18.9975)
            .price(1)
            .rating(4.8)
            .featured(true)
            .build(),
        ListingBuilder::new("pyramid-hike", Category::Activity)
            .name_en("Tepozteco Pyramid Hike")
            .description_en("Guided morning hike up to the pyramid")
            .tags_en(&["hiking", "tour"])
            .at(-99.0970, 18.9880)
            .price(2)
            .rating(4.6)
            .pet_friendly(true)
            .build(),
        ListingBuilder::new("colorines", Category::Restaurant)
            .name_es("Los Colorines")
            .description_es("Cocina mexicana tradicional")
            .address_es("Av. del Tepozteco 13")
            .at(-99.0972, 18.9866)
            .price(2)
            .rating(4.5)
            .cards(true)
            .hours(OperatingHours::every_day(DayHours::window(hm(9, 0), hm(21, 0))))
            .build(),
        ListingBuilder::new("axitla", Category::Restaurant)
            .name_es("Axitla")
            .description_es("Restaurante entre jardines al pie del cerro")
            .tags_es(&["terraza", "jardín"])
            .at(-99.0975, 18.9921)
            .price(3)
            .rating(4.4)
            .wifi(true)
            .parking(true)
            .build(),
        ListingBuilder::new("posada", Category::Hotel)
            .name_es("Posada del Tepozteco")
            .name_en("Tepozteco Inn")
            .description_en("Boutique hotel with pool and garden views")
            .at(-99.0995, 18.9872)
            .price(4)
            .rating(4.7)
            .wifi(true)
            .parking(true)
            .cards(true)
            .featured(true)
            .build(),
        ListingBuilder::new("casa-nahual", Category::Wellness)
            .name_es("Casa Nahual")
            .subcategory("temazcal")
            .price(3)
            .rating(4.9)
            .build(),
        ListingBuilder::new("mercado", Category::Shopping)
            .name_es("Mercado de Artesanías")
            .name_en("Crafts Market")
            .at(-250.0, 18.98)
            .price(1)
            .rating(4.2)
            .hours(market_hours)
            .build(),
        ListingBuilder::new("mezcaleria", Category::Nightlife)
            .name_es("La Mezcalería")
            .tags_es(&["mezcal", "música en vivo"])
            .at(-99.0963, 18.9856)
            .price(2)
            .rating(4.3)
            .cards(true)
            .hours(OperatingHours::every_day(DayHours::window(hm(20, 0), hm(2, 0))))
            .build(),
    ]
}

/// [`sample_listings`] as a validated catalog.
#[must_use]
pub fn sample_catalog() -> Catalog {
    Catalog::new(sample_listings()).unwrap_or_default()
}

/// Isolated directory holding a catalog JSON file and optional config.
pub struct CatalogFixture {
    pub temp_dir: TempDir,
    pub catalog_path: PathBuf,
}

impl CatalogFixture {
    /// Write `listings` as `listings.json` into a fresh temp dir.
    #[must_use]
    pub fn new(listings: &[Listing]) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let catalog_path = temp_dir.path().join("listings.json");
        let json = serde_json::to_string_pretty(listings).expect("serialize listings");
        std::fs::write(&catalog_path, json).expect("write catalog");
        Self {
            temp_dir,
            catalog_path,
        }
    }

    #[must_use]
    pub fn sample() -> Self {
        Self::new(&sample_listings())
    }

    /// Write a config file next to the catalog and return its path.
    #[must_use]
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join("guia.toml");
        std::fs::write(&path, content).expect("write config");
        path
    }
}
