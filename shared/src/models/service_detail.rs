//! Category-specific service detail records
//!
//! Each provider offers exactly one category of wedding service. Every
//! category has its own table keyed by `owner_id`; this module maps the
//! category tag to that table and its column schema.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Wedding service categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Hall,
    Cake,
    Decoration,
    Photographer,
    Music,
    Car,
}

/// Table and columns backing one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySchema {
    pub category: ServiceCategory,
    pub tag: &'static str,
    pub table: &'static str,
    pub label: &'static str,
    pub fields: &'static [&'static str],
}

/// Dispatch table. Adding a category is one entry here plus one
/// `ServiceDetail` variant.
pub const CATEGORY_SCHEMAS: [CategorySchema; 6] = [
    CategorySchema {
        category: ServiceCategory::Hall,
        tag: "hall",
        table: "halls",
        label: "Hall Details",
        fields: &[
            "hall_name",
            "address",
            "capacity",
            "price_range",
            "features",
            "additional_info",
        ],
    },
    CategorySchema {
        category: ServiceCategory::Cake,
        tag: "cake",
        table: "cakes",
        label: "Cake Details",
        fields: &[
            "cake_type",
            "flavors",
            "sizes",
            "price_range",
            "decoration_style",
            "special_notes",
        ],
    },
    CategorySchema {
        category: ServiceCategory::Decoration,
        tag: "decoration",
        table: "decoration",
        label: "Decoration Details",
        fields: &[
            "decoration_style",
            "theme",
            "price_range",
            "services_included",
            "special_features",
        ],
    },
    CategorySchema {
        category: ServiceCategory::Photographer,
        tag: "photographer",
        table: "photographers",
        label: "Photography Details",
        fields: &[
            "studio_name",
            "specialization",
            "experience_years",
            "package_price",
            "equipment",
            "portfolio_link",
        ],
    },
    CategorySchema {
        category: ServiceCategory::Music,
        tag: "music",
        table: "musics",
        label: "Music Details",
        fields: &[
            "band_name",
            "music_genre",
            "price_range",
            "members_count",
            "equipment_provided",
        ],
    },
    CategorySchema {
        category: ServiceCategory::Car,
        tag: "car",
        table: "cars",
        label: "Car Details",
        fields: &[
            "car_model",
            "car_type",
            "year",
            "price_per_hour",
            "capacity",
            "features",
        ],
    },
];

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 6] = [
        ServiceCategory::Hall,
        ServiceCategory::Cake,
        ServiceCategory::Decoration,
        ServiceCategory::Photographer,
        ServiceCategory::Music,
        ServiceCategory::Car,
    ];

    pub fn schema(&self) -> &'static CategorySchema {
        // Table order matches variant order
        &CATEGORY_SCHEMAS[*self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        self.schema().tag
    }

    pub fn table(&self) -> &'static str {
        self.schema().table
    }

    /// Parse an `owner_type` tag; unknown tags have no detail table
    pub fn parse(tag: &str) -> Option<Self> {
        CATEGORY_SCHEMAS
            .iter()
            .find(|schema| schema.tag == tag)
            .map(|schema| schema.category)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HallDetail {
    pub hall_name: Option<String>,
    pub address: Option<String>,
    pub capacity: Option<i32>,
    pub price_range: Option<String>,
    pub features: Option<String>,
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CakeDetail {
    pub cake_type: Option<String>,
    pub flavors: Option<String>,
    pub sizes: Option<String>,
    pub price_range: Option<String>,
    pub decoration_style: Option<String>,
    pub special_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DecorationDetail {
    pub decoration_style: Option<String>,
    pub theme: Option<String>,
    pub price_range: Option<String>,
    pub services_included: Option<String>,
    pub special_features: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PhotographerDetail {
    pub studio_name: Option<String>,
    pub specialization: Option<String>,
    pub experience_years: Option<i32>,
    pub package_price: Option<String>,
    pub equipment: Option<String>,
    pub portfolio_link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MusicDetail {
    pub band_name: Option<String>,
    pub music_genre: Option<String>,
    pub price_range: Option<String>,
    pub members_count: Option<i32>,
    pub equipment_provided: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CarDetail {
    pub car_model: Option<String>,
    pub car_type: Option<String>,
    pub year: Option<i32>,
    pub price_per_hour: Option<Decimal>,
    pub capacity: Option<i32>,
    pub features: Option<String>,
}

/// Detail record for one provider, tagged by category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ServiceDetail {
    Hall(HallDetail),
    Cake(CakeDetail),
    Decoration(DecorationDetail),
    Photographer(PhotographerDetail),
    Music(MusicDetail),
    Car(CarDetail),
}

impl ServiceDetail {
    /// Decode a raw row of the category's table. Unknown columns are ignored.
    pub fn from_row(
        category: ServiceCategory,
        row: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match category {
            ServiceCategory::Hall => ServiceDetail::Hall(serde_json::from_value(row)?),
            ServiceCategory::Cake => ServiceDetail::Cake(serde_json::from_value(row)?),
            ServiceCategory::Decoration => {
                ServiceDetail::Decoration(serde_json::from_value(row)?)
            }
            ServiceCategory::Photographer => {
                ServiceDetail::Photographer(serde_json::from_value(row)?)
            }
            ServiceCategory::Music => ServiceDetail::Music(serde_json::from_value(row)?),
            ServiceCategory::Car => ServiceDetail::Car(serde_json::from_value(row)?),
        })
    }

    pub fn category(&self) -> ServiceCategory {
        match self {
            ServiceDetail::Hall(_) => ServiceCategory::Hall,
            ServiceDetail::Cake(_) => ServiceCategory::Cake,
            ServiceDetail::Decoration(_) => ServiceCategory::Decoration,
            ServiceDetail::Photographer(_) => ServiceCategory::Photographer,
            ServiceDetail::Music(_) => ServiceCategory::Music,
            ServiceDetail::Car(_) => ServiceCategory::Car,
        }
    }
}
