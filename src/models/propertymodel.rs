use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "property_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
    Villa,
    Office,
    Land,
    Commercial,
}

impl PropertyType {
    pub fn to_str(&self) -> &str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
            PropertyType::Villa => "villa",
            PropertyType::Office => "office",
            PropertyType::Land => "land",
            PropertyType::Commercial => "commercial",
        }
    }
}

impl FromStr for PropertyType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "house" => Ok(PropertyType::House),
            "apartment" => Ok(PropertyType::Apartment),
            "villa" => Ok(PropertyType::Villa),
            "office" => Ok(PropertyType::Office),
            "land" => Ok(PropertyType::Land),
            "commercial" => Ok(PropertyType::Commercial),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "property_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PropertyStatus {
    ForSale,
    ForRent,
    Sold,
    Rented,
}

impl PropertyStatus {
    pub fn to_str(&self) -> &str {
        match self {
            PropertyStatus::ForSale => "for-sale",
            PropertyStatus::ForRent => "for-rent",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Rented => "rented",
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "for-sale" => Ok(PropertyStatus::ForSale),
            "for-rent" => Ok(PropertyStatus::ForRent),
            "sold" => Ok(PropertyStatus::Sold),
            "rented" => Ok(PropertyStatus::Rented),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Default)]
#[sqlx(type_name = "price_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PriceType {
    #[default]
    Total,
    PerMonth,
    PerYear,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Default)]
#[sqlx(type_name = "area_unit", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    #[default]
    Sqft,
    Sqm,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub agent_id: Uuid,

    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub status: PropertyStatus,

    // Pricing and size
    pub price: f64,
    pub price_type: PriceType,
    pub area: f64,
    pub area_unit: AreaUnit,

    pub bedrooms: i32,
    pub bathrooms: i32,
    pub parking: i32,
    pub year_built: Option<i32>,

    pub images: Vec<String>,

    #[sqlx(flatten)]
    pub location: Location,

    pub amenities: Vec<String>,
    pub featured: bool,
    pub is_active: bool,
    pub views: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public fields of the agent who owns a listing. The columns come from a
/// LEFT JOIN, so everything except the id may be missing.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AgentSummary {
    #[sqlx(rename = "agent_id")]
    pub id: Uuid,
    #[sqlx(rename = "agent_name")]
    pub name: Option<String>,
    #[sqlx(rename = "agent_email")]
    pub email: Option<String>,
    #[sqlx(rename = "agent_phone")]
    pub phone: Option<String>,
    #[sqlx(rename = "agent_avatar")]
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PropertyWithAgent {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub property: Property,

    #[sqlx(flatten)]
    pub agent: AgentSummary,
}
