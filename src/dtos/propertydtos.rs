use std::borrow::Cow;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::propertymodel::{
    AreaUnit, Location, PriceType, Property, PropertyStatus, PropertyType,
};

/// Raw listing query string. Every field stays a string so a malformed value
/// never fails extraction; coercion happens in `service::property_query`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ListingQueryDto {
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
    pub bedrooms: Option<String>,
    pub featured: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationDto {
    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,

    #[validate(length(min = 1, max = 100, message = "State is required"))]
    pub state: String,

    #[validate(length(max = 100, message = "Country must be at most 100 characters"))]
    pub country: Option<String>,

    #[validate(length(max = 20, message = "Pincode must be at most 20 characters"))]
    pub pincode: Option<String>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<LocationDto> for Location {
    fn from(dto: LocationDto) -> Self {
        Location {
            address: dto.address,
            city: dto.city,
            state: dto.state,
            country: dto.country.unwrap_or_else(|| "India".to_string()),
            pincode: dto.pincode,
            latitude: dto.latitude,
            longitude: dto.longitude,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub status: Option<PropertyStatus>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[serde(alias = "price_type")]
    pub price_type: Option<PriceType>,

    pub area: f64,
    #[serde(alias = "area_unit")]
    pub area_unit: Option<AreaUnit>,

    #[validate(range(min = 0, message = "Bedrooms cannot be negative"))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0, message = "Bathrooms cannot be negative"))]
    pub bathrooms: Option<i32>,
    #[validate(range(min = 0, message = "Parking cannot be negative"))]
    pub parking: Option<i32>,
    #[serde(alias = "year_built")]
    pub year_built: Option<i32>,

    #[serde(default)]
    pub images: Vec<String>,

    #[validate]
    pub location: LocationDto,

    #[serde(default)]
    pub amenities: Vec<String>,
    pub featured: Option<bool>,
    #[serde(alias = "is_active")]
    pub is_active: Option<bool>,
}

impl CreatePropertyDto {
    pub fn validate_area(&self) -> Result<(), ValidationError> {
        check_area(self.area)
    }
}

/// Partial update. Absent fields keep their stored value; the view counter,
/// owner and timestamps are never writable through this DTO.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyDto {
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub status: Option<PropertyStatus>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[serde(alias = "price_type")]
    pub price_type: Option<PriceType>,

    pub area: Option<f64>,
    #[serde(alias = "area_unit")]
    pub area_unit: Option<AreaUnit>,

    #[validate(range(min = 0, message = "Bedrooms cannot be negative"))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0, message = "Bathrooms cannot be negative"))]
    pub bathrooms: Option<i32>,
    #[validate(range(min = 0, message = "Parking cannot be negative"))]
    pub parking: Option<i32>,
    #[serde(alias = "year_built")]
    pub year_built: Option<i32>,

    pub images: Option<Vec<String>>,

    #[validate]
    pub location: Option<LocationDto>,

    pub amenities: Option<Vec<String>>,
    pub featured: Option<bool>,
    #[serde(alias = "is_active")]
    pub is_active: Option<bool>,
}

impl UpdatePropertyDto {
    pub fn validate_area(&self) -> Result<(), ValidationError> {
        match self.area {
            Some(area) => check_area(area),
            None => Ok(()),
        }
    }

    pub fn apply(self, mut property: Property) -> Property {
        if let Some(title) = self.title {
            property.title = title;
        }
        if let Some(description) = self.description {
            property.description = description;
        }
        if let Some(property_type) = self.property_type {
            property.property_type = property_type;
        }
        if let Some(status) = self.status {
            property.status = status;
        }
        if let Some(price) = self.price {
            property.price = price;
        }
        if let Some(price_type) = self.price_type {
            property.price_type = price_type;
        }
        if let Some(area) = self.area {
            property.area = area;
        }
        if let Some(area_unit) = self.area_unit {
            property.area_unit = area_unit;
        }
        if let Some(bedrooms) = self.bedrooms {
            property.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            property.bathrooms = bathrooms;
        }
        if let Some(parking) = self.parking {
            property.parking = parking;
        }
        if self.year_built.is_some() {
            property.year_built = self.year_built;
        }
        if let Some(images) = self.images {
            property.images = images;
        }
        if let Some(location) = self.location {
            property.location = location.into();
        }
        if let Some(amenities) = self.amenities {
            property.amenities = amenities;
        }
        if let Some(featured) = self.featured {
            property.featured = featured;
        }
        if let Some(is_active) = self.is_active {
            property.is_active = is_active;
        }
        property.updated_at = Utc::now();
        property
    }
}

fn check_area(area: f64) -> Result<(), ValidationError> {
    if area.is_finite() && area > 0.0 {
        return Ok(());
    }
    let mut error = ValidationError::new("invalid_area");
    error.message = Some(Cow::from("Area must be greater than zero"));
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn location() -> LocationDto {
        LocationDto {
            address: "7 Rose Garden Lane".to_string(),
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            country: None,
            pincode: None,
            latitude: None,
            longitude: None,
        }
    }

    fn create_dto() -> CreatePropertyDto {
        CreatePropertyDto {
            title: "Colonial Villa".to_string(),
            description: "Four bedrooms and a garden".to_string(),
            property_type: PropertyType::Villa,
            status: None,
            price: 85_000_000.0,
            price_type: None,
            area: 5500.0,
            area_unit: None,
            bedrooms: Some(4),
            bathrooms: Some(5),
            parking: None,
            year_built: Some(1985),
            images: vec![],
            location: location(),
            amenities: vec!["Pool".to_string()],
            featured: None,
            is_active: None,
        }
    }

    #[test]
    fn test_create_dto_validation() {
        let dto = create_dto();
        assert!(dto.validate().is_ok());
        assert!(dto.validate_area().is_ok());

        let mut negative = create_dto();
        negative.price = -1.0;
        assert!(negative.validate().is_err());

        let mut zero_area = create_dto();
        zero_area.area = 0.0;
        assert!(zero_area.validate_area().is_err());

        let mut no_city = create_dto();
        no_city.location.city = String::new();
        assert!(no_city.validate().is_err());
    }

    #[test]
    fn test_location_defaults_country() {
        let location: Location = location().into();
        assert_eq!(location.country, "India");
    }

    #[test]
    fn test_create_dto_accepts_wire_names() {
        let dto: CreatePropertyDto = serde_json::from_value(serde_json::json!({
            "title": "Studio",
            "description": "Compact",
            "type": "apartment",
            "status": "for-rent",
            "price": 28000,
            "price_type": "per-month",
            "area": 550,
            "location": { "address": "56 100ft Road", "city": "Bangalore", "state": "Karnataka" }
        }))
        .unwrap();

        assert_eq!(dto.property_type, PropertyType::Apartment);
        assert_eq!(dto.status, Some(PropertyStatus::ForRent));
        assert_eq!(dto.price_type, Some(PriceType::PerMonth));
        assert!(dto.images.is_empty());
    }

    #[test]
    fn test_property_dtos_accept_camel_case_keys() {
        let dto: CreatePropertyDto = serde_json::from_value(serde_json::json!({
            "title": "Sea View Flat",
            "description": "Two bedrooms near the beach",
            "type": "apartment",
            "status": "for-rent",
            "price": 45000,
            "priceType": "per-month",
            "area": 90,
            "areaUnit": "sqm",
            "yearBuilt": 2020,
            "isActive": false,
            "location": { "address": "Juhu Tara Road", "city": "Mumbai", "state": "Maharashtra" }
        }))
        .unwrap();

        assert_eq!(dto.price_type, Some(PriceType::PerMonth));
        assert_eq!(dto.area_unit, Some(AreaUnit::Sqm));
        assert_eq!(dto.year_built, Some(2020));
        assert_eq!(dto.is_active, Some(false));

        let update: UpdatePropertyDto = serde_json::from_value(serde_json::json!({
            "priceType": "per-year",
            "areaUnit": "sqft",
            "yearBuilt": 1999,
            "isActive": true
        }))
        .unwrap();

        assert_eq!(update.price_type, Some(PriceType::PerYear));
        assert_eq!(update.area_unit, Some(AreaUnit::Sqft));
        assert_eq!(update.year_built, Some(1999));
        assert_eq!(update.is_active, Some(true));
    }

    #[test]
    fn test_update_apply_keeps_unset_fields() {
        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            agent_id: Uuid::new_v4(),
            title: "Old title".to_string(),
            description: "Old description".to_string(),
            property_type: PropertyType::House,
            status: PropertyStatus::ForSale,
            price: 100.0,
            price_type: PriceType::Total,
            area: 10.0,
            area_unit: AreaUnit::Sqm,
            bedrooms: 2,
            bathrooms: 1,
            parking: 0,
            year_built: Some(2001),
            images: vec![],
            location: location().into(),
            amenities: vec![],
            featured: false,
            is_active: true,
            views: 42,
            created_at: now,
            updated_at: now,
        };

        let update = UpdatePropertyDto {
            price: Some(250.0),
            status: Some(PropertyStatus::Sold),
            ..Default::default()
        };

        let updated = update.apply(property);
        assert_eq!(updated.price, 250.0);
        assert_eq!(updated.status, PropertyStatus::Sold);
        assert_eq!(updated.title, "Old title");
        assert_eq!(updated.year_built, Some(2001));
        assert_eq!(updated.views, 42);

        let json = serde_json::to_value(&updated).unwrap();
        assert_eq!(json["type"], "house");
        assert_eq!(json["priceType"], "total");
        assert_eq!(json["areaUnit"], "sqm");
        assert_eq!(json["yearBuilt"], 2001);
        assert_eq!(json["isActive"], true);
        assert!(json.get("agentId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("price_type").is_none());
    }
}
