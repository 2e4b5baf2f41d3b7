//! Row builders for the Postgres-backed store tests.

use uuid::Uuid;

use super::{db::DBClient, propertydb::PropertyExt, userdb::UserExt};
use crate::{
    dtos::propertydtos::{CreatePropertyDto, LocationDto},
    models::{
        propertymodel::{Property, PropertyType},
        usermodel::{User, UserRole},
    },
};

pub async fn insert_user(
    db_client: &DBClient,
    name: &str,
    role: UserRole,
    is_active: bool,
) -> anyhow::Result<User> {
    let email = format!("{}@estate.com", name.to_lowercase().replace(' ', "."));
    let user = db_client
        .save_user(name, email.as_str(), "hashed", None, role)
        .await?;

    if is_active {
        return Ok(user);
    }
    let user = db_client
        .toggle_user_active(user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user {} vanished", user.id))?;
    Ok(user)
}

pub fn listing(title: &str, city: &str, price: f64) -> CreatePropertyDto {
    CreatePropertyDto {
        title: title.to_string(),
        description: format!("{} in {}", title, city),
        property_type: PropertyType::House,
        status: None,
        price,
        price_type: None,
        area: 1200.0,
        area_unit: None,
        bedrooms: Some(2),
        bathrooms: Some(1),
        parking: None,
        year_built: None,
        images: vec![],
        location: LocationDto {
            address: "1 Main Road".to_string(),
            city: city.to_string(),
            state: "Maharashtra".to_string(),
            country: None,
            pincode: None,
            latitude: None,
            longitude: None,
        },
        amenities: vec![],
        featured: None,
        is_active: None,
    }
}

pub async fn insert_listing(
    db_client: &DBClient,
    agent_id: Uuid,
    property: CreatePropertyDto,
) -> anyhow::Result<Property> {
    Ok(db_client.create_property(agent_id, property).await?)
}
