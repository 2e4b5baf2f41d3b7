use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    dtos::propertydtos::CreatePropertyDto,
    models::propertymodel::{Property, PropertyStatus, PropertyWithAgent, PriceType, AreaUnit},
    service::property_query::{Pagination, PropertySearchFilters, SortOrder},
};

/// Listing columns plus the owning agent's public fields, aliased so they map
/// onto `PropertyWithAgent`.
const LISTING_SELECT: &str = r#"
    SELECT p.*,
        u.name AS agent_name,
        u.email AS agent_email,
        u.phone AS agent_phone,
        u.avatar AS agent_avatar
    FROM properties p
    LEFT JOIN users u ON u.id = p.agent_id"#;

#[async_trait]
pub trait PropertyExt {
    async fn create_property(
        &self,
        agent_id: Uuid,
        property_data: CreatePropertyDto,
    ) -> Result<Property, sqlx::Error>;

    async fn get_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error>;

    /// Fetches one listing with its agent and bumps the view counter by one
    /// in the same statement.
    async fn view_property(
        &self,
        property_id: Uuid,
    ) -> Result<Option<PropertyWithAgent>, sqlx::Error>;

    /// Returns the requested page and the total number of matches.
    async fn search_properties(
        &self,
        filters: &PropertySearchFilters,
        sort: SortOrder,
        pagination: Pagination,
    ) -> Result<(Vec<PropertyWithAgent>, i64), sqlx::Error>;

    async fn get_properties_by_agent(
        &self,
        agent_id: Uuid,
    ) -> Result<Vec<Property>, sqlx::Error>;

    /// Writes every editable column of `property`. The view counter is left
    /// to `view_property`.
    async fn update_property(
        &self,
        property: &Property,
    ) -> Result<Property, sqlx::Error>;

    async fn delete_property(
        &self,
        property_id: Uuid,
    ) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl PropertyExt for DBClient {
    async fn create_property(
        &self,
        agent_id: Uuid,
        property_data: CreatePropertyDto,
    ) -> Result<Property, sqlx::Error> {
        let location = property_data.location;

        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                agent_id, title, description, property_type, status, price, price_type,
                area, area_unit, bedrooms, bathrooms, parking, year_built, images,
                address, city, state, country, pincode, latitude, longitude,
                amenities, featured, is_active
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
            ) RETURNING *
            "#,
        )
        .bind(agent_id)
        .bind(property_data.title)
        .bind(property_data.description)
        .bind(property_data.property_type)
        .bind(property_data.status.unwrap_or(PropertyStatus::ForSale))
        .bind(property_data.price)
        .bind(property_data.price_type.unwrap_or(PriceType::Total))
        .bind(property_data.area)
        .bind(property_data.area_unit.unwrap_or(AreaUnit::Sqft))
        .bind(property_data.bedrooms.unwrap_or(0))
        .bind(property_data.bathrooms.unwrap_or(0))
        .bind(property_data.parking.unwrap_or(0))
        .bind(property_data.year_built)
        .bind(property_data.images)
        .bind(location.address)
        .bind(location.city)
        .bind(location.state)
        .bind(location.country.unwrap_or_else(|| "India".to_string()))
        .bind(location.pincode)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(property_data.amenities)
        .bind(property_data.featured.unwrap_or(false))
        .bind(property_data.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        Ok(property)
    }

    async fn get_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(
            "SELECT * FROM properties WHERE id = $1",
        )
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    async fn view_property(
        &self,
        property_id: Uuid,
    ) -> Result<Option<PropertyWithAgent>, sqlx::Error> {
        let property = sqlx::query_as::<_, PropertyWithAgent>(
            r#"
            WITH p AS (
                UPDATE properties
                SET views = views + 1
                WHERE id = $1
                RETURNING *
            )
            SELECT p.*,
                u.name AS agent_name,
                u.email AS agent_email,
                u.phone AS agent_phone,
                u.avatar AS agent_avatar
            FROM p
            LEFT JOIN users u ON u.id = p.agent_id
            "#,
        )
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    async fn search_properties(
        &self,
        filters: &PropertySearchFilters,
        sort: SortOrder,
        pagination: Pagination,
    ) -> Result<(Vec<PropertyWithAgent>, i64), sqlx::Error> {
        let mut page_query = QueryBuilder::<Postgres>::new(LISTING_SELECT);
        filters.push_where(&mut page_query);
        sort.push_order_by(&mut page_query);
        pagination.push_limit_offset(&mut page_query);

        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM properties p");
        filters.push_where(&mut count_query);

        let (properties, total) = tokio::try_join!(
            page_query
                .build_query_as::<PropertyWithAgent>()
                .fetch_all(&self.pool),
            count_query
                .build_query_scalar::<i64>()
                .fetch_one(&self.pool),
        )?;

        Ok((properties, total))
    }

    async fn get_properties_by_agent(
        &self,
        agent_id: Uuid,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let properties = sqlx::query_as::<_, Property>(
            "SELECT * FROM properties WHERE agent_id = $1 ORDER BY created_at DESC",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(properties)
    }

    async fn update_property(
        &self,
        property: &Property,
    ) -> Result<Property, sqlx::Error> {
        let location = &property.location;

        let updated = sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties SET
                title = $2, description = $3, property_type = $4, status = $5,
                price = $6, price_type = $7, area = $8, area_unit = $9,
                bedrooms = $10, bathrooms = $11, parking = $12, year_built = $13,
                images = $14, address = $15, city = $16, state = $17, country = $18,
                pincode = $19, latitude = $20, longitude = $21, amenities = $22,
                featured = $23, is_active = $24, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(property.id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(property.property_type)
        .bind(property.status)
        .bind(property.price)
        .bind(property.price_type)
        .bind(property.area)
        .bind(property.area_unit)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.parking)
        .bind(property.year_built)
        .bind(&property.images)
        .bind(&location.address)
        .bind(&location.city)
        .bind(&location.state)
        .bind(&location.country)
        .bind(&location.pincode)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(&property.amenities)
        .bind(property.featured)
        .bind(property.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_property(
        &self,
        property_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(property_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
