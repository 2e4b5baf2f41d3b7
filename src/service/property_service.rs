// service/property_service.rs
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{db::DBClient, propertydb::PropertyExt},
    dtos::propertydtos::{CreatePropertyDto, ListingQueryDto, UpdatePropertyDto},
    models::{
        propertymodel::{Property, PropertyWithAgent},
        usermodel::{User, UserRole},
    },
    service::{
        error::ServiceError,
        property_query::{Pagination, PropertySearchFilters, SortOrder},
    },
};

/// One page of search results.
#[derive(Debug, Serialize)]
pub struct PropertyPage {
    pub properties: Vec<PropertyWithAgent>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

#[derive(Debug, Clone)]
pub struct PropertyService<S = DBClient> {
    db_client: Arc<S>,
}

impl<S> PropertyService<S>
where
    S: PropertyExt + Send + Sync,
{
    pub fn new(db_client: Arc<S>) -> Self {
        Self { db_client }
    }

    pub async fn search(&self, query: &ListingQueryDto) -> Result<PropertyPage, ServiceError> {
        let filters = PropertySearchFilters::from_query(query);
        let sort = SortOrder::parse(query.sort.as_deref());
        let pagination = Pagination::from_query(query);

        tracing::debug!(?filters, ?sort, ?pagination, "searching properties");

        let (properties, total) = self
            .db_client
            .search_properties(&filters, sort, pagination)
            .await?;

        Ok(PropertyPage {
            properties,
            total,
            page: pagination.page,
            limit: pagination.limit,
            pages: pagination.pages(total),
        })
    }

    /// Returns the listing with its agent; each call counts as one view.
    pub async fn view(&self, property_id: Uuid) -> Result<PropertyWithAgent, ServiceError> {
        self.db_client
            .view_property(property_id)
            .await?
            .ok_or(ServiceError::PropertyNotFound(property_id))
    }

    pub async fn create(
        &self,
        agent: &User,
        property_data: CreatePropertyDto,
    ) -> Result<Property, ServiceError> {
        property_data
            .validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;
        property_data
            .validate_area()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let property = self.db_client.create_property(agent.id, property_data).await?;
        tracing::info!("Property {} created by {}", property.id, agent.id);
        Ok(property)
    }

    pub async fn update(
        &self,
        actor: &User,
        property_id: Uuid,
        update: UpdatePropertyDto,
    ) -> Result<Property, ServiceError> {
        update
            .validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;
        update
            .validate_area()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let property = self.owned_property(actor, property_id).await?;
        let updated = self
            .db_client
            .update_property(&update.apply(property))
            .await?;

        tracing::info!("Property {} updated by {}", property_id, actor.id);
        Ok(updated)
    }

    pub async fn delete(&self, actor: &User, property_id: Uuid) -> Result<(), ServiceError> {
        self.owned_property(actor, property_id).await?;

        if !self.db_client.delete_property(property_id).await? {
            return Err(ServiceError::PropertyNotFound(property_id));
        }

        tracing::info!("Property {} deleted by {}", property_id, actor.id);
        Ok(())
    }

    /// The caller's listings, newest first, including inactive ones.
    pub async fn my_properties(&self, agent: &User) -> Result<Vec<Property>, ServiceError> {
        Ok(self.db_client.get_properties_by_agent(agent.id).await?)
    }

    async fn owned_property(&self, actor: &User, property_id: Uuid) -> Result<Property, ServiceError> {
        let property = self
            .db_client
            .get_property_by_id(property_id)
            .await?
            .ok_or(ServiceError::PropertyNotFound(property_id))?;

        if property.agent_id != actor.id && actor.role != UserRole::Admin {
            return Err(ServiceError::NotPropertyOwner {
                user_id: actor.id,
                property_id,
            });
        }

        Ok(property)
    }
}
