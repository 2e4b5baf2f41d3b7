//! In-memory store backing the service tests. Implements the same store
//! traits as `DBClient` with the predicates evaluated in Rust.

use std::{collections::BTreeMap, sync::Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{
    analyticsdb::{AnalyticsExt, PropertyCountFilter, UserCountFilter},
    propertydb::PropertyExt,
    reportdb::{NewReport, ReportExt},
};
use crate::{
    dtos::propertydtos::CreatePropertyDto,
    models::{
        propertymodel::{
            AgentSummary, AreaUnit, Location, PriceType, Property, PropertyStatus, PropertyType,
            PropertyWithAgent,
        },
        reportmodel::{CityRevenue, GroupCount, Report, ReportAuthor, ReportStatus, ReportWithAuthor},
        usermodel::{User, UserRole},
    },
    service::property_query::{Pagination, PropertySearchFilters, SortOrder},
};
use sqlx::types::Json;

#[derive(Debug, Default)]
pub struct MemoryStore {
    properties: Mutex<Vec<Property>>,
    users: Mutex<Vec<User>>,
    reports: Mutex<Vec<Report>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) -> User {
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn insert_property(&self, property: Property) -> Property {
        self.properties.lock().unwrap().push(property.clone());
        property
    }

    pub fn property(&self, property_id: Uuid) -> Option<Property> {
        self.properties
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == property_id)
            .cloned()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }

    fn with_agent(&self, property: Property) -> PropertyWithAgent {
        let users = self.users.lock().unwrap();
        let agent = users.iter().find(|u| u.id == property.agent_id);
        PropertyWithAgent {
            agent: AgentSummary {
                id: property.agent_id,
                name: agent.map(|u| u.name.clone()),
                email: agent.map(|u| u.email.clone()),
                phone: agent.and_then(|u| u.phone.clone()),
                avatar: agent.and_then(|u| u.avatar.clone()),
            },
            property,
        }
    }

    fn with_author(&self, report: Report) -> ReportWithAuthor {
        let users = self.users.lock().unwrap();
        let author = users
            .iter()
            .find(|u| u.id == report.generated_by)
            .map(|u| ReportAuthor {
                name: Some(u.name.clone()),
                email: Some(u.email.clone()),
            })
            .unwrap_or_default();
        ReportWithAuthor { report, author }
    }
}

pub fn sample_user(name: &str, role: UserRole, is_active: bool) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@estate.com", name.to_lowercase().replace(' ', ".")),
        password: "hashed".to_string(),
        role,
        phone: None,
        avatar: None,
        is_active,
        created_at: now,
        updated_at: now,
    }
}

/// An active for-sale house. `age_minutes` pushes `created_at` into the past
/// so ordering tests are deterministic.
pub fn sample_property(agent_id: Uuid, title: &str, city: &str, price: f64, age_minutes: i64) -> Property {
    let created_at = Utc::now() - Duration::minutes(age_minutes);
    Property {
        id: Uuid::new_v4(),
        agent_id,
        title: title.to_string(),
        description: format!("{} in {}", title, city),
        property_type: PropertyType::House,
        status: PropertyStatus::ForSale,
        price,
        price_type: PriceType::Total,
        area: 1200.0,
        area_unit: AreaUnit::Sqft,
        bedrooms: 2,
        bathrooms: 1,
        parking: 0,
        year_built: None,
        images: vec![],
        location: Location {
            address: "1 Main Road".to_string(),
            city: city.to_string(),
            state: "Maharashtra".to_string(),
            country: "India".to_string(),
            pincode: None,
            latitude: None,
            longitude: None,
        },
        amenities: vec![],
        featured: false,
        is_active: true,
        views: 0,
        created_at,
        updated_at: created_at,
    }
}

#[async_trait]
impl PropertyExt for MemoryStore {
    async fn create_property(
        &self,
        agent_id: Uuid,
        property_data: CreatePropertyDto,
    ) -> Result<Property, sqlx::Error> {
        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            agent_id,
            title: property_data.title,
            description: property_data.description,
            property_type: property_data.property_type,
            status: property_data.status.unwrap_or(PropertyStatus::ForSale),
            price: property_data.price,
            price_type: property_data.price_type.unwrap_or_default(),
            area: property_data.area,
            area_unit: property_data.area_unit.unwrap_or_default(),
            bedrooms: property_data.bedrooms.unwrap_or(0),
            bathrooms: property_data.bathrooms.unwrap_or(0),
            parking: property_data.parking.unwrap_or(0),
            year_built: property_data.year_built,
            images: property_data.images,
            location: property_data.location.into(),
            amenities: property_data.amenities,
            featured: property_data.featured.unwrap_or(false),
            is_active: property_data.is_active.unwrap_or(true),
            views: 0,
            created_at: now,
            updated_at: now,
        };
        Ok(self.insert_property(property))
    }

    async fn get_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        Ok(self.property(property_id))
    }

    async fn view_property(
        &self,
        property_id: Uuid,
    ) -> Result<Option<PropertyWithAgent>, sqlx::Error> {
        let viewed = {
            let mut properties = self.properties.lock().unwrap();
            properties.iter_mut().find(|p| p.id == property_id).map(|p| {
                p.views += 1;
                p.clone()
            })
        };
        Ok(viewed.map(|p| self.with_agent(p)))
    }

    async fn search_properties(
        &self,
        filters: &PropertySearchFilters,
        sort: SortOrder,
        pagination: Pagination,
    ) -> Result<(Vec<PropertyWithAgent>, i64), sqlx::Error> {
        let mut matching: Vec<Property> = self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| filters.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| sort.compare(a, b));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit as usize)
            .map(|p| self.with_agent(p))
            .collect();

        Ok((page, total))
    }

    async fn get_properties_by_agent(
        &self,
        agent_id: Uuid,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let mut owned: Vec<Property> = self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.agent_id == agent_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| SortOrder::default().compare(a, b));
        Ok(owned)
    }

    async fn update_property(
        &self,
        property: &Property,
    ) -> Result<Property, sqlx::Error> {
        let mut properties = self.properties.lock().unwrap();
        let stored = properties
            .iter_mut()
            .find(|p| p.id == property.id)
            .ok_or(sqlx::Error::RowNotFound)?;

        let views = stored.views;
        *stored = Property { views, ..property.clone() };
        Ok(stored.clone())
    }

    async fn delete_property(
        &self,
        property_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let mut properties = self.properties.lock().unwrap();
        let before = properties.len();
        properties.retain(|p| p.id != property_id);
        Ok(properties.len() < before)
    }
}

fn group_counts<I: Iterator<Item = String>>(keys: I) -> Vec<GroupCount> {
    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(key, count)| GroupCount { key, count })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    groups
}

#[async_trait]
impl AnalyticsExt for MemoryStore {
    async fn count_properties(
        &self,
        filter: PropertyCountFilter,
    ) -> Result<i64, sqlx::Error> {
        let properties = self.properties.lock().unwrap();
        let count = properties
            .iter()
            .filter(|p| !filter.active_only || p.is_active)
            .filter(|p| filter.status.map_or(true, |s| p.status == s))
            .filter(|p| !filter.featured_only || p.featured)
            .count();
        Ok(count as i64)
    }

    async fn average_active_price(&self) -> Result<f64, sqlx::Error> {
        let properties = self.properties.lock().unwrap();
        let prices: Vec<f64> = properties
            .iter()
            .filter(|p| p.is_active)
            .map(|p| p.price)
            .collect();
        if prices.is_empty() {
            return Ok(0.0);
        }
        Ok(prices.iter().sum::<f64>() / prices.len() as f64)
    }

    async fn count_properties_by_type(
        &self,
        active_only: bool,
    ) -> Result<Vec<GroupCount>, sqlx::Error> {
        let properties = self.properties.lock().unwrap();
        Ok(group_counts(
            properties
                .iter()
                .filter(|p| !active_only || p.is_active)
                .map(|p| p.property_type.to_str().to_string()),
        ))
    }

    async fn count_properties_by_status(&self) -> Result<Vec<GroupCount>, sqlx::Error> {
        let properties = self.properties.lock().unwrap();
        Ok(group_counts(
            properties.iter().map(|p| p.status.to_str().to_string()),
        ))
    }

    async fn sum_price_by_status(
        &self,
        status: PropertyStatus,
    ) -> Result<f64, sqlx::Error> {
        let properties = self.properties.lock().unwrap();
        Ok(properties
            .iter()
            .filter(|p| p.status == status)
            .map(|p| p.price)
            .sum())
    }

    async fn revenue_by_city(
        &self,
        limit: i64,
    ) -> Result<Vec<CityRevenue>, sqlx::Error> {
        let properties = self.properties.lock().unwrap();
        let mut by_city: BTreeMap<String, (f64, i64)> = BTreeMap::new();
        for property in properties.iter() {
            let entry = by_city.entry(property.location.city.clone()).or_default();
            entry.0 += property.price;
            entry.1 += 1;
        }

        let mut revenue: Vec<CityRevenue> = by_city
            .into_iter()
            .map(|(city, (total, count))| CityRevenue { city, total, count })
            .collect();
        revenue.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.city.cmp(&b.city)));
        revenue.truncate(limit.max(0) as usize);
        Ok(revenue)
    }

    async fn count_users(
        &self,
        filter: UserCountFilter,
    ) -> Result<i64, sqlx::Error> {
        let users = self.users.lock().unwrap();
        let count = users
            .iter()
            .filter(|u| !filter.active_only || u.is_active)
            .filter(|u| filter.role.map_or(true, |r| u.role == r))
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl ReportExt for MemoryStore {
    async fn create_report(&self, report: NewReport) -> Result<Report, sqlx::Error> {
        let now = Utc::now();
        let report = Report {
            id: Uuid::new_v4(),
            title: report.title,
            report_type: report.report_type,
            description: report.description,
            data: Json(report.data),
            filters: report.filters.map(Json),
            generated_by: report.generated_by,
            status: ReportStatus::Completed,
            created_at: now,
            updated_at: now,
        };
        self.reports.lock().unwrap().push(report.clone());
        Ok(report)
    }

    async fn get_reports(&self) -> Result<Vec<ReportWithAuthor>, sqlx::Error> {
        let mut reports = self.reports();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports.into_iter().map(|r| self.with_author(r)).collect())
    }

    async fn get_report(&self, report_id: Uuid) -> Result<Option<ReportWithAuthor>, sqlx::Error> {
        let report = self.reports().into_iter().find(|r| r.id == report_id);
        Ok(report.map(|r| self.with_author(r)))
    }

    async fn delete_report(&self, report_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut reports = self.reports.lock().unwrap();
        let before = reports.len();
        reports.retain(|r| r.id != report_id);
        Ok(reports.len() < before)
    }
}
