//! Listing search.
//!
//! Raw query-string parameters are coerced into a typed [`PropertySearchFilters`],
//! which expands into a list of AND-ed [`Clause`]s. Each clause renders itself
//! into a `sqlx::QueryBuilder` with bound parameters, so user input never ends
//! up in the SQL text. Sorting and paging are carried separately by
//! [`SortOrder`] and [`Pagination`].

use std::str::FromStr;

use sqlx::{Postgres, QueryBuilder};

use crate::{
    dtos::propertydtos::ListingQueryDto,
    models::propertymodel::{PropertyStatus, PropertyType},
};

#[cfg(test)]
use crate::models::propertymodel::Property;

pub const DEFAULT_PAGE_LIMIT: i64 = 12;

/// An exact-match enum parameter. A value outside the enumeration still
/// constrains the search; it just matches no listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExactMatch<T> {
    Is(T),
    Unknown,
}

impl<T: FromStr> ExactMatch<T> {
    fn parse(raw: &str) -> Self {
        raw.parse().map_or(ExactMatch::Unknown, ExactMatch::Is)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PropertySearchFilters {
    pub property_type: Option<ExactMatch<PropertyType>>,
    pub status: Option<ExactMatch<PropertyStatus>>,
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<i32>,
    pub featured_only: bool,
    pub search: Option<String>,
}

/// One constraint on a listing. A record matches a filter when it satisfies
/// every clause; only `TextSearch` ORs internally.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Active,
    Nothing,
    TypeIs(PropertyType),
    StatusIs(PropertyStatus),
    CityContains(String),
    MinBedrooms(i32),
    PriceBetween { min: Option<f64>, max: Option<f64> },
    Featured,
    TextSearch(String),
}

impl PropertySearchFilters {
    /// Empty parameters and malformed numbers are dropped rather than rejected.
    pub fn from_query(query: &ListingQueryDto) -> Self {
        PropertySearchFilters {
            property_type: non_empty(&query.property_type).map(ExactMatch::parse),
            status: non_empty(&query.status).map(ExactMatch::parse),
            city: non_empty(&query.city).map(str::to_string),
            min_price: parse_number(&query.min_price),
            max_price: parse_number(&query.max_price),
            // fractional minimums round up: "2.5 bedrooms" means at least 3
            min_bedrooms: parse_number(&query.bedrooms).map(|b| b.ceil() as i32),
            featured_only: query.featured.as_deref() == Some("true"),
            search: non_empty(&query.search).map(str::to_string),
        }
    }

    pub fn clauses(&self) -> Vec<Clause> {
        let mut clauses = vec![Clause::Active];

        match self.property_type {
            Some(ExactMatch::Is(property_type)) => clauses.push(Clause::TypeIs(property_type)),
            Some(ExactMatch::Unknown) => clauses.push(Clause::Nothing),
            None => {}
        }
        match self.status {
            Some(ExactMatch::Is(status)) => clauses.push(Clause::StatusIs(status)),
            Some(ExactMatch::Unknown) => clauses.push(Clause::Nothing),
            None => {}
        }
        if let Some(city) = &self.city {
            clauses.push(Clause::CityContains(city.clone()));
        }
        if self.featured_only {
            clauses.push(Clause::Featured);
        }
        if let Some(bedrooms) = self.min_bedrooms {
            clauses.push(Clause::MinBedrooms(bedrooms));
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            clauses.push(Clause::PriceBetween {
                min: self.min_price,
                max: self.max_price,
            });
        }
        if let Some(search) = &self.search {
            clauses.push(Clause::TextSearch(search.clone()));
        }

        clauses
    }

    /// Appends ` WHERE ...` to a query selecting from `properties p`.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, clause) in self.clauses().iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            clause.push_sql(qb);
        }
    }

    #[cfg(test)]
    pub fn matches(&self, property: &Property) -> bool {
        self.clauses().iter().all(|clause| clause.matches(property))
    }
}

impl Clause {
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Clause::Active => {
                qb.push("p.is_active = TRUE");
            }
            Clause::Nothing => {
                qb.push("FALSE");
            }
            Clause::TypeIs(property_type) => {
                qb.push("p.property_type = ").push_bind(*property_type);
            }
            Clause::StatusIs(status) => {
                qb.push("p.status = ").push_bind(*status);
            }
            Clause::CityContains(city) => {
                qb.push("p.city ILIKE ").push_bind(like_pattern(city));
            }
            Clause::MinBedrooms(bedrooms) => {
                qb.push("p.bedrooms >= ").push_bind(*bedrooms);
            }
            Clause::PriceBetween { min, max } => match (min, max) {
                (Some(min), Some(max)) => {
                    qb.push("p.price >= ")
                        .push_bind(*min)
                        .push(" AND p.price <= ")
                        .push_bind(*max);
                }
                (Some(min), None) => {
                    qb.push("p.price >= ").push_bind(*min);
                }
                (None, Some(max)) => {
                    qb.push("p.price <= ").push_bind(*max);
                }
                (None, None) => {
                    qb.push("TRUE");
                }
            },
            Clause::Featured => {
                qb.push("p.featured = TRUE");
            }
            Clause::TextSearch(text) => {
                let pattern = like_pattern(text);
                qb.push("(p.title ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR p.description ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR p.address ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR p.city ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
        }
    }

    #[cfg(test)]
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            Clause::Active => property.is_active,
            Clause::Nothing => false,
            Clause::TypeIs(property_type) => property.property_type == *property_type,
            Clause::StatusIs(status) => property.status == *status,
            Clause::CityContains(city) => contains_ignore_case(&property.location.city, city),
            Clause::MinBedrooms(bedrooms) => property.bedrooms >= *bedrooms,
            Clause::PriceBetween { min, max } => {
                min.map_or(true, |min| property.price >= min)
                    && max.map_or(true, |max| property.price <= max)
            }
            Clause::Featured => property.featured,
            Clause::TextSearch(text) => {
                contains_ignore_case(&property.title, text)
                    || contains_ignore_case(&property.description, text)
                    || contains_ignore_case(&property.location.address, text)
                    || contains_ignore_case(&property.location.city, text)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Price,
    Views,
    Bedrooms,
    Area,
    Title,
}

impl SortField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "createdAt" | "created_at" => Some(SortField::CreatedAt),
            "updatedAt" | "updated_at" => Some(SortField::UpdatedAt),
            "price" => Some(SortField::Price),
            "views" => Some(SortField::Views),
            "bedrooms" => Some(SortField::Bedrooms),
            "area" => Some(SortField::Area),
            "title" => Some(SortField::Title),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "p.created_at",
            SortField::UpdatedAt => "p.updated_at",
            SortField::Price => "p.price",
            SortField::Views => "p.views",
            SortField::Bedrooms => "p.bedrooms",
            SortField::Area => "p.area",
            SortField::Title => "p.title",
        }
    }
}

/// Signed sort key such as `-createdAt` or `price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder {
            field: SortField::CreatedAt,
            descending: true,
        }
    }
}

impl SortOrder {
    /// Fields outside the sortable set fall back to newest first.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return SortOrder::default();
        };

        let (name, descending) = match raw.strip_prefix('-') {
            Some(name) => (name, true),
            None => (raw.strip_prefix('+').unwrap_or(raw), false),
        };

        match SortField::parse(name) {
            Some(field) => SortOrder { field, descending },
            None => SortOrder::default(),
        }
    }

    /// Appends ` ORDER BY ...`; the id tiebreak keeps pages stable.
    pub fn push_order_by(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" ORDER BY ")
            .push(self.field.column())
            .push(if self.descending { " DESC" } else { " ASC" })
            .push(", p.id ASC");
    }

    #[cfg(test)]
    pub fn compare(&self, a: &Property, b: &Property) -> std::cmp::Ordering {
        let ordering = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Views => a.views.cmp(&b.views),
            SortField::Bedrooms => a.bedrooms.cmp(&b.bedrooms),
            SortField::Area => a.area.total_cmp(&b.area),
            SortField::Title => a.title.cmp(&b.title),
        };
        let ordering = if self.descending { ordering.reverse() } else { ordering };
        ordering.then_with(|| a.id.cmp(&b.id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    pub fn from_query(query: &ListingQueryDto) -> Self {
        Pagination {
            page: parse_positive(&query.page).unwrap_or(1),
            limit: parse_positive(&query.limit).unwrap_or(DEFAULT_PAGE_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total - 1) / self.limit + 1
    }

    pub fn push_limit_offset(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" LIMIT ")
            .push_bind(self.limit)
            .push(" OFFSET ")
            .push_bind(self.offset());
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(value: &Option<String>) -> Option<f64> {
    non_empty(value)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_positive(value: &Option<String>) -> Option<i64> {
    parse_number(value)
        .map(f64::trunc)
        .filter(|v| *v >= 1.0)
        .map(|v| v as i64)
}

/// `%text%` with LIKE metacharacters escaped so they match literally.
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
