// db/analyticsdb.rs
use async_trait::async_trait;

use super::db::DBClient;

use crate::models::{
    propertymodel::PropertyStatus,
    reportmodel::{CityRevenue, GroupCount},
    usermodel::UserRole,
};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PropertyCountFilter {
    pub active_only: bool,
    pub status: Option<PropertyStatus>,
    pub featured_only: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct UserCountFilter {
    pub active_only: bool,
    pub role: Option<UserRole>,
}

/// Read-only aggregates over listings and users. Every call hits the store,
/// nothing is cached.
#[async_trait]
pub trait AnalyticsExt {
    async fn count_properties(
        &self,
        filter: PropertyCountFilter,
    ) -> Result<i64, sqlx::Error>;

    /// Mean price over active listings, 0 when there are none.
    async fn average_active_price(&self) -> Result<f64, sqlx::Error>;

    async fn count_properties_by_type(
        &self,
        active_only: bool,
    ) -> Result<Vec<GroupCount>, sqlx::Error>;

    async fn count_properties_by_status(&self) -> Result<Vec<GroupCount>, sqlx::Error>;

    async fn sum_price_by_status(
        &self,
        status: PropertyStatus,
    ) -> Result<f64, sqlx::Error>;

    /// Listings grouped by exact city, largest price sum first.
    async fn revenue_by_city(
        &self,
        limit: i64,
    ) -> Result<Vec<CityRevenue>, sqlx::Error>;

    async fn count_users(
        &self,
        filter: UserCountFilter,
    ) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl AnalyticsExt for DBClient {
    async fn count_properties(
        &self,
        filter: PropertyCountFilter,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM properties
            WHERE ($1 = FALSE OR is_active = TRUE)
            AND ($2::property_status IS NULL OR status = $2)
            AND ($3 = FALSE OR featured = TRUE)
            "#,
        )
        .bind(filter.active_only)
        .bind(filter.status)
        .bind(filter.featured_only)
        .fetch_one(&self.pool)
        .await
    }

    async fn average_active_price(&self) -> Result<f64, sqlx::Error> {
        let average = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(AVG(price), 0)::float8 FROM properties WHERE is_active = TRUE",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(if average.is_finite() { average } else { 0.0 })
    }

    async fn count_properties_by_type(
        &self,
        active_only: bool,
    ) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            r#"
            SELECT property_type::text AS key, COUNT(*) AS count
            FROM properties
            WHERE ($1 = FALSE OR is_active = TRUE)
            GROUP BY property_type
            ORDER BY count DESC, key
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_properties_by_status(&self) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            r#"
            SELECT status::text AS key, COUNT(*) AS count
            FROM properties
            GROUP BY status
            ORDER BY count DESC, key
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn sum_price_by_status(
        &self,
        status: PropertyStatus,
    ) -> Result<f64, sqlx::Error> {
        sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(price), 0)::float8 FROM properties WHERE status = $1",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn revenue_by_city(
        &self,
        limit: i64,
    ) -> Result<Vec<CityRevenue>, sqlx::Error> {
        sqlx::query_as::<_, CityRevenue>(
            r#"
            SELECT city, SUM(price)::float8 AS total, COUNT(*) AS count
            FROM properties
            GROUP BY city
            ORDER BY total DESC, city
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_users(
        &self,
        filter: UserCountFilter,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE ($1 = FALSE OR is_active = TRUE)
            AND ($2::user_role IS NULL OR role = $2)
            "#,
        )
        .bind(filter.active_only)
        .bind(filter.role)
        .fetch_one(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    use crate::db::fixtures::{insert_listing, insert_user, listing};

    #[sqlx::test(migrations = "./migrations")]
    async fn test_empty_store_aggregates(pool: PgPool) -> anyhow::Result<()> {
        let db_client = DBClient::new(pool);

        assert_eq!(db_client.count_properties(PropertyCountFilter::default()).await?, 0);
        assert_eq!(db_client.average_active_price().await?, 0.0);
        assert!(db_client.count_properties_by_type(true).await?.is_empty());
        assert_eq!(db_client.sum_price_by_status(PropertyStatus::Sold).await?, 0.0);
        assert!(db_client.revenue_by_city(10).await?.is_empty());

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_listing_counts_and_average(pool: PgPool) -> anyhow::Result<()> {
        let db_client = DBClient::new(pool);
        let agent = insert_user(&db_client, "Agent", UserRole::Admin, true).await?;

        insert_listing(&db_client, agent.id, listing("A", "Pune", 100.0)).await?;
        let mut featured = listing("B", "Pune", 300.0);
        featured.featured = Some(true);
        featured.status = Some(PropertyStatus::ForRent);
        insert_listing(&db_client, agent.id, featured).await?;
        let mut sold = listing("C", "Mumbai", 1_000.0);
        sold.status = Some(PropertyStatus::Sold);
        sold.is_active = Some(false);
        insert_listing(&db_client, agent.id, sold).await?;

        let active = PropertyCountFilter { active_only: true, ..Default::default() };
        assert_eq!(db_client.count_properties(active).await?, 2);
        assert_eq!(db_client.count_properties(PropertyCountFilter::default()).await?, 3);
        assert_eq!(
            db_client
                .count_properties(PropertyCountFilter {
                    status: Some(PropertyStatus::ForRent),
                    ..active
                })
                .await?,
            1
        );
        assert_eq!(
            db_client
                .count_properties(PropertyCountFilter { featured_only: true, ..active })
                .await?,
            1
        );
        assert_eq!(
            db_client
                .count_properties(PropertyCountFilter {
                    status: Some(PropertyStatus::Sold),
                    ..active
                })
                .await?,
            0
        );

        assert_eq!(db_client.average_active_price().await?, 200.0);
        assert_eq!(db_client.sum_price_by_status(PropertyStatus::Sold).await?, 1_000.0);

        let by_type = db_client.count_properties_by_type(true).await?;
        assert_eq!(by_type, vec![GroupCount { key: "house".to_string(), count: 2 }]);

        let by_status = db_client.count_properties_by_status().await?;
        assert_eq!(by_status.len(), 3);
        assert!(by_status.iter().all(|group| group.count == 1));

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_revenue_by_city_top_ten(pool: PgPool) -> anyhow::Result<()> {
        let db_client = DBClient::new(pool);
        let agent = insert_user(&db_client, "Agent", UserRole::Admin, true).await?;

        for i in 0..12 {
            let city = format!("City {:02}", i);
            insert_listing(&db_client, agent.id, listing("Plot", &city, 1_000.0 * (i + 1) as f64))
                .await?;
        }
        let mut inactive = listing("Closed plot", "City 00", 50_000.0);
        inactive.is_active = Some(false);
        insert_listing(&db_client, agent.id, inactive).await?;

        let revenue = db_client.revenue_by_city(10).await?;

        assert_eq!(revenue.len(), 10);
        assert!(revenue.windows(2).all(|pair| pair[0].total > pair[1].total));
        assert_eq!(
            revenue[0],
            CityRevenue { city: "City 00".to_string(), total: 51_000.0, count: 2 }
        );
        assert_eq!(revenue[1].city, "City 11");
        assert!(revenue.iter().all(|entry| entry.city != "City 01"));

        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_count_users(pool: PgPool) -> anyhow::Result<()> {
        let db_client = DBClient::new(pool);

        insert_user(&db_client, "Admin", UserRole::Admin, true).await?;
        insert_user(&db_client, "Asha", UserRole::User, true).await?;
        insert_user(&db_client, "Ravi", UserRole::User, true).await?;
        insert_user(&db_client, "Meera", UserRole::User, true).await?;
        insert_user(&db_client, "Dormant", UserRole::User, false).await?;

        assert_eq!(db_client.count_users(UserCountFilter::default()).await?, 5);
        assert_eq!(
            db_client
                .count_users(UserCountFilter { active_only: true, ..Default::default() })
                .await?,
            4
        );
        assert_eq!(
            db_client
                .count_users(UserCountFilter { role: Some(UserRole::Admin), ..Default::default() })
                .await?,
            1
        );

        Ok(())
    }
}
