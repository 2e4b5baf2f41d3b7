// service/report_service.rs
use std::sync::Arc;

use serde_json::{json, Value as JsonValue};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        analyticsdb::{AnalyticsExt, PropertyCountFilter, UserCountFilter},
        db::DBClient,
        reportdb::{NewReport, ReportExt},
    },
    dtos::reportdtos::{
        DashboardStatsDto, GenerateReportDto, InventoryReportData, RevenueReportData,
        SalesReportData, UserActivityReportData,
    },
    models::{
        propertymodel::PropertyStatus,
        reportmodel::{Report, ReportType, ReportWithAuthor},
        usermodel::UserRole,
    },
    service::error::ServiceError,
};

pub const REVENUE_TOP_CITIES: i64 = 10;

#[derive(Debug, Clone)]
pub struct ReportService<S = DBClient> {
    db_client: Arc<S>,
}

impl<S> ReportService<S>
where
    S: AnalyticsExt + ReportExt + Send + Sync,
{
    pub fn new(db_client: Arc<S>) -> Self {
        Self { db_client }
    }

    /// Live listing figures for the admin dashboard.
    pub async fn dashboard_stats(&self) -> Result<DashboardStatsDto, ServiceError> {
        let active = |status: Option<PropertyStatus>| PropertyCountFilter {
            active_only: true,
            status,
            featured_only: false,
        };

        let (total, for_sale, for_rent, sold, featured, avg_price, by_type) = tokio::try_join!(
            self.db_client.count_properties(active(None)),
            self.db_client.count_properties(active(Some(PropertyStatus::ForSale))),
            self.db_client.count_properties(active(Some(PropertyStatus::ForRent))),
            self.db_client.count_properties(active(Some(PropertyStatus::Sold))),
            self.db_client.count_properties(PropertyCountFilter {
                featured_only: true,
                ..active(None)
            }),
            self.db_client.average_active_price(),
            self.db_client.count_properties_by_type(true),
        )?;

        Ok(DashboardStatsDto {
            total,
            for_sale,
            for_rent,
            sold,
            featured,
            avg_price,
            by_type,
        })
    }

    /// Runs the aggregation for the requested type and stores the result.
    pub async fn generate_report(
        &self,
        generated_by: Uuid,
        request: GenerateReportDto,
    ) -> Result<Report, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let data = self.report_data(request.report_type).await?;

        let report = self
            .db_client
            .create_report(NewReport {
                title: request.title,
                report_type: request.report_type,
                description: request.description,
                data,
                filters: request.filters,
                generated_by,
            })
            .await?;

        tracing::info!(
            "Report {} ({:?}) generated by {}",
            report.id,
            report.report_type,
            generated_by
        );
        Ok(report)
    }

    async fn report_data(&self, report_type: ReportType) -> Result<JsonValue, ServiceError> {
        let data = match report_type {
            ReportType::Sales => {
                let (sold, total_revenue) = tokio::try_join!(
                    self.db_client.count_properties(PropertyCountFilter {
                        status: Some(PropertyStatus::Sold),
                        ..Default::default()
                    }),
                    self.db_client.sum_price_by_status(PropertyStatus::Sold),
                )?;
                serde_json::to_value(SalesReportData { sold, total_revenue })?
            }
            ReportType::Inventory => {
                let (by_type, by_status) = tokio::try_join!(
                    self.db_client.count_properties_by_type(false),
                    self.db_client.count_properties_by_status(),
                )?;
                serde_json::to_value(InventoryReportData { by_type, by_status })?
            }
            ReportType::UserActivity => {
                let (total_users, active_users, admins) = tokio::try_join!(
                    self.db_client.count_users(UserCountFilter::default()),
                    self.db_client.count_users(UserCountFilter {
                        active_only: true,
                        role: None,
                    }),
                    self.db_client.count_users(UserCountFilter {
                        active_only: false,
                        role: Some(UserRole::Admin),
                    }),
                )?;
                serde_json::to_value(UserActivityReportData {
                    total_users,
                    active_users,
                    admins,
                })?
            }
            ReportType::Revenue => {
                let by_city = self.db_client.revenue_by_city(REVENUE_TOP_CITIES).await?;
                serde_json::to_value(RevenueReportData { by_city })?
            }
            ReportType::Custom => json!({}),
        };

        Ok(data)
    }

    pub async fn list_reports(&self) -> Result<Vec<ReportWithAuthor>, ServiceError> {
        Ok(self.db_client.get_reports().await?)
    }

    pub async fn get_report(&self, report_id: Uuid) -> Result<ReportWithAuthor, ServiceError> {
        self.db_client
            .get_report(report_id)
            .await?
            .ok_or(ServiceError::ReportNotFound(report_id))
    }

    pub async fn delete_report(&self, report_id: Uuid) -> Result<(), ServiceError> {
        if !self.db_client.delete_report(report_id).await? {
            return Err(ServiceError::ReportNotFound(report_id));
        }
        Ok(())
    }
}
