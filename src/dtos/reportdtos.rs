use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::models::reportmodel::{CityRevenue, GroupCount, ReportType};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateReportDto {
    #[validate(length(min = 1, max = 200, message = "Report title is required"))]
    pub title: String,

    #[serde(rename = "type", default)]
    pub report_type: ReportType,

    pub description: Option<String>,

    /// Stored with the report as-is. Not applied to the aggregation.
    pub filters: Option<JsonValue>,
}

/// Live figures for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsDto {
    pub total: i64,
    pub for_sale: i64,
    pub for_rent: i64,
    pub sold: i64,
    pub featured: i64,
    pub avg_price: f64,
    pub by_type: Vec<GroupCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportData {
    pub sold: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReportData {
    pub by_type: Vec<GroupCount>,
    pub by_status: Vec<GroupCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserActivityReportData {
    pub total_users: i64,
    pub active_users: i64,
    pub admins: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReportData {
    pub by_city: Vec<CityRevenue>,
}
