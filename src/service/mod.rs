pub mod error;
pub mod property_query;
pub mod property_service;
pub mod report_service;
pub mod seed;
