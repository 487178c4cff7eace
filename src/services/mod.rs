pub mod dashboard;
pub mod estimation;
pub mod project_store;
pub mod report_service;
pub mod storage;
