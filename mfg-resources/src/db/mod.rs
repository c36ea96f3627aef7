//! Tenant-scoped resources queries

pub mod locations;
pub mod maintenance_dispatches;
pub mod trainings;
pub mod work_centers;
