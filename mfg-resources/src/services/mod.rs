//! Resources orchestration and status rules

pub mod locations;
pub mod maintenance_dispatches;
pub mod trainings;
pub mod work_centers;

/// Permission module for every resources grant
pub(crate) const MODULE: &str = "resources";

pub use locations::{create_employee, create_location};
pub use maintenance_dispatches::{
    create_maintenance_dispatch, get_maintenance_dispatch, update_maintenance_dispatch,
    update_maintenance_dispatch_status,
};
pub use trainings::{
    assign_training, get_training, record_training_completion, training_assignment_status, upsert_training,
    TrainingCreate, TrainingUpdate,
};
pub use work_centers::{deactivate_work_center, get_work_center, upsert_work_center, WorkCenterCreate, WorkCenterUpdate};
