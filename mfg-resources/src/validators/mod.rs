//! Form validators for the resources module

pub mod location;
pub mod maintenance_dispatch;
pub mod training;
pub mod work_center;

pub use location::{validate_employee, validate_location, EmployeeForm, LocationForm};
pub use maintenance_dispatch::{
    validate_maintenance_dispatch, validate_maintenance_dispatch_patch, MaintenanceDispatchForm,
    MaintenanceDispatchPatch,
};
pub use training::{
    validate_training, validate_training_assignment, validate_training_completion,
    TrainingCompletionForm, TrainingForm,
};
pub use work_center::{validate_work_center, WorkCenterForm};
