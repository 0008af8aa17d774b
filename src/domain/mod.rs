pub mod dashboard;
pub mod field_list;
pub mod form;
pub mod presets;
pub mod problem_type;
pub mod store;
pub mod transport;
