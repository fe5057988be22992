pub mod crm_export;
pub mod prospecting;
