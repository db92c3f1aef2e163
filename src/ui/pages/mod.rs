pub mod dashboard;
pub mod query_form;

pub use dashboard::DashboardPage;
pub use query_form::QueryFormPage;
