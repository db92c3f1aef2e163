pub mod demand_badge;
pub mod kpi_card;
pub mod summary_card;
pub mod toast;
pub mod trend_chart;
