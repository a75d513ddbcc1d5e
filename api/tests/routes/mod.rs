mod chart_test;
mod data_test;
mod export_test;
mod health_test;
