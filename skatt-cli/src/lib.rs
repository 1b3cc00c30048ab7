pub mod app;
pub mod cli;
pub mod csv_loader;
pub mod logging;
pub mod plan_file;
pub mod report;
pub mod utils;
