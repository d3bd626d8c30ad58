pub mod record;
pub mod species;
pub mod stats;
pub mod type_chart;
