// Oldest Businesses - Core Library
// Exposes all modules for use in the CLI and tests

pub mod config;
pub mod entities;
pub mod loader;
pub mod pipeline;
pub mod export;
pub mod data_quality;
pub mod charts;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use entities::{
    Business, Category, Country, LookupTable,
    MissingCount, OldestBusiness, OldestByCategory,
};
pub use loader::{load_csv, Dataset};
pub use pipeline::{
    PipelineOutput, run,
    join_countries, join_categories_and_countries,
    oldest_business_per_continent, count_missing_per_continent, oldest_by_continent_category,
};
pub use export::{export_all, write_table, ExportedFile, ResultTable};
pub use data_quality::{DataQualityEngine, QualityIssue, QualityReport, Severity};
pub use charts::{Charts, Heatmap, LineChart, Palette, PieChart};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
