pub mod formatter;

pub use formatter::{
    format_catalog, format_category, format_history, format_json, format_progress,
    format_result, format_standings, format_tsv, should_use_colors,
};
