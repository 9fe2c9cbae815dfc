pub mod formatter;

pub use formatter::{
    format_age, format_dashboard, format_run_stats, format_tsv, should_use_colors,
};
