mod formatter;

pub use formatter::{
    format_candidate_detail, format_confidence, format_months, format_projection,
    format_ranked_table, format_score, format_tsv, should_use_colors,
};
