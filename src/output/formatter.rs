use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::finance::{Payback, Projection};
use crate::ranking::RankedCandidate;
use crate::scoring::Classification;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with one decimal, e.g. "82.5"
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Format a confidence column cell: "c95" or "-" when untracked
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(c) => format!("c{:.0}", c),
        None => "-".to_string(),
    }
}

/// Format a payback period, "14.2 mo" or "never"
pub fn format_months(months: f64) -> String {
    if months.is_infinite() {
        "never".to_string()
    } else {
        format!("{:.1} mo", months)
    }
}

fn colorize_classification(label: &str, classification: Classification) -> String {
    if classification.is_favorable() {
        label.green().to_string()
    } else if classification == Classification::Evaluate {
        label.yellow().to_string()
    } else {
        label.red().to_string()
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked candidates as a table: Index, Score, Confidence,
/// Classification, Name, Id. No headers (minimal format).
/// Index column: 3 chars (fits "99."), right-aligned.
pub fn format_ranked_table(ranked: &[RankedCandidate], use_colors: bool) -> String {
    if ranked.is_empty() {
        return "No candidate locations found.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let score_width = 5;
    let confidence_width = 4;
    let class_width = 10;
    let separator = "  ";

    ranked
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>width$}", format_score(entry.result.score), width = score_width);
            let conf_str = format!(
                "{:>width$}",
                format_confidence(entry.result.confidence),
                width = confidence_width
            );
            let class_padded = format!(
                "{:<width$}",
                entry.result.classification.label(),
                width = class_width
            );

            let id = entry.candidate.id.as_str();
            let fixed_width = index_width
                + 1
                + score_width
                + confidence_width
                + class_width
                + separator.len() * 4
                + id.len();

            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(entry.candidate.display_name(), width - fixed_width)
                } else {
                    truncate_name(entry.candidate.display_name(), 20)
                }
            } else {
                entry.candidate.display_name().to_string()
            };

            if use_colors {
                // Pad before coloring so the escape codes don't skew widths
                let class_colored =
                    colorize_classification(&class_padded, entry.result.classification);
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    conf_str,
                    separator,
                    class_colored,
                    separator,
                    name,
                    separator,
                    id.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str, score_str, separator, conf_str, separator, class_padded, separator,
                    name, separator, id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one candidate with detailed multi-line output (for verbose mode
/// and the inspect command)
pub fn format_candidate_detail(entry: &RankedCandidate, use_colors: bool) -> String {
    let candidate = &entry.candidate;
    let result = &entry.result;

    let mut lines = Vec::new();
    if use_colors {
        lines.push(format!(
            "{} ({})",
            candidate.display_name().bold(),
            candidate.id.dimmed()
        ));
    } else {
        lines.push(format!("{} ({})", candidate.display_name(), candidate.id));
    }

    let class_str = if use_colors {
        colorize_classification(result.classification.label(), result.classification)
    } else {
        result.classification.label().to_string()
    };
    match result.confidence {
        Some(confidence) => lines.push(format!(
            "  Score: {} ({})  Confidence: {:.0}%  Strategy: {}",
            format_score(result.score),
            class_str,
            confidence,
            result.strategy
        )),
        None => lines.push(format!(
            "  Score: {} ({})  Strategy: {}",
            format_score(result.score),
            class_str,
            result.strategy
        )),
    }

    lines.push("  Factors:".to_string());
    for factor in &result.factors {
        let sign = if factor.is_positive { "+" } else { "-" };
        lines.push(format!(
            "    {} {:<20} {:>5.1}/{:<5.1} (c{:.0}) {}",
            sign,
            factor.factor.label(),
            factor.points,
            factor.max_points,
            factor.confidence,
            factor.rationale
        ));
    }

    for alert in &result.alerts {
        if use_colors {
            lines.push(format!("  ! {}", alert.yellow()));
        } else {
            lines.push(format!("  ! {}", alert));
        }
    }

    lines.push(format!("  Recommendation: {}", result.recommendation));
    lines.join("\n")
}

/// Format a P&L projection with its payback verdict
pub fn format_projection(projection: &Projection, payback: &Payback, use_colors: bool) -> String {
    let mut lines = Vec::new();
    lines.push("  Projection (monthly):".to_string());
    lines.push(format!("    Sales:            {:>12.0}", projection.monthly_sales));
    lines.push(format!("    COGS:             {:>12.0}", projection.cogs));
    lines.push(format!("    Labor:            {:>12.0}", projection.labor));
    lines.push(format!("    Variable costs:   {:>12.0}", projection.variable_costs));
    lines.push(format!(
        "    Fixed costs:      {:>12.0}  (incl. rent {:.0})",
        projection.fixed_costs, projection.monthly_rent
    ));
    lines.push(format!("    Franchise fees:   {:>12.0}", projection.franchise_fees));
    lines.push(format!("    Gross profit:     {:>12.0}", projection.gross_profit));
    lines.push(format!("    Operating profit: {:>12.0}", projection.operating_profit));
    lines.push(format!(
        "    Net profit:       {:>12.0}  ({:.1}% margin)",
        projection.net_profit,
        projection.net_margin * 100.0
    ));

    let verdict = if projection.viable {
        let text = format!(
            "viable, payback {} ({})",
            format_months(payback.months),
            payback.tier.label()
        );
        if use_colors {
            text.green().to_string()
        } else {
            text
        }
    } else {
        let reason = projection
            .rejection
            .as_deref()
            .unwrap_or("not viable");
        let text = format!("not viable: {}", reason);
        if use_colors {
            text.red().to_string()
        } else {
            text
        }
    };
    lines.push(format!("    Verdict: {}", verdict));
    lines.join("\n")
}

/// Format ranked candidates as tab-separated values for scripting
/// Columns: score, confidence, classification, id, name (no headers, no colors)
pub fn format_tsv(ranked: &[RankedCandidate]) -> String {
    if ranked.is_empty() {
        return String::new();
    }

    ranked
        .iter()
        .map(|entry| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                format_score(entry.result.score),
                format_confidence(entry.result.confidence),
                entry.result.classification.label(),
                entry.candidate.id,
                entry.candidate.display_name()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::finance::{payback, project_pl, CostStructure};
    use crate::locations::{CandidateLocation, ConfidenceDatum, NseTier};
    use crate::scoring::{strategy_for, StrategyKind};

    fn sample_entry() -> RankedCandidate {
        let candidate = CandidateLocation {
            id: "polanco-01".to_string(),
            name: "Av. Presidente Masaryk 111".to_string(),
            lat: 19.4326,
            lon: -99.1332,
            nse: ConfidenceDatum::new(NseTier::A, 95.0, "government-census"),
            foot_traffic: ConfidenceDatum::new(85.0, 90.0, "betime"),
            own_brand_distance_km: 9.0,
            competitor_distance_km: 3.0,
            competitors_within_radius: 0,
            monthly_rent: None,
            rating: None,
            review_count: None,
        };
        let config = Config::default();
        let result = strategy_for(StrategyKind::Budgeted).evaluate(&candidate, &config);
        RankedCandidate { candidate, result }
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(82.5), "82.5");
        assert_eq!(format_score(100.0), "100.0");
        assert_eq!(format_score(0.0), "0.0");
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(Some(95.3)), "c95");
        assert_eq!(format_confidence(None), "-");
    }

    #[test]
    fn test_format_months() {
        assert_eq!(format_months(14.25), "14.2 mo");
        assert_eq!(format_months(f64::INFINITY), "never");
    }

    #[test]
    fn test_format_ranked_table_empty() {
        let result = format_ranked_table(&[], false);
        assert_eq!(result, "No candidate locations found.");
    }

    #[test]
    fn test_format_ranked_table_single() {
        let entries = vec![sample_entry()];
        let result = format_ranked_table(&entries, false);
        assert!(result.contains(" 1."));
        assert!(result.contains("80.0"));
        assert!(result.contains("EXCELLENT"));
        assert!(result.contains("polanco-01"));
    }

    #[test]
    fn test_format_candidate_detail() {
        let entry = sample_entry();
        let result = format_candidate_detail(&entry, false);
        assert!(result.contains("Av. Presidente Masaryk 111"));
        assert!(result.contains("Score: 80.0"));
        assert!(result.contains("NSE"));
        assert!(result.contains("Foot traffic"));
        assert!(result.contains("Recommendation:"));
        // The two skipped optional factors surface as alerts
        assert!(result.contains("! Rent burden"));
        assert!(result.contains("! Rating"));
    }

    #[test]
    fn test_format_projection_viable() {
        let costs = CostStructure::default();
        let projection = project_pl(800_000.0, 80_000.0, &costs);
        let pb = payback(900_000.0, projection.net_profit);
        let result = format_projection(&projection, &pb, false);
        assert!(result.contains("Sales:"));
        assert!(result.contains("viable, payback"));
    }

    #[test]
    fn test_format_projection_rejected() {
        let costs = CostStructure::default();
        let projection = project_pl(800_000.0, 200_000.0, &costs);
        let pb = payback(900_000.0, projection.net_profit);
        let result = format_projection(&projection, &pb, false);
        assert!(result.contains("not viable:"));
    }

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Short name", 20), "Short name");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(
            truncate_name("A very long location name here", 15),
            "A very long ..."
        );
    }

    #[test]
    fn test_truncate_name_very_narrow() {
        assert_eq!(truncate_name("Hello world", 3), "Hel");
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_format_tsv_single() {
        let entries = vec![sample_entry()];
        let result = format_tsv(&entries);
        let fields: Vec<&str> = result.split('\t').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], "80.0");
        assert_eq!(fields[2], "EXCELLENT");
        assert_eq!(fields[3], "polanco-01");
    }
}
