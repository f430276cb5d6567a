use crate::config::{EntryCode, ScoutConfig};
use crate::stats::{compute_frequencies, compute_percentage, compute_score};

pub const LOG_FILENAME: &str = "Scouting_Log.csv";
pub const SUMMARY_FILENAME: &str = "Scouting_Summary.csv";

pub const EMPTY_LOG_MESSAGE: &str = "Scouting empty.";
pub const EMPTY_SUMMARY_MESSAGE: &str = "Summary empty.";

/// Raw log export; `None` when there is nothing but whitespace to hand out.
pub fn export_log(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    Some(text.to_string())
}

/// Builds the `;`-separated per-category summary, or `None` when no entry was
/// ever logged.
pub fn build_summary(config: &ScoutConfig, text: &str) -> Result<Option<String>, csv::Error> {
    let frequencies = compute_frequencies(config, text);
    let grand_total = frequencies.grand_total();
    if grand_total == 0 {
        return Ok(None);
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    let mut header = vec![
        "Category".to_string(),
        "Score".to_string(),
        "#/Tot".to_string(),
        "% of tot".to_string(),
    ];
    header.extend(config.outcomes.iter().map(|o| format!("Detail {}", o.suffix)));
    writer.write_record(&header)?;

    for (category, spec) in config.categories.iter().enumerate() {
        let category_total = frequencies.total(category);
        let mut row = vec![
            spec.code.clone(),
            compute_score(config, category, &frequencies).to_string(),
            format!("{category_total}/{grand_total}"),
            compute_percentage(category_total, grand_total),
        ];
        row.extend(config.outcomes.iter().enumerate().map(|(outcome, o)| {
            let count = frequencies.count(EntryCode { category, outcome });
            format!(
                "({} {count} {})",
                o.suffix,
                compute_percentage(count, category_total)
            )
        }));
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_rows_follow_declaration_order() {
        let config = ScoutConfig::default();
        let text = "t;A+\nt;A-\nt;B=\n";
        let summary = build_summary(&config, text).unwrap().unwrap();
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(
            lines,
            [
                "Category;Score;#/Tot;% of tot;Detail +;Detail =;Detail -",
                "A;5.00;2/3;67%;(+ 1 50%);(= 0 0%);(- 1 50%)",
                "B;5.00;1/3;33%;(+ 0 0%);(= 1 100%);(- 0 0%)",
                "V;N/D;0/3;0%;(+ 0 0%);(= 0 0%);(- 0 0%)",
                "P;N/D;0/3;0%;(+ 0 0%);(= 0 0%);(- 0 0%)",
            ]
        );
        assert!(summary.ends_with('\n'));
    }

    #[test]
    fn summary_of_empty_log_is_refused() {
        let config = ScoutConfig::default();
        assert_eq!(build_summary(&config, "").unwrap(), None);
        assert_eq!(build_summary(&config, "junk\nx;Q+\n").unwrap(), None);
    }

    #[test]
    fn exported_log_reloads_to_same_frequencies() {
        let config = ScoutConfig::default();
        let text = "1/3/2026 10:00:00;P+\nbroken\n1/3/2026 10:01:00;V-\n";
        let exported = export_log(text).unwrap();
        assert_eq!(
            compute_frequencies(&config, &exported),
            compute_frequencies(&config, text)
        );
        assert_eq!(export_log("  \n"), None);
    }

    #[test]
    fn summary_cells_are_written_verbatim() {
        let mut config = ScoutConfig::default();
        config.categories.truncate(1);
        config.outcomes[1].suffix = "\"".into();
        let summary = build_summary(&config, "t;A\"\n").unwrap().unwrap();
        assert_eq!(
            summary.lines().nth(1),
            Some("A;5.00;1/1;100%;(+ 0 0%);(\" 1 100%);(- 0 0%)")
        );
        assert!(summary.starts_with("Category;Score;#/Tot;% of tot;Detail +;Detail \";Detail -\n"));
    }

    #[test]
    fn summary_follows_configured_outcomes() {
        let mut config = ScoutConfig::default();
        config.categories.truncate(1);
        config.outcomes.truncate(2);
        let summary = build_summary(&config, "t;A=\n").unwrap().unwrap();
        assert_eq!(
            summary,
            "Category;Score;#/Tot;% of tot;Detail +;Detail =\nA;5.00;1/1;100%;(+ 0 0%);(= 1 100%)\n"
        );
    }
}
