use crate::config::{EntryCode, ScoutConfig};
use crate::logbook::FIELD_DELIMITER;
use std::fmt;

/// Occurrence counts over the full category x outcome grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequencies {
    outcomes: usize,
    counts: Vec<u64>,
    totals: Vec<u64>,
}

impl Frequencies {
    pub fn zeroed(config: &ScoutConfig) -> Self {
        Self {
            outcomes: config.outcome_count(),
            counts: vec![0; config.code_len()],
            totals: vec![0; config.categories.len()],
        }
    }

    pub fn count(&self, entry: EntryCode) -> u64 {
        self.counts[entry.category * self.outcomes + entry.outcome]
    }

    pub fn total(&self, category: usize) -> u64 {
        self.totals[category]
    }

    pub fn grand_total(&self) -> u64 {
        self.totals.iter().sum()
    }

    /// Counts in grid order, matching [`ScoutConfig::entry_codes`].
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn totals(&self) -> &[u64] {
        &self.totals
    }

    fn bump(&mut self, entry: EntryCode) {
        let slot = &mut self.counts[entry.category * self.outcomes + entry.outcome];
        *slot = slot.saturating_add(1);
    }
}

/// Weighted 0-10 style score held in hundredths so rounding stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Hundredths(i64),
    NotAvailable,
}

impl Score {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Hundredths(value) => Some(value as f64 / 100.0),
            Self::NotAvailable => None,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Hundredths(value) => {
                let sign = if value < 0 { "-" } else { "" };
                let abs = value.unsigned_abs();
                write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
            }
            Self::NotAvailable => f.write_str("N/D"),
        }
    }
}

pub fn compute_frequencies(config: &ScoutConfig, text: &str) -> Frequencies {
    let mut frequencies = Frequencies::zeroed(config);

    for line in text.split('\n').filter(|line| !line.trim().is_empty()) {
        let Some(field) = line.split(FIELD_DELIMITER).nth(1) else {
            continue;
        };
        if let Some(entry) = config.parse_entry(field) {
            frequencies.bump(entry);
        }
    }

    for category in 0..config.categories.len() {
        let total: u64 = (0..config.outcome_count())
            .map(|outcome| frequencies.count(EntryCode { category, outcome }))
            .sum();
        frequencies.totals[category] = total;
    }

    frequencies
}

pub fn compute_score(config: &ScoutConfig, category: usize, frequencies: &Frequencies) -> Score {
    let mut total: i128 = 0;
    let mut weighted: i128 = 0;
    for (outcome, spec) in config.outcomes.iter().enumerate() {
        let count = i128::from(frequencies.count(EntryCode { category, outcome }));
        total += count;
        weighted += count * i128::from(spec.weight);
    }

    if total == 0 {
        return Score::NotAvailable;
    }

    let hundredths = round_half_away(weighted * 100, total);
    Score::Hundredths(hundredths.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
}

pub fn compute_percentage(value: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    let percent = round_half_away(i128::from(value) * 100, i128::from(total));
    format!("{percent}%")
}

/// `numerator / denominator` rounded to the nearest integer, ties away from zero.
fn round_half_away(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0);
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator {
        quotient + numerator.signum()
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "1/3/2026 10:00:00;A+\n1/3/2026 10:00:05;A-\n1/3/2026 10:00:09;B=\n";

    fn entry(config: &ScoutConfig, code: &str) -> EntryCode {
        config.parse_entry(code).unwrap()
    }

    #[test]
    fn scenario_counts_totals_and_scores() {
        let config = ScoutConfig::default();
        let freq = compute_frequencies(&config, SCENARIO);

        assert_eq!(freq.count(entry(&config, "A+")), 1);
        assert_eq!(freq.count(entry(&config, "A-")), 1);
        assert_eq!(freq.count(entry(&config, "B=")), 1);
        assert_eq!(freq.counts().iter().sum::<u64>(), 3);
        assert_eq!(freq.totals(), [2, 1, 0, 0]);
        assert_eq!(freq.grand_total(), 3);

        assert_eq!(compute_score(&config, 0, &freq).to_string(), "5.00");
        assert_eq!(compute_score(&config, 1, &freq).to_string(), "5.00");
        assert_eq!(compute_score(&config, 2, &freq), Score::NotAvailable);
        assert_eq!(compute_score(&config, 2, &freq).to_string(), "N/D");
    }

    #[test]
    fn empty_text_keeps_full_zeroed_domain() {
        let config = ScoutConfig::default();
        let freq = compute_frequencies(&config, "");
        assert_eq!(freq.counts().len(), 12);
        assert!(freq.counts().iter().all(|&count| count == 0));
        assert_eq!(freq.grand_total(), 0);
    }

    #[test]
    fn appending_a_code_bumps_only_that_count() {
        let config = ScoutConfig::default();
        let before = compute_frequencies(&config, SCENARIO);

        for (code, name) in config.entry_codes() {
            let text = format!("{SCENARIO}2/3/2026 08:00:00;{name}\n");
            let after = compute_frequencies(&config, &text);
            for (other, _) in config.entry_codes() {
                let expected = before.count(other) + u64::from(other == code);
                assert_eq!(after.count(other), expected, "appending {name}");
            }
        }
    }

    #[test]
    fn malformed_lines_are_ignored() {
        let config = ScoutConfig::default();
        let clean = compute_frequencies(&config, "1/3/2026 10:00:00;V+\n");
        let noisy = compute_frequencies(
            &config,
            "1/3/2026 10:00:00;V+\nno delimiter here\n;\nx;Z+\nx; P= \r\n\n",
        );
        let p_equal = entry(&config, "P=");
        assert_eq!(noisy.count(p_equal), 1);

        let only_noise = compute_frequencies(&config, "1/3/2026 10:00:00;V+\nno delimiter here\n");
        assert_eq!(only_noise, clean);
    }

    #[test]
    fn legacy_space_before_delimiter_still_counts() {
        let config = ScoutConfig::default();
        let freq = compute_frequencies(&config, "7/3/2026, 09:05:03 ;A=\n");
        assert_eq!(freq.count(entry(&config, "A=")), 1);
    }

    #[test]
    fn frequencies_are_idempotent() {
        let config = ScoutConfig::default();
        assert_eq!(
            compute_frequencies(&config, SCENARIO),
            compute_frequencies(&config, SCENARIO)
        );
    }

    #[test]
    fn score_stays_within_weight_bounds() {
        let config = ScoutConfig::default();
        let (min, max) = config.weight_bounds();
        let text = "a;A+\nb;A+\nc;A=\nd;A-\ne;B-\nf;V+\n";
        let freq = compute_frequencies(&config, text);
        for category in 0..config.categories.len() {
            match compute_score(&config, category, &freq) {
                Score::Hundredths(value) => {
                    assert!(value >= min * 100 && value <= max * 100);
                    assert!(freq.total(category) > 0);
                }
                Score::NotAvailable => assert_eq!(freq.total(category), 0),
            }
        }
        // (10 + 10 + 5 + 0) / 4
        assert_eq!(compute_score(&config, 0, &freq).to_string(), "6.25");
        assert_eq!(compute_score(&config, 0, &freq).as_f64(), Some(6.25));
    }

    #[test]
    fn score_rounds_half_away_from_zero() {
        let config = ScoutConfig::default();
        // 20 / 3 = 6.666..
        let freq = compute_frequencies(&config, "a;B+\nb;B+\nc;B-\n");
        assert_eq!(compute_score(&config, 1, &freq).to_string(), "6.67");

        let mut config = ScoutConfig::default();
        config.outcomes[2].weight = -1;
        // (-1 + 4 * 5) / 5
        let text = "a;A-\nb;A=\nc;A=\nd;A=\ne;A=\n";
        let freq = compute_frequencies(&config, text);
        assert_eq!(compute_score(&config, 0, &freq).to_string(), "3.80");
        assert_eq!(round_half_away(-125, 1000), 0);
        assert_eq!(round_half_away(-1, 8), 0);
        assert_eq!(round_half_away(-5, 10), -1);
        assert_eq!(Score::Hundredths(-13).to_string(), "-0.13");
    }

    #[test]
    fn percentage_rounding() {
        assert_eq!(compute_percentage(0, 0), "0%");
        assert_eq!(compute_percentage(5, 0), "0%");
        assert_eq!(compute_percentage(1, 3), "33%");
        assert_eq!(compute_percentage(2, 3), "67%");
        assert_eq!(compute_percentage(1, 8), "13%");
        assert_eq!(compute_percentage(12, 33), "36%");
        assert_eq!(compute_percentage(4, 4), "100%");
    }
}
