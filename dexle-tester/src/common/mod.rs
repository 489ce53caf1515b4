pub mod scenario;

use anyhow::{Context, Result};
use chrono::NaiveDate;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Resolve `--dates` tokens: `today`, `week` (seven days from `today`), or `YYYY-MM-DD`.
pub fn resolve_dates(tokens: &[String], today: NaiveDate) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::new();
    for token in tokens {
        match token.to_lowercase().as_str() {
            "today" => dates.push(today),
            "week" => dates.extend(today.iter_days().take(7)),
            other => dates.push(
                NaiveDate::parse_from_str(other, "%Y-%m-%d")
                    .with_context(|| format!("invalid date '{token}'"))?,
            ),
        }
    }
    dates.dedup();
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn dates_expand_keywords() {
        let tokens = split_csv("2026-10-01,today,week");
        let dates = resolve_dates(&tokens, day(18)).unwrap();
        assert_eq!(dates.len(), 8);
        assert_eq!(dates[0], day(1));
        assert_eq!(dates[1], day(18));
        assert_eq!(dates[7], day(24));
    }

    #[test]
    fn bad_dates_are_errors() {
        let err = resolve_dates(&["18/10/2026".to_string()], day(18)).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }
}
