use anyhow::anyhow;
use regex::Regex;

const HOUR_GRID_FALLBACK: &str = "hour_grid";

/// `{event}_countdown.pdf` with every non-alphanumeric replaced by `_`.
pub fn countdown_filename(event_name: &str) -> anyhow::Result<String> {
    let re = Regex::new(r"[^a-zA-Z0-9]")
        .map_err(|e| anyhow!("internal regex compile failure: {e}"))?;
    Ok(format!("{}_countdown.pdf", re.replace_all(event_name, "_")))
}

/// Derives the hour grid file name from its heading when none was given.
pub fn hour_grid_filename(heading: &str) -> anyhow::Result<String> {
    let re =
        Regex::new(r"[^\w\-]").map_err(|e| anyhow!("internal regex compile failure: {e}"))?;

    let underscored = heading.replace(' ', "_");
    let safe = re.replace_all(&underscored, "");
    let stem = if safe.chars().all(|c| c == '_' || c == '-') {
        HOUR_GRID_FALLBACK
    } else {
        safe.as_ref()
    };

    Ok(format!("{stem}.pdf"))
}

#[cfg(test)]
mod tests {
    use super::{countdown_filename, hour_grid_filename};

    #[test]
    fn countdown_replaces_each_symbol() {
        assert_eq!(
            countdown_filename("NeurIPS 2025!").expect("name"),
            "NeurIPS_2025__countdown.pdf"
        );
        assert_eq!(
            countdown_filename("AAAI").expect("name"),
            "AAAI_countdown.pdf"
        );
    }

    #[test]
    fn heading_strips_punctuation() {
        assert_eq!(
            hour_grid_filename("My Heading!").expect("name"),
            "My_Heading.pdf"
        );
        assert_eq!(
            hour_grid_filename("deep-work: week 3").expect("name"),
            "deep-work_week_3.pdf"
        );
    }

    #[test]
    fn heading_falls_back_when_nothing_survives() {
        for heading in ["", "!!!", "  ", "- _ -"] {
            assert_eq!(
                hour_grid_filename(heading).expect("name"),
                "hour_grid.pdf",
                "{heading:?}"
            );
        }
    }
}
