//! Agent identity derivation.
//!
//! The agent identifier names the history file, so it decides which past
//! conversation a session resumes. Daily rollover stamps the current date
//! into the identifier; pinned identity keeps one transcript forever.

use chrono::NaiveDate;

use dc_domain::config::Rollover;

/// Derive the agent identifier for today.
pub fn derive_agent_id(name: &str, rollover: Rollover) -> String {
    derive_agent_id_on(name, rollover, chrono::Local::now().date_naive())
}

/// Date-explicit variant so rollover behavior is testable.
pub fn derive_agent_id_on(name: &str, rollover: Rollover, date: NaiveDate) -> String {
    let slug = slugify(name);
    match rollover {
        Rollover::Daily => format!("agent_{}_{}", slug, date.format("%Y%m%d")),
        Rollover::Pinned => format!("agent_{slug}"),
    }
}

/// Keep the identifier filesystem-safe: alphanumerics pass through,
/// everything else becomes an underscore.
fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_id_carries_the_date() {
        let id = derive_agent_id_on("Tutor", Rollover::Daily, date(2026, 8, 29));
        assert_eq!(id, "agent_Tutor_20260829");
    }

    #[test]
    fn daily_ids_differ_across_days() {
        let a = derive_agent_id_on("Tutor", Rollover::Daily, date(2026, 8, 29));
        let b = derive_agent_id_on("Tutor", Rollover::Daily, date(2026, 8, 30));
        assert_ne!(a, b);
    }

    #[test]
    fn pinned_id_ignores_the_date() {
        let a = derive_agent_id_on("Tutor", Rollover::Pinned, date(2026, 8, 29));
        let b = derive_agent_id_on("Tutor", Rollover::Pinned, date(2027, 1, 1));
        assert_eq!(a, "agent_Tutor");
        assert_eq!(a, b);
    }

    #[test]
    fn names_are_slugged_for_the_filesystem() {
        let id = derive_agent_id_on("Ms. Ada/2", Rollover::Pinned, date(2026, 8, 29));
        assert_eq!(id, "agent_Ms__Ada_2");
    }
}
