use serde::Serialize;

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::registry::SiteRegistry;
    use crate::report::SiteReport;
    use crate::types::site::NewSite;
    use chrono::NaiveDate;

    #[test]
    fn json_report_marks_pending_scores_explicitly() {
        let catalog = catalog::builtin("standard").expect("standard loads");
        let mut registry = SiteRegistry::new(&catalog);
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date");
        registry.add(NewSite::new("A", date)).expect("site adds");
        let site = registry.get("A").expect("site exists");

        let report = SiteReport::build(site, &catalog).expect("report builds");
        let rendered = to_json(&report).expect("json should serialize");
        assert!(rendered.contains("\"name\": \"A\""));
        assert!(rendered.contains("\"state\": \"pending\""));
        assert!(!rendered.contains("\"value\": 3"));
    }
}
