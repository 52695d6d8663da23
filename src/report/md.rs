use super::{format_total, SiteReport};
use crate::compare::RankedSite;
use crate::types::catalog::Catalog;
use crate::types::scoring::{total_scale, Score};

pub fn site_to_markdown(report: &SiteReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Site Report: {}\n\n", report.name));
    if report.disqualified {
        output.push_str("**Disqualified:** a gating criterion failed; all scores are set to the minimum.\n\n");
    }
    output.push_str(&format!(
        "Total score: {}\n\n",
        format_total(report.total, report.total_max)
    ));

    output.push_str("## Details\n\n");
    output.push_str(&format!("- date: {}\n", report.date));
    output.push_str(&format!(
        "- address: {}\n",
        report.address.as_deref().unwrap_or("unknown")
    ));
    match report.coordinates {
        Some(coordinates) => output.push_str(&format!("- coordinates: {coordinates}\n")),
        None => output.push_str("- coordinates: not set\n"),
    }
    if let Some(area) = report.area {
        output.push_str(&format!("- area: {area} m2\n"));
    }
    if let Some(class) = report.environmental_class {
        output.push_str(&format!("- environmental class: {class}\n"));
    }
    if !report.notes.trim().is_empty() {
        output.push_str(&format!("- notes: {}\n", report.notes.trim()));
    }
    output.push('\n');

    output.push_str("## Category Scores\n\n");
    for category in &report.categories {
        output.push_str(&format!(
            "### {} ({}){}\n\n",
            category.name,
            category.score,
            if category.gated { " - gating criterion failed" } else { "" }
        ));
        for criterion in &category.criteria {
            output.push_str(&format!(
                "- {}: {}",
                criterion.name,
                score_cell(criterion.score)
            ));
            if let Some(answer) = &criterion.answer {
                output.push_str(&format!(" ({answer})"));
            }
            output.push('\n');
        }
        output.push('\n');
    }

    output
}

pub fn comparison_to_markdown(ranked: &[RankedSite], catalog: &Catalog) -> String {
    let (_, max) = total_scale(catalog);
    let mut output = String::new();
    output.push_str("# Site Comparison\n\n");
    if ranked.is_empty() {
        output.push_str("- none\n");
        return output;
    }

    output.push_str("| rank | site | total |");
    for category in catalog.categories() {
        output.push_str(&format!(" {} |", category.name));
    }
    output.push_str("\n|---|---|---|");
    for _ in catalog.categories() {
        output.push_str("---|");
    }
    output.push('\n');

    for entry in ranked {
        let name = if entry.disqualified {
            format!("{} (disqualified)", entry.name)
        } else {
            entry.name.clone()
        };
        output.push_str(&format!(
            "| {} | {} | {} |",
            entry.rank,
            name,
            format_total(entry.total, max)
        ));
        for category in catalog.categories() {
            let score = entry
                .categories
                .iter()
                .find(|(id, _)| *id == category.id)
                .map_or(Score::Pending, |(_, score)| *score);
            output.push_str(&format!(" {} |", score_cell(score)));
        }
        output.push('\n');
    }

    output
}

pub fn catalog_to_markdown(catalog: &Catalog) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Catalog: {}\n\n", catalog.name));
    output.push_str(&format!(
        "Scoring: {:?}, gating scope: {:?}\n\n",
        catalog.mode, catalog.gating
    ));
    for category in catalog.categories() {
        output.push_str(&format!(
            "## {} [{}] (weight {:.2})\n\n",
            category.name,
            category.id,
            catalog.weight(category)
        ));
        for criterion in &category.criteria {
            let mut flags = Vec::new();
            if criterion.gating {
                flags.push("gating");
            }
            if !criterion.required {
                flags.push("optional");
            }
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" ({})", flags.join(", "))
            };
            output.push_str(&format!("- {} [{}]{}\n", criterion.name, criterion.id, flags));
            if let Some(hint) = &criterion.hint {
                output.push_str(&format!("  - hint: {hint}\n"));
            }
            for (position, option) in criterion.options.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. `{}` {} = {} pts\n",
                    position + 1,
                    option.key,
                    option.label,
                    option.points
                ));
            }
        }
        output.push('\n');
    }
    output
}

fn score_cell(score: Score) -> String {
    match score {
        Score::Pending => "-".to_string(),
        Score::Scored(value) => value.to_string(),
    }
}
