use crate::error::Result;
use crate::registry::SiteRegistry;
use crate::types::scoring::{Score, TotalScore};
use crate::types::site::Site;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Serialize)]
pub struct RankedSite {
    pub rank: usize,
    pub name: String,
    pub total: TotalScore,
    pub disqualified: bool,
    pub categories: Vec<(String, Score)>,
}

/// Ranks the named sites (all sites when `names` is empty) by total score,
/// best first. Pending totals sort last; ties keep registry order.
pub fn rank(registry: &SiteRegistry, names: &[String]) -> Result<Vec<RankedSite>> {
    let selected = if names.is_empty() {
        registry.list().iter().collect::<Vec<_>>()
    } else {
        let mut picked: Vec<&Site> = Vec::with_capacity(names.len());
        for name in names {
            let site = registry.get(name)?;
            if !picked.iter().any(|existing| existing.name == site.name) {
                picked.push(site);
            }
        }
        let order = |name: &str| registry.list().iter().position(|site| site.name == name);
        picked.sort_by_key(|site| order(&site.name));
        picked
    };

    let mut ranked = selected
        .into_iter()
        .map(|site| RankedSite {
            rank: 0,
            name: site.name.clone(),
            total: site.scores.total,
            disqualified: site.disqualified(),
            categories: site
                .scores
                .categories
                .iter()
                .map(|category| (category.id.clone(), category.score))
                .collect(),
        })
        .collect::<Vec<_>>();

    ranked.sort_by(|left, right| compare_totals(left.total, right.total));
    for (index, entry) in ranked.iter_mut().enumerate() {
        entry.rank = index + 1;
    }
    Ok(ranked)
}

fn compare_totals(left: TotalScore, right: TotalScore) -> Ordering {
    match (left.value(), right.value()) {
        (Some(left), Some(right)) => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
