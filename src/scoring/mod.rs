//! The scoring engine: answers in, per-category scores and a total out.
//! Pure and deterministic; the caller writes results back to the registry.

pub mod answers;

pub use answers::AnswerSet;

use crate::error::Result;
use crate::types::catalog::{Catalog, Category, GatingScope, ScoringMode};
use crate::types::scoring::{CategoryResult, CriterionResult, Score, ScoredResult, TotalScore};

const MIN_SCORE: u8 = 1;
const MAX_SCORE: u8 = 5;
const PERCENT_PER_POINT: f64 = 20.0;

pub fn score(catalog: &Catalog, answers: &AnswerSet) -> Result<ScoredResult> {
    let points = resolve_points(catalog, answers)?;
    let gated = gated_category(catalog, answers);

    if let (Some(gated_id), GatingScope::Site) = (gated, catalog.gating) {
        return Ok(disqualified(catalog, gated_id, &points));
    }

    let categories = catalog
        .categories()
        .iter()
        .map(|category| {
            if gated == Some(category.id.as_str()) {
                forced_minimum(category, &points, true)
            } else {
                score_category(category, &points)
            }
        })
        .collect::<Vec<_>>();
    let total = total_score(catalog, &categories);

    Ok(ScoredResult {
        categories,
        total,
        disqualified: false,
    })
}

/// Rounds `sum / count` to the nearest integer, ties upward.
pub fn round_half_up(sum: u32, count: u32) -> u8 {
    if count == 0 {
        return MIN_SCORE;
    }
    let rounded = (2 * sum + count) / (2 * count);
    rounded.clamp(u32::from(MIN_SCORE), u32::from(MAX_SCORE)) as u8
}

/// Point value per answered criterion, in catalog order. Fails on answers
/// the catalog does not know.
fn resolve_points<'a>(
    catalog: &'a Catalog,
    answers: &AnswerSet,
) -> Result<Vec<(&'a str, Option<u8>)>> {
    for (criterion_id, _) in answers.iter() {
        catalog.criterion(criterion_id)?;
    }

    let mut points = Vec::new();
    for category in catalog.categories() {
        for criterion in &category.criteria {
            let value = match answers.get(&criterion.id) {
                Some(option_key) => Some(criterion.option(option_key)?.points),
                None => None,
            };
            points.push((criterion.id.as_str(), value));
        }
    }
    Ok(points)
}

fn points_for(points: &[(&str, Option<u8>)], criterion_id: &str) -> Option<u8> {
    points
        .iter()
        .find(|(id, _)| *id == criterion_id)
        .and_then(|(_, value)| *value)
}

/// First category, in catalog order, whose gating criterion carries its
/// disqualifying answer.
fn gated_category<'a>(catalog: &'a Catalog, answers: &AnswerSet) -> Option<&'a str> {
    catalog.categories().iter().find_map(|category| {
        let failed = category.criteria.iter().any(|criterion| {
            match (criterion.disqualifying_option(), answers.get(&criterion.id)) {
                (Some(worst), Some(selected)) => worst.key == selected,
                _ => false,
            }
        });
        failed.then_some(category.id.as_str())
    })
}

fn score_category(category: &Category, points: &[(&str, Option<u8>)]) -> CategoryResult {
    let mut criteria = Vec::with_capacity(category.criteria.len());
    let mut sum = 0u32;
    let mut answered = 0u32;
    let mut missing_required = false;

    for criterion in &category.criteria {
        let value = points_for(points, &criterion.id);
        match value {
            Some(value) => {
                sum += u32::from(value);
                answered += 1;
            }
            None if criterion.required => missing_required = true,
            None => {}
        }
        criteria.push(CriterionResult {
            id: criterion.id.clone(),
            score: value.map_or(Score::Pending, Score::Scored),
        });
    }

    let score = if answered == 0 || missing_required {
        Score::Pending
    } else {
        Score::Scored(round_half_up(sum, answered))
    };

    CategoryResult {
        id: category.id.clone(),
        score,
        gated: false,
        criteria,
    }
}

/// The gating category's criteria all count as the minimum. Other
/// categories keep their recorded criterion points for reference.
fn forced_minimum(
    category: &Category,
    points: &[(&str, Option<u8>)],
    gated: bool,
) -> CategoryResult {
    let criteria = category
        .criteria
        .iter()
        .map(|criterion| CriterionResult {
            id: criterion.id.clone(),
            score: if gated {
                Score::Scored(MIN_SCORE)
            } else {
                points_for(points, &criterion.id).map_or(Score::Pending, Score::Scored)
            },
        })
        .collect();

    CategoryResult {
        id: category.id.clone(),
        score: Score::Scored(MIN_SCORE),
        gated,
        criteria,
    }
}

fn disqualified(catalog: &Catalog, gated_id: &str, points: &[(&str, Option<u8>)]) -> ScoredResult {
    let categories = catalog
        .categories()
        .iter()
        .map(|category| forced_minimum(category, points, category.id == gated_id))
        .collect::<Vec<_>>();
    let total = total_score(catalog, &categories);

    ScoredResult {
        categories,
        total,
        disqualified: true,
    }
}

fn total_score(catalog: &Catalog, categories: &[CategoryResult]) -> TotalScore {
    let mut values = Vec::with_capacity(categories.len());
    for result in categories {
        match result.score {
            Score::Scored(value) => values.push(value),
            Score::Pending => return TotalScore::Pending,
        }
    }

    match catalog.mode {
        ScoringMode::Sum => TotalScore::Points(values.iter().map(|value| u32::from(*value)).sum()),
        ScoringMode::WeightedPercentage => {
            let weighted: f64 = catalog
                .categories()
                .iter()
                .zip(&values)
                .map(|(category, value)| f64::from(*value) * catalog.weight(category))
                .sum();
            TotalScore::Percent((weighted * PERCENT_PER_POINT).clamp(0.0, 100.0))
        }
    }
}
