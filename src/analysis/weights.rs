use super::types::LexicalGroup;

/// Fills in the per-field attribution of a lexical group.
///
/// Fields are ordered by raw score, highest first (stable, so ties keep
/// traversal order). The first is the max; every other field counts
/// `multiplier` times its raw score.
pub fn finalize(group: &mut LexicalGroup) {
    if group.fields.is_empty() {
        group.calculated_total = 0.0;
        group.max_score = 0.0;
        group.others_sum = 0.0;
        group.weighted_others_sum = 0.0;
        return;
    }

    group
        .fields
        .sort_by(|a, b| b.raw_score.total_cmp(&a.raw_score));

    let max_score = group.fields[0].raw_score;
    let others_sum: f64 = group.fields[1..].iter().map(|f| f.raw_score).sum();
    let calculated_total = max_score + group.multiplier * others_sum;

    for (i, field) in group.fields.iter_mut().enumerate() {
        field.is_max = i == 0;
        field.weighted_score = if field.is_max {
            field.raw_score
        } else {
            field.raw_score * group.multiplier
        };
        field.contribution_percent = percent_of(field.weighted_score, calculated_total);
    }

    group.max_score = max_score;
    group.others_sum = others_sum;
    group.weighted_others_sum = others_sum * group.multiplier;
    group.calculated_total = calculated_total;
}

/// `max + multiplier * others` over raw scores, 0 for no scores.
pub fn max_plus_others(scores: &[f64], multiplier: f64) -> f64 {
    let Some(max) = scores.iter().copied().reduce(f64::max) else {
        return 0.0;
    };
    let others: f64 = scores.iter().sum::<f64>() - max;
    max + multiplier * others
}

fn percent_of(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        100.0 * part / total
    }
}
