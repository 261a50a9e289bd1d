use std::collections::HashSet;

use crate::error::CoverageError;

type Pixel = (usize, usize);

/// One candidate's selection outcome after the greedy replay: its marginal
/// (newly-added) coverage, in pixel count and km², and what share of its
/// own total viewshed that marginal coverage represents.
#[derive(Debug, Clone)]
pub struct MarginalCoverage {
    pub candidate_index: usize,
    pub marginal_pixels: usize,
    pub marginal_coverage_km2: f64,
    pub unique_coverage_pct: f64,
}

/// Greedy submodular selection: repeatedly picks the
/// unselected candidate whose viewshed adds the most previously-uncovered
/// pixels, stopping early once no candidate has positive marginal gain.
/// Ties are broken by the lowest candidate index, since candidates are
/// scanned in index order and only a strictly greater gain replaces the
/// current best.
pub fn greedy_select(
    pixel_sets: &[HashSet<Pixel>],
    n_select: usize,
) -> Result<Vec<usize>, CoverageError> {
    if pixel_sets.is_empty() {
        return Err(CoverageError::NoCandidates);
    }
    if n_select == 0 {
        return Err(CoverageError::InvalidSelectionCount(0));
    }

    let mut covered: HashSet<Pixel> = HashSet::new();
    let mut selected = Vec::new();
    let mut remaining: Vec<usize> = (0..pixel_sets.len()).collect();

    while selected.len() < n_select {
        let mut best_idx = None;
        let mut best_gain = 0usize;

        for &i in &remaining {
            let gain = pixel_sets[i].difference(&covered).count();
            if gain > best_gain {
                best_gain = gain;
                best_idx = Some(i);
            }
        }

        match best_idx {
            Some(i) if best_gain > 0 => {
                covered.extend(pixel_sets[i].iter().copied());
                selected.push(i);
                remaining.retain(|&r| r != i);
            }
            _ => break,
        }
    }

    Ok(selected)
}

/// Replays the selection in order to compute each selected node's marginal
/// (newly-added) coverage — per-pixel accounting, never approximate.
pub fn marginal_coverage_report(
    pixel_sets: &[HashSet<Pixel>],
    selected: &[usize],
    pixel_area_km2: f64,
) -> Vec<MarginalCoverage> {
    let mut covered: HashSet<Pixel> = HashSet::new();
    let mut report = Vec::with_capacity(selected.len());

    for &idx in selected {
        let set = &pixel_sets[idx];
        let marginal: HashSet<Pixel> = set.difference(&covered).copied().collect();
        let marginal_pixels = marginal.len();
        let unique_coverage_pct = if set.is_empty() {
            0.0
        } else {
            marginal_pixels as f64 / set.len() as f64 * 100.0
        };
        covered.extend(marginal.iter().copied());

        report.push(MarginalCoverage {
            candidate_index: idx,
            marginal_pixels,
            marginal_coverage_km2: marginal_pixels as f64 * pixel_area_km2,
            unique_coverage_pct,
        });
    }

    report
}

/// Total union pixel count across the selected set — exact, not an
/// approximation of the sum of individual viewsheds.
pub fn total_union_pixels(pixel_sets: &[HashSet<Pixel>], selected: &[usize]) -> usize {
    let mut covered: HashSet<Pixel> = HashSet::new();
    for &idx in selected {
        covered.extend(pixel_sets[idx].iter().copied());
    }
    covered.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[(usize, usize)]) -> HashSet<Pixel> {
        items.iter().copied().collect()
    }

    #[test]
    fn greedy_coverage_scenario() {
        // A={1,2,3}, B={3,4,5}, C={1,2,3,4,5}; modelled as (0,n) pixels.
        let a = set(&[(0, 1), (0, 2), (0, 3)]);
        let b = set(&[(0, 3), (0, 4), (0, 5)]);
        let c = set(&[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
        let sets = vec![a, b, c];

        let selected = greedy_select(&sets, 2).unwrap();
        // C has the largest single viewshed and is picked first; once it
        // covers every pixel in the universe, A and B have zero marginal
        // gain and the greedy loop stops early per its own rule.
        assert_eq!(selected, vec![2]);
        assert_eq!(total_union_pixels(&sets, &selected), 5);
    }

    #[test]
    fn ties_break_by_lowest_candidate_index() {
        let a = set(&[(0, 1), (0, 2)]);
        let b = set(&[(0, 2), (0, 3)]);
        let sets = vec![a, b];

        let selected = greedy_select(&sets, 1).unwrap();
        assert_eq!(selected, vec![0]);
    }

    #[test]
    fn marginal_gain_sequence_is_non_increasing() {
        let a = set(&[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let b = set(&[(0, 3), (0, 4)]);
        let c = set(&[(0, 5)]);
        let sets = vec![a, b, c];

        let selected = greedy_select(&sets, 3).unwrap();
        let report = marginal_coverage_report(&sets, &selected, 0.01);
        let gains: Vec<usize> = report.iter().map(|m| m.marginal_pixels).collect();
        for window in gains.windows(2) {
            assert!(window[0] >= window[1]);
        }
    }

    #[test]
    fn selected_size_never_exceeds_n_or_candidate_count() {
        let sets = vec![set(&[(0, 1)]), set(&[(0, 2)])];
        let selected = greedy_select(&sets, 5).unwrap();
        assert!(selected.len() <= 2);
    }

    #[test]
    fn rejects_empty_candidate_set() {
        let sets: Vec<HashSet<Pixel>> = vec![];
        assert!(greedy_select(&sets, 1).is_err());
    }
}
