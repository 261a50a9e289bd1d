use meshplan_common::{Candidate, Coordinate, NodeConfig, ScoringWeights};
use meshplan_physics::{analyze_link, haversine_distance, DEFAULT_K_FACTOR};
use meshplan_terrain::TerrainManager;

const PROMINENCE_GRID_STEPS: usize = 11;
const MIN_EXISTING_NODE_DISTANCE_M: f64 = 100.0;
const FRESNEL_CHECK_PROFILE_SAMPLES: usize = 30;

/// Topographic-prominence approximation: samples an
/// 11x11 grid of elevations centred on `coord` spanning `radius_km` in
/// every direction, and returns `max(0, center_elevation - mean(grid))`.
pub async fn calculate_prominence(tm: &TerrainManager, coord: Coordinate, radius_km: f64) -> f64 {
    let lat_per_km = 1.0 / 111.32;
    let lon_per_km = 1.0 / (111.32 * coord.lat.to_radians().cos().max(1e-6));

    let steps = PROMINENCE_GRID_STEPS;
    let mut points = Vec::with_capacity(steps * steps);
    let mut center_index = 0;
    for i in 0..steps {
        for j in 0..steps {
            let offset_lat = (i as f64 / (steps - 1) as f64 * 2.0 - 1.0) * radius_km * lat_per_km;
            let offset_lon = (j as f64 / (steps - 1) as f64 * 2.0 - 1.0) * radius_km * lon_per_km;
            let lat = (coord.lat + offset_lat).clamp(-90.0, 90.0);
            let lon = (coord.lon + offset_lon).clamp(-180.0, 180.0);
            if let Ok(p) = Coordinate::new(lat, lon) {
                if i == steps / 2 && j == steps / 2 {
                    center_index = points.len();
                }
                points.push(p);
            }
        }
    }

    let elevations = tm.get_elevations_batch(&points).await;
    let values: Vec<f64> = elevations.iter().filter_map(|e| e.map(|v| v as f64)).collect();
    if values.is_empty() {
        return 0.0;
    }

    let center_elevation = elevations
        .get(center_index)
        .and_then(|e| *e)
        .map(|v| v as f64)
        .unwrap_or(values[0]);
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    (center_elevation - mean).max(0.0)
}

/// Average, over existing nodes farther than 100 m from `tx`, of
/// `clamp(min_clearance_ratio, 0, 1)`. Returns `1.0`
/// (fully clear) when there are no existing nodes to check against.
pub async fn check_fresnel_clearance(
    tm: &TerrainManager,
    tx: &NodeConfig,
    existing_nodes: &[NodeConfig],
    f_mhz: f64,
    k: f64,
    clutter: f64,
) -> f64 {
    let relevant: Vec<&NodeConfig> = existing_nodes
        .iter()
        .filter(|n| haversine_distance(tx.position, n.position) > MIN_EXISTING_NODE_DISTANCE_M)
        .collect();

    if relevant.is_empty() {
        return 1.0;
    }

    let mut total = 0.0;
    let mut count = 0usize;
    for node in relevant {
        let distance_m = haversine_distance(tx.position, node.position);
        let profile = tm
            .get_elevation_profile(tx.position, node.position, FRESNEL_CHECK_PROFILE_SAMPLES)
            .await;
        let elevations: Option<Vec<f32>> = profile.iter().copied().collect();
        if let Some(elevations) = elevations {
            if let Ok(result) = analyze_link(
                &elevations,
                distance_m,
                f_mhz,
                tx.height_m,
                node.height_m,
                k,
                clutter,
            ) {
                total += result.min_clearance_ratio.clamp(0.0, 1.0);
                count += 1;
            }
        }
    }

    if count == 0 {
        1.0
    } else {
        total / count as f64
    }
}

/// Normalises elevation and prominence against the batch maximum, combines
/// them with the already-[0,1] fresnel factor per `weights`, and writes the
/// 0-100 score back onto each candidate. Fixes the source's per-candidate
/// unnormalised scoring by requiring the whole batch up front.
pub fn apply_scores(candidates: &mut [Candidate], weights: ScoringWeights) {
    let max_elev = candidates
        .iter()
        .filter_map(|c| c.elevation_m)
        .fold(0.0f64, |acc, e| acc.max(e as f64))
        .max(1e-9);
    let max_prom = candidates
        .iter()
        .filter_map(|c| c.prominence_m)
        .fold(0.0f64, f64::max)
        .max(1e-9);

    for candidate in candidates.iter_mut() {
        let elev_component = candidate.elevation_m.map(|e| e as f64 / max_elev).unwrap_or(0.0);
        let prom_component = candidate.prominence_m.map(|p| p / max_prom).unwrap_or(0.0);
        let fresnel_component = candidate.fresnel_factor.unwrap_or(0.0);

        let raw = weights.elevation * elev_component
            + weights.prominence * prom_component
            + weights.fresnel * fresnel_component;
        candidate.score = Some((raw * 100.0).clamp(0.0, 100.0));
    }
}

/// Full scoring pass over a candidate batch: fills in elevation, prominence
/// and fresnel factor where absent, then scores the whole batch together.
pub async fn score_candidates(
    tm: &TerrainManager,
    mut candidates: Vec<Candidate>,
    weights: ScoringWeights,
    existing_nodes: &[NodeConfig],
    f_mhz: f64,
    clutter: f64,
) -> Vec<Candidate> {
    for candidate in candidates.iter_mut() {
        if candidate.elevation_m.is_none() {
            candidate.elevation_m = tm.get_elevation(candidate.position()).await.ok();
        }
        if candidate.prominence_m.is_none() {
            candidate.prominence_m =
                Some(calculate_prominence(tm, candidate.position(), 5.0).await);
        }
        if candidate.fresnel_factor.is_none() {
            candidate.fresnel_factor = Some(
                check_fresnel_clearance(
                    tm,
                    &candidate.node,
                    existing_nodes,
                    f_mhz,
                    DEFAULT_K_FACTOR,
                    clutter,
                )
                .await,
            );
        }
    }

    apply_scores(&mut candidates, weights);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_scores_normalises_against_batch_max() {
        let make = |elev: f32, prom: f64, fresnel: f64| Candidate {
            node: NodeConfig::new(Coordinate::new(0.0, 0.0).unwrap(), 10.0).unwrap(),
            elevation_m: Some(elev),
            prominence_m: Some(prom),
            fresnel_factor: Some(fresnel),
            score: None,
        };

        let mut candidates = vec![make(100.0, 50.0, 1.0), make(50.0, 25.0, 0.5)];
        apply_scores(&mut candidates, ScoringWeights::default());

        assert!(candidates[0].score.unwrap() > candidates[1].score.unwrap());
        for c in &candidates {
            assert!(c.score.unwrap() >= 0.0 && c.score.unwrap() <= 100.0);
        }
    }
}
