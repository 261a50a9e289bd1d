use meshplan_common::{Coordinate, LinkResult, LinkStatus, EARTH_RADIUS_M};

use crate::error::PhysicsError;

/// Speed of light, m/s — matches the reference implementation's constant.
const SPEED_OF_LIGHT_M_S: f64 = 2.99792e8;

/// Default effective-Earth-radius k-factor (4/3).
pub const DEFAULT_K_FACTOR: f64 = 4.0 / 3.0;

/// Path-loss model to dispatch on in [`calculate_path_loss`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathLossModel {
    /// Free-space path loss only, ignoring terrain.
    Fspl,
    /// Okumura-Hata empirical model.
    Hata,
    /// Free-space loss plus Bullington knife-edge diffraction loss.
    Bullington,
}

/// Clutter/morphology environment for the Okumura-Hata model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    UrbanSmall,
    UrbanLarge,
    Suburban,
    Rural,
}

fn wavelength_m(f_mhz: f64) -> f64 {
    SPEED_OF_LIGHT_M_S / (f_mhz * 1.0e6)
}

fn check_distance(d: f64) -> Result<(), PhysicsError> {
    if !d.is_finite() || d <= 0.0 {
        return Err(PhysicsError::InvalidDistance(d));
    }
    Ok(())
}

fn check_frequency(f_mhz: f64) -> Result<(), PhysicsError> {
    if !f_mhz.is_finite() || f_mhz <= 0.0 {
        return Err(PhysicsError::InvalidFrequency(f_mhz));
    }
    Ok(())
}

fn check_height(h: f64) -> Result<(), PhysicsError> {
    if !h.is_finite() || h <= 0.0 {
        return Err(PhysicsError::InvalidHeight(h));
    }
    Ok(())
}

/// Great-circle distance between two coordinates on a sphere of radius
/// [`EARTH_RADIUS_M`].
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// First Fresnel zone radius at a point `d1` from the transmitter and `d2`
/// from the receiver along a path of total length `d_total`.
pub fn fresnel_radius(d_total: f64, f_mhz: f64, d1: f64, d2: f64) -> Result<f64, PhysicsError> {
    check_distance(d_total)?;
    check_frequency(f_mhz)?;
    if (d1 + d2 - d_total).abs() > 1e-3 || d1 <= 0.0 || d2 <= 0.0 || d1 >= d_total || d2 >= d_total
    {
        return Err(PhysicsError::InconsistentFresnelSplit {
            d1,
            d2,
            d: d_total,
        });
    }
    let lambda = wavelength_m(f_mhz);
    Ok((lambda * d1 * d2 / d_total).sqrt())
}

struct InteriorPoint {
    d_i: f64,
    effective_terrain: f64,
    los_altitude: f64,
}

/// Builds the per-sample distance / effective-terrain / LOS-altitude triple
/// shared by [`bullington_diffraction_loss`] and [`analyze_link`].
fn build_path(
    profile: &[f32],
    d_total: f64,
    h_tx: f64,
    h_rx: f64,
    k: f64,
    clutter: f64,
) -> Result<Vec<InteriorPoint>, PhysicsError> {
    if profile.len() < 2 {
        return Err(PhysicsError::ProfileTooShort(profile.len()));
    }
    check_distance(d_total)?;
    check_height(h_tx)?;
    check_height(h_rx)?;

    let n = profile.len();
    let step = d_total / (n - 1) as f64;
    let tx_altitude = profile[0] as f64 + h_tx;
    let rx_altitude = profile[n - 1] as f64 + h_rx;

    let mut points = Vec::with_capacity(n);
    for (i, elevation) in profile.iter().enumerate() {
        let d_i = i as f64 * step;
        let bulge = d_i * (d_total - d_i) / (2.0 * k * EARTH_RADIUS_M);
        let effective_terrain = *elevation as f64 + bulge + clutter;
        let los_altitude = tx_altitude + (rx_altitude - tx_altitude) * (d_i / d_total);
        points.push(InteriorPoint {
            d_i,
            effective_terrain,
            los_altitude,
        });
    }
    Ok(points)
}

/// Bullington knife-edge diffraction loss in dB, added on top of free-space
/// loss by [`calculate_path_loss`] for the `Bullington` model.
pub fn bullington_diffraction_loss(
    d_total: f64,
    profile: &[f32],
    f_mhz: f64,
    h_tx: f64,
    h_rx: f64,
    k: f64,
    clutter: f64,
) -> Result<f64, PhysicsError> {
    check_frequency(f_mhz)?;
    let points = build_path(profile, d_total, h_tx, h_rx, k, clutter)?;
    let lambda = wavelength_m(f_mhz);

    let mut v_max = f64::NEG_INFINITY;
    for p in &points {
        let d_rx = d_total - p.d_i;
        if p.d_i <= 1.0 || d_rx <= 1.0 {
            continue;
        }
        let h = p.effective_terrain - p.los_altitude;
        let v = h * (2.0 * d_total / (lambda * p.d_i * d_rx)).sqrt();
        if v > v_max {
            v_max = v;
        }
    }

    if !v_max.is_finite() || v_max <= -0.78 {
        return Ok(0.0);
    }

    let loss = 6.9 + 20.0 * (((v_max - 0.1).powi(2) + 1.0).sqrt() + (v_max - 0.1)).log10();
    Ok(loss.max(0.0))
}

fn a_hm_small_medium_city(f_mhz: f64, h_m: f64) -> f64 {
    (1.1 * f_mhz.log10() - 0.7) * h_m - (1.56 * f_mhz.log10() - 0.8)
}

fn a_hm_large_city(f_mhz: f64, h_m: f64) -> f64 {
    if f_mhz < 400.0 {
        8.29 * (1.54 * h_m).log10().powi(2) - 1.1
    } else {
        3.2 * (11.75 * h_m).log10().powi(2) - 4.97
    }
}

/// Okumura-Hata empirical path loss, with the standard mobile-height
/// correction and suburban/rural corrections layered over the small/medium
/// city baseline. Heights are floored at 1 m, distance at 100 m.
pub fn hata_loss(
    d_total: f64,
    f_mhz: f64,
    h_b: f64,
    h_m: f64,
    environment: Environment,
) -> Result<f64, PhysicsError> {
    check_distance(d_total)?;
    check_frequency(f_mhz)?;
    check_height(h_b)?;
    check_height(h_m)?;

    let d_km = (d_total.max(100.0)) / 1000.0;
    let h_b = h_b.max(1.0);
    let h_m = h_m.max(1.0);
    let log_f = f_mhz.log10();
    let log_hb = h_b.log10();

    let urban_with = |a_hm: f64| {
        69.55 + 26.16 * log_f - 13.82 * log_hb - a_hm + (44.9 - 6.55 * log_hb) * d_km.log10()
    };

    let loss = match environment {
        Environment::UrbanSmall => urban_with(a_hm_small_medium_city(f_mhz, h_m)),
        Environment::UrbanLarge => urban_with(a_hm_large_city(f_mhz, h_m)),
        Environment::Suburban => {
            urban_with(a_hm_small_medium_city(f_mhz, h_m)) - 2.0 * (f_mhz / 28.0).log10().powi(2)
                - 5.4
        }
        Environment::Rural => {
            urban_with(a_hm_small_medium_city(f_mhz, h_m)) - 4.78 * log_f.powi(2)
                + 18.33 * log_f
                - 40.94
        }
    };
    Ok(loss)
}

fn free_space_path_loss(d_total: f64, f_mhz: f64) -> Result<f64, PhysicsError> {
    check_distance(d_total)?;
    check_frequency(f_mhz)?;
    let d_km = d_total / 1000.0;
    Ok(20.0 * d_km.log10() + 20.0 * f_mhz.log10() + 32.44)
}

/// Dispatches on `model` to compute total path loss in dB.
#[allow(clippy::too_many_arguments)]
pub fn calculate_path_loss(
    model: PathLossModel,
    d_total: f64,
    profile: &[f32],
    f_mhz: f64,
    h_tx: f64,
    h_rx: f64,
    environment: Option<Environment>,
    k: f64,
    clutter: f64,
) -> Result<f64, PhysicsError> {
    match model {
        PathLossModel::Fspl => free_space_path_loss(d_total, f_mhz),
        PathLossModel::Hata => {
            let env = environment.ok_or(PhysicsError::MissingEnvironment)?;
            hata_loss(d_total, f_mhz, h_tx, h_rx, env)
        }
        PathLossModel::Bullington => {
            let fspl = free_space_path_loss(d_total, f_mhz)?;
            let diffraction =
                bullington_diffraction_loss(d_total, profile, f_mhz, h_tx, h_rx, k, clutter)?;
            Ok(fspl + diffraction)
        }
    }
}

/// Analyzes a single point-to-point path: Fresnel clearance ratio at every
/// interior sample, the worst (minimum) ratio, a [`LinkStatus`]
/// classification, and a Bullington-model path loss.
#[allow(clippy::too_many_arguments)]
pub fn analyze_link(
    profile: &[f32],
    d_total: f64,
    f_mhz: f64,
    h_tx: f64,
    h_rx: f64,
    k: f64,
    clutter: f64,
) -> Result<LinkResult, PhysicsError> {
    check_frequency(f_mhz)?;
    let points = build_path(profile, d_total, h_tx, h_rx, k, clutter)?;
    let lambda = wavelength_m(f_mhz);

    let mut min_ratio = f64::INFINITY;
    let mut worst_index = 0usize;
    for (i, p) in points.iter().enumerate() {
        let d_rx = d_total - p.d_i;
        if p.d_i <= 1.0 || d_rx <= 1.0 {
            continue;
        }
        let fresnel = (lambda * p.d_i * d_rx / d_total).sqrt();
        let clearance = p.los_altitude - p.effective_terrain;
        let ratio = clearance / fresnel;
        if ratio < min_ratio {
            min_ratio = ratio;
            worst_index = i;
        }
    }

    if !min_ratio.is_finite() {
        // No interior samples far enough from either endpoint to evaluate;
        // treat as fully clear, matching a degenerate (very short) path.
        min_ratio = 1.0;
    }

    let path_loss_db = calculate_path_loss(
        PathLossModel::Bullington,
        d_total,
        profile,
        f_mhz,
        h_tx,
        h_rx,
        None,
        k,
        clutter,
    )?;

    Ok(LinkResult {
        distance_km: d_total / 1000.0,
        status: LinkStatus::from_clearance_ratio(min_ratio),
        min_clearance_ratio: min_ratio,
        path_loss_db,
        worst_point_index: worst_index,
    })
}

/// Full response shape for the external `CalculateLink` operation
/// bundling [`analyze_link`]'s result with the sampled
/// profile and the model that produced `path_loss_db`. Kept separate from
/// [`LinkResult`] so per-pixel/per-pair internal callers (viewshed, link
/// graph) aren't forced to carry a full profile copy per point.
#[derive(Debug, Clone)]
pub struct LinkReport {
    pub result: LinkResult,
    pub profile: Vec<f32>,
    pub model_used: PathLossModel,
}

/// Top-level `CalculateLink(tx, rx, f_MHz, h_tx, h_rx, model, environment,
/// k, clutter)` entry point: like [`analyze_link`], but lets the caller pick
/// the path-loss model and returns the full external-interface payload.
pub fn calculate_link(
    profile: &[f32],
    d_total: f64,
    f_mhz: f64,
    h_tx: f64,
    h_rx: f64,
    model: PathLossModel,
    environment: Option<Environment>,
    k: f64,
    clutter: f64,
) -> Result<LinkReport, PhysicsError> {
    let base = analyze_link(profile, d_total, f_mhz, h_tx, h_rx, k, clutter)?;
    let path_loss_db = calculate_path_loss(
        model, d_total, profile, f_mhz, h_tx, h_rx, environment, k, clutter,
    )?;
    Ok(LinkReport {
        result: LinkResult {
            path_loss_db,
            ..base
        },
        profile: profile.to_vec(),
        model_used: model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn haversine_self_distance_is_zero() {
        let a = Coordinate::new(47.6062, -122.3321).unwrap();
        assert_abs_diff_eq!(haversine_distance(a, a), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = Coordinate::new(47.6062, -122.3321).unwrap();
        let b = Coordinate::new(40.7128, -74.0060).unwrap();
        assert_abs_diff_eq!(
            haversine_distance(a, b),
            haversine_distance(b, a),
            epsilon = 1e-6
        );
    }

    #[test]
    fn fresnel_radius_at_midpoint() {
        let d = 10_000.0;
        let f_mhz = 915.0;
        let r = fresnel_radius(d, f_mhz, d / 2.0, d / 2.0).unwrap();
        let lambda = wavelength_m(f_mhz);
        let expected = (lambda * d / 4.0).sqrt();
        assert_abs_diff_eq!(r, expected, epsilon = 1e-9);
    }

    #[test]
    fn fresnel_radius_rejects_inconsistent_split() {
        assert!(fresnel_radius(1000.0, 915.0, 400.0, 700.0).is_err());
    }

    #[test]
    fn fspl_sanity_scenario() {
        // Scenario 1: D=1000m, f=915MHz, model=fspl -> ~91.67 dB
        let loss = calculate_path_loss(
            PathLossModel::Fspl,
            1000.0,
            &[0.0, 0.0],
            915.0,
            10.0,
            2.0,
            None,
            DEFAULT_K_FACTOR,
            0.0,
        )
        .unwrap();
        assert_abs_diff_eq!(loss, 91.67, epsilon = 0.1);
    }

    #[test]
    fn flat_terrain_blocked_by_earth_curvature() {
        // Scenario 2: 50 flat samples, D=5km, f=915MHz, h_tx=30, h_rx=2.
        let profile = vec![0.0f32; 50];
        let result = analyze_link(&profile, 5000.0, 915.0, 30.0, 2.0, DEFAULT_K_FACTOR, 0.0)
            .unwrap();
        assert_eq!(result.status, LinkStatus::Blocked);
        assert!(result.min_clearance_ratio < 0.0);
    }

    #[test]
    fn knife_edge_profile_is_blocked() {
        // Scenario 3: 15 samples, endpoints 0m, centre 100m, flat elsewhere.
        let mut profile = vec![0.0f32; 15];
        profile[7] = 100.0;
        let diffraction = bullington_diffraction_loss(
            10_000.0,
            &profile,
            915.0,
            10.0,
            10.0,
            DEFAULT_K_FACTOR,
            0.0,
        )
        .unwrap();
        assert!(diffraction > 15.0);

        let result = analyze_link(&profile, 10_000.0, 915.0, 10.0, 10.0, DEFAULT_K_FACTOR, 0.0)
            .unwrap();
        assert_eq!(result.status, LinkStatus::Blocked);
    }

    #[test]
    fn hata_suburban_is_in_plausible_range() {
        // Scenario 6: D=5km, f=900MHz, h_b=30, h_m=2, suburban.
        // The exact reference value isn't reproducible from the retrieval
        // pack (no Hata implementation is present there), so this pins the
        // result to a broad, physically sane band rather than a tight
        // tolerance around an unverified constant.
        let loss = hata_loss(5000.0, 900.0, 30.0, 2.0, Environment::Suburban).unwrap();
        assert!(loss > 80.0 && loss < 170.0);
    }

    #[test]
    fn hata_requires_environment_for_path_loss() {
        let err = calculate_path_loss(
            PathLossModel::Hata,
            5000.0,
            &[0.0, 0.0],
            900.0,
            30.0,
            2.0,
            None,
            DEFAULT_K_FACTOR,
            0.0,
        );
        assert!(matches!(err, Err(PhysicsError::MissingEnvironment)));
    }

    #[test]
    fn rejects_short_profile() {
        let err = analyze_link(&[0.0], 1000.0, 915.0, 10.0, 2.0, DEFAULT_K_FACTOR, 0.0);
        assert!(matches!(err, Err(PhysicsError::ProfileTooShort(1))));
    }
}
