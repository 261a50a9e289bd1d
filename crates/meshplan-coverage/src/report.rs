use meshplan_common::telemetry::{metric_defs, metrics};
use meshplan_common::NodeConfig;
use meshplan_terrain::TerrainManager;
use meshplan_viewshed::{calculate_viewshed, Viewshed};
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;

use crate::composite::{build_composite, Composite};
use crate::error::CoverageError;
use crate::grid::MasterGrid;
use crate::link_graph::{build_link_graph, connectivity_scores, NodeLink};
use crate::selector::{greedy_select, marginal_coverage_report, total_union_pixels};

const DEFAULT_RESOLUTION_M: f64 = 30.0;
const MASTER_GRID_PIXEL_AREA_KM2: f64 = 0.01; // 100m x 100m

/// Intermediate progress for a coverage job, delivered via a
/// caller-supplied channel — the job-bus transport itself is out of scope.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub progress: u8,
    pub message: String,
}

/// Input to [`run_coverage`].
#[derive(Debug, Clone)]
pub struct CoverageParams {
    pub nodes: Vec<NodeConfig>,
    pub radius_m: f64,
    /// When set, runs the greedy selector to pick this many nodes out of
    /// `nodes`; when absent, every node is treated as selected.
    pub optimize_n: Option<usize>,
    pub f_mhz: f64,
    pub rx_h: f64,
    pub k: f64,
    pub clutter: f64,
    pub resolution_m: f64,
    /// Checked at each candidate boundary in `run_coverage`'s per-node
    /// loop; cancelling it stops further node evaluations and surfaces
    /// `CoverageError::JobCancelled`. `None` means the job cannot be
    /// cancelled.
    pub cancel: Option<CancellationToken>,
}

impl CoverageParams {
    pub fn new(nodes: Vec<NodeConfig>, radius_m: f64, f_mhz: f64, rx_h: f64) -> Self {
        Self {
            nodes,
            radius_m,
            optimize_n: None,
            f_mhz,
            rx_h,
            k: meshplan_physics::DEFAULT_K_FACTOR,
            clutter: 0.0,
            resolution_m: DEFAULT_RESOLUTION_M,
            cancel: None,
        }
    }
}

/// Per-node outcome in a [`CoverageReport`].
#[derive(Debug, Clone)]
pub struct NodeResult {
    pub node: NodeConfig,
    pub coverage_area_km2: f64,
    pub marginal_coverage_km2: f64,
    pub unique_coverage_pct: f64,
    pub connectivity_score: usize,
}

/// Full output of [`run_coverage`].
#[derive(Debug, Clone)]
pub struct CoverageReport {
    pub results: Vec<NodeResult>,
    pub inter_node_links: Vec<NodeLink>,
    pub total_unique_coverage_km2: f64,
    pub composite: Option<Composite>,
}

async fn report_progress(tx: &Option<Sender<ProgressEvent>>, progress: u8, message: &str) {
    if let Some(tx) = tx {
        let _ = tx
            .send(ProgressEvent {
                progress,
                message: message.to_string(),
            })
            .await;
    }
}

/// Runs the full coverage pipeline: per-node viewsheds, optional greedy
/// selection, inter-node link graph, marginal coverage accounting, and
/// composite raster. Returns `Err` only when it cannot produce any result
/// at all (zero nodes); otherwise always returns `Ok` with whatever subset
/// of nodes could be evaluated.
pub async fn run_coverage(
    tm: &TerrainManager,
    params: CoverageParams,
    progress: Option<Sender<ProgressEvent>>,
) -> Result<CoverageReport, CoverageError> {
    if params.nodes.is_empty() {
        return Err(CoverageError::NoCandidates);
    }

    let job_start = std::time::Instant::now();
    metrics::counter!(metric_defs::COVERAGE_JOBS_STARTED).increment(1);

    let mut viewsheds: Vec<Viewshed> = Vec::with_capacity(params.nodes.len());
    for (i, node) in params.nodes.iter().enumerate() {
        if let Some(cancel) = &params.cancel {
            if cancel.is_cancelled() {
                metrics::counter!(metric_defs::COVERAGE_JOBS_CANCELLED).increment(1);
                return Err(CoverageError::JobCancelled);
            }
        }

        let vs = calculate_viewshed(
            tm,
            node.position,
            node.height_m,
            params.radius_m,
            params.rx_h,
            params.f_mhz,
            params.resolution_m,
            params.k,
            params.clutter,
        )
        .await?;
        viewsheds.push(vs);
        metrics::counter!(metric_defs::COVERAGE_CANDIDATES_EVALUATED).increment(1);

        let pct = (50 * (i + 1) / params.nodes.len()) as u8;
        report_progress(&progress, pct, "computed candidate viewshed").await;
    }

    let grid = MasterGrid::covering(&viewsheds).ok_or(CoverageError::NoCandidates)?;
    let pixel_sets: Vec<std::collections::HashSet<(usize, usize)>> =
        viewsheds.iter().map(|vs| grid.pixel_set(vs)).collect();

    let selected: Vec<usize> = match params.optimize_n {
        Some(n_select) => greedy_select(&pixel_sets, n_select)?,
        None => (0..params.nodes.len()).collect(),
    };
    report_progress(&progress, 60, "selected coverage set").await;

    let selected_nodes: Vec<NodeConfig> = selected.iter().map(|&i| params.nodes[i].clone()).collect();
    let selected_viewsheds: Vec<Viewshed> = selected.iter().map(|&i| viewsheds[i].clone()).collect();

    let links = build_link_graph(tm, &selected_nodes, params.f_mhz, params.k, params.clutter).await;
    report_progress(&progress, 80, "evaluated inter-node links").await;

    let connectivity = connectivity_scores(selected.len(), &links);
    let marginal = marginal_coverage_report(&pixel_sets, &selected, MASTER_GRID_PIXEL_AREA_KM2);

    let results: Vec<NodeResult> = selected
        .iter()
        .zip(marginal.iter())
        .zip(connectivity.iter())
        .map(|((&idx, marginal), &conn)| NodeResult {
            node: params.nodes[idx].clone(),
            coverage_area_km2: pixel_sets[idx].len() as f64 * MASTER_GRID_PIXEL_AREA_KM2,
            marginal_coverage_km2: marginal.marginal_coverage_km2,
            unique_coverage_pct: marginal.unique_coverage_pct,
            connectivity_score: conn,
        })
        .collect();

    let total_unique_coverage_km2 =
        total_union_pixels(&pixel_sets, &selected) as f64 * MASTER_GRID_PIXEL_AREA_KM2;

    let composite = build_composite(&selected_viewsheds);
    report_progress(&progress, 100, "coverage job complete").await;

    metrics::counter!(metric_defs::COVERAGE_JOBS_COMPLETED).increment(1);
    metrics::histogram!(metric_defs::COVERAGE_JOB_DURATION_SECONDS)
        .record(job_start.elapsed().as_secs_f64());

    Ok(CoverageReport {
        results,
        inter_node_links: links,
        total_unique_coverage_km2,
        composite,
    })
}
