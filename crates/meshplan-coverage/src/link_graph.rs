use meshplan_common::{LinkResult, LinkStatus, NodeConfig};
use meshplan_physics::{analyze_link, haversine_distance};
use meshplan_terrain::TerrainManager;

const LINK_GRAPH_PROFILE_SAMPLES: usize = 50;

/// A single evaluated pair in the inter-node link graph.
#[derive(Debug, Clone)]
pub struct NodeLink {
    pub node_a: usize,
    pub node_b: usize,
    pub result: LinkResult,
}

fn unknown_link(node_a: usize, node_b: usize, distance_km: f64) -> NodeLink {
    NodeLink {
        node_a,
        node_b,
        result: LinkResult {
            distance_km,
            status: LinkStatus::Unknown,
            min_clearance_ratio: 0.0,
            path_loss_db: 0.0,
            worst_point_index: 0,
        },
    }
}

/// Evaluates every unordered pair among `nodes`. A pair whose profile fetch
/// or physics evaluation fails is recorded with status `Unknown` and
/// zeroed metrics rather than aborting the whole graph.
pub async fn build_link_graph(
    tm: &TerrainManager,
    nodes: &[NodeConfig],
    f_mhz: f64,
    k: f64,
    clutter: f64,
) -> Vec<NodeLink> {
    let mut links = Vec::new();

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let a = &nodes[i];
            let b = &nodes[j];
            let distance_m = haversine_distance(a.position, b.position);
            let distance_km = distance_m / 1000.0;

            let profile = tm
                .get_elevation_profile(a.position, b.position, LINK_GRAPH_PROFILE_SAMPLES)
                .await;
            let elevations: Option<Vec<f32>> =
                profile.iter().copied().collect::<Option<Vec<f32>>>();

            let link = match elevations {
                Some(elevations) => {
                    // analyze_link always scores path loss via Bullington internally,
                    // which is also what the link graph wants.
                    match analyze_link(&elevations, distance_m, f_mhz, a.height_m, b.height_m, k, clutter) {
                        Ok(result) => NodeLink {
                            node_a: i,
                            node_b: j,
                            result,
                        },
                        Err(err) => {
                            tracing::debug!(i, j, %err, "link analysis failed, recording as unknown");
                            unknown_link(i, j, distance_km)
                        }
                    }
                }
                None => {
                    tracing::debug!(i, j, "profile fetch had a gap, recording link as unknown");
                    unknown_link(i, j, distance_km)
                }
            };
            links.push(link);
        }
    }

    links
}

/// Count, per node index, of links it participates in with status
/// `Viable` or `Degraded`.
pub fn connectivity_scores(node_count: usize, links: &[NodeLink]) -> Vec<usize> {
    let mut scores = vec![0usize; node_count];
    for link in links {
        if matches!(link.result.status, LinkStatus::Viable | LinkStatus::Degraded) {
            scores[link.node_a] += 1;
            scores[link.node_b] += 1;
        }
    }
    scores
}
