use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::site::NodeConfig;

/// A prospective node site carried through the scoring pipeline.
///
/// The optional fields are filled in progressively: a freshly generated
/// candidate has only `node` set, then `prominence_m`, `fresnel_factor`, and
/// finally `score` are populated as the scoring pipeline runs. None of them
/// are guaranteed present until the stage that computes them has actually
/// been run on this candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub node: NodeConfig,
    pub elevation_m: Option<f32>,
    pub prominence_m: Option<f64>,
    pub fresnel_factor: Option<f64>,
    pub score: Option<f64>,
}

impl Candidate {
    pub fn new(node: NodeConfig) -> Self {
        Self {
            node,
            elevation_m: None,
            prominence_m: None,
            fresnel_factor: None,
            score: None,
        }
    }

    pub fn position(&self) -> Coordinate {
        self.node.position
    }
}

/// Per-candidate scoring weights for `ScoreCandidates`.
///
/// All three components are normalised to `[0, 1]` against the batch before
/// being combined, which is why the weights themselves need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub elevation: f64,
    pub prominence: f64,
    pub fresnel: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            elevation: 0.5,
            prominence: 0.3,
            fresnel: 0.2,
        }
    }
}
