use std::sync::Arc;

use axum::{extract::State, response::Json};
use kinship_core::{EdgeRecord, InferenceResult, NodeRecord, RuleStore};
use serde::Deserialize;

pub struct AppState {
    pub rules: RuleStore,
}

/// Request body for `/api/infer`, shaped after the graph payload the
/// frontend already builds: a node list, an edge list, and the id pair
/// to resolve a title for.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferRequest {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    pub source_id: String,
    pub target_id: String,
}

pub async fn post_infer(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InferRequest>,
) -> Json<InferenceResult> {
    Json(kinship_core::infer(
        &request.nodes,
        &request.edges,
        &request.source_id,
        &request.target_id,
        &state.rules,
    ))
}
