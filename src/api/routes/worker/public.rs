//! Public types for the worker API
use serde::{Deserialize, Serialize};

use crate::runtime::WorkerState;

#[derive(Serialize, Deserialize)]
pub struct WorkerStatus {
    pub state: WorkerState,
    pub cache_name: String,
}

#[derive(Serialize, Deserialize)]
pub struct ActivateResponse {
    pub state: WorkerState,
    pub deleted: Vec<String>,
}
