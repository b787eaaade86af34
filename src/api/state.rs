use crate::core::AppConfig;
use crate::host::Host;
use crate::runtime::WorkerHandle;

pub struct AppState {
    pub worker: WorkerHandle,
    pub host: Host,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(worker: WorkerHandle, host: Host, config: AppConfig) -> Self {
        Self {
            worker,
            host,
            config,
        }
    }
}
