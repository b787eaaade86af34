use anyhow::Result;

use super::init_tracing;
use crate::core::AppConfig;
use crate::host::Host;
use crate::runtime::WorkerHandle;

/// Run a push message through a freshly registered worker and print
/// the notification that would be shown.
pub async fn run(payload: Option<String>, config: &AppConfig) -> Result<()> {
    init_tracing();

    let host = Host::from_config(config).await?;
    let worker = WorkerHandle::spawn(config.worker_config(), host.services());
    worker.register().await?;

    let notification = worker.push(payload.map(String::into_bytes)).await?;
    println!("{}", serde_json::to_string_pretty(&notification)?);

    Ok(())
}
