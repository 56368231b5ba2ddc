//! Report commands.

use std::sync::Arc;

use base64::Engine;
use chrono::Utc;
use serde_json::{json, Value};

use cap_service::{MemorySink, ReportSink};
use cap_types::RequesterIdentity;

use super::{str_param, typed_param, Result};
use crate::rpc::RpcError;
use crate::DaemonState;

/// Render a city's inventory report.
///
/// The PDF is returned base64-encoded and, when `reports.output_dir` is
/// configured, also written there.
pub async fn generate_report(state: &Arc<DaemonState>, params: &Value) -> Result {
    let city = str_param(params, "city")?;
    let requester: RequesterIdentity = typed_param(params, "requester")?;

    let mut memory = MemorySink::new();
    let filename = {
        let store = state.store.lock().await;
        cap_service::request_report(&store, city, &requester, &mut memory, Utc::now())?
    };
    let (_, pdf) = memory
        .take_last()
        .ok_or_else(|| RpcError::internal_error("report was not delivered"))?;

    if let Some(sink) = &state.report_sink {
        sink.clone().accept(&filename, &pdf)?;
    }

    Ok(json!({
        "filename": filename,
        "bytes": pdf.len(),
        "pdf_base64": base64::engine::general_purpose::STANDARD.encode(&pdf),
    }))
}
