//! Admin session commands.

use std::sync::Arc;

use serde_json::Value;

use cap_service::Session;

use super::{str_param, Result};
use crate::DaemonState;

/// Unlock admin writes on this connection.
pub async fn authenticate(state: &Arc<DaemonState>, session: &mut Session, params: &Value) -> Result {
    let secret = str_param(params, "secret")?;
    session.authenticate(secret, &state.config.auth.admin_secret)?;
    Ok(serde_json::json!({"authenticated": true}))
}

/// Drop admin rights on this connection.
pub async fn lock_session(session: &mut Session) -> Result {
    session.lock();
    Ok(serde_json::json!({"locked": true}))
}
