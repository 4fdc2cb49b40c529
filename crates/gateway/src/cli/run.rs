//! `concierge run`: one-shot execution.
//!
//! Sends a single message through the same pipeline the server uses, prints
//! the reply and exits. The session id goes to stderr so scripts can pass
//! it back with `--session` while stdout stays clean.

use std::sync::Arc;

use cg_domain::config::Config;
use cg_sessions::resolve_session_id;

use crate::bootstrap;

pub async fn run(
    config: Arc<Config>,
    message: String,
    session: Option<String>,
    json_output: bool,
) -> anyhow::Result<()> {
    if message.trim().is_empty() {
        anyhow::bail!("message must not be empty");
    }

    let state = bootstrap::build_app_state(config)?;
    let (session_id, _) = resolve_session_id(session.as_deref());

    let reply = state.pipeline.handle(&session_id, &message).await;

    if json_output {
        let json = serde_json::to_string_pretty(&reply)
            .map_err(|e| anyhow::anyhow!("serializing reply: {e}"))?;
        println!("{json}");
    } else {
        println!("{}", reply.message);
        eprintln!(
            "\x1b[2m[session {} | {} | {}]\x1b[0m",
            reply.session_id,
            reply.language.detected,
            reply.source.as_str()
        );
    }

    Ok(())
}
