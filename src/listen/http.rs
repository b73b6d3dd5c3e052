use std::time::Duration;

use serde::Serialize;
use ureq::Agent;

use super::types::{ListenError, ListenRecorder};
use crate::config::RpcSettings;

/// Posts listens to the backend RPC layer (`{base_url}/rpc/record_listen`).
pub struct HttpListenRecorder {
    agent: Agent,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ListenPayload<'a> {
    track_id: &'a str,
}

impl HttpListenRecorder {
    pub fn new(settings: &RpcSettings) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_millis(settings.timeout_ms)))
            .build();
        Self {
            agent: config.into(),
            endpoint: endpoint_url(&settings.base_url),
            api_key: settings.api_key.clone(),
        }
    }
}

impl ListenRecorder for HttpListenRecorder {
    fn record_listen(&self, track_id: &str) -> Result<(), ListenError> {
        let mut request = self.agent.post(&self.endpoint);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }
        request
            .send_json(ListenPayload { track_id })
            .map_err(|err| match err {
                ureq::Error::StatusCode(code) => {
                    ListenError::Remote(format!("status code {code}"))
                }
                other => ListenError::Transport(other.to_string()),
            })?;
        Ok(())
    }
}

pub(crate) fn endpoint_url(base_url: &str) -> String {
    format!("{}/rpc/record_listen", base_url.trim_end_matches('/'))
}
