use crate::config::Config;
use crate::encoding::encode_body;
use crate::errors::{GatewayError, HandlerBody};
use crate::metrics_defs::{CONFIGS_SELECTED, CONFIGS_SKIPPED, REQUEST_DURATION, REQUESTS};
use crate::sampler::{Shuffler, shuffler_for_seed};
use hyper::{Request, Response, StatusCode};
use kv::KvStore;
use shared::http::make_text_response;
use shared::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;

/// Every subscription URL starts with this prefix.
pub const SUBSCRIPTION_PREFIX: &str = "/sub/";

// Last path segment of a URL that stops right at the prefix.
const RESERVED_TOKEN: &str = "sub";

fn is_single_dot(segment: &str) -> bool {
    segment == "." || segment.eq_ignore_ascii_case("%2e")
}

fn is_double_dot(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        ".." | ".%2e" | "%2e." | "%2e%2e"
    )
}

/// Removes `.` and `..` segments from an absolute path, the way URL parsers
/// do. A dot segment in last position leaves a trailing slash behind.
pub fn normalize_path(path: &str) -> String {
    let Some(rest) = path.strip_prefix('/') else {
        return path.to_string();
    };

    let segments: Vec<&str> = rest.split('/').collect();
    let last = segments.len() - 1;
    let mut output: Vec<&str> = Vec::with_capacity(segments.len());

    for (i, segment) in segments.into_iter().enumerate() {
        if is_double_dot(segment) {
            output.pop();
            if i == last {
                output.push("");
            }
        } else if is_single_dot(segment) {
            if i == last {
                output.push("");
            }
        } else {
            output.push(segment);
        }
    }

    format!("/{}", output.join("/"))
}

/// Shortens a token for logs and error messages.
pub fn redact_token(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}***")
}

/// Extracts the subscription token from a request path.
///
/// The token is the last `/`-delimited segment. The prefix check runs first,
/// so a path outside `/sub/` is denied whatever its last segment is.
pub fn extract_token(path: &str) -> Result<&str, GatewayError> {
    if !path.starts_with(SUBSCRIPTION_PREFIX) {
        return Err(GatewayError::AccessDenied);
    }

    let token = path.rsplit('/').next().unwrap_or_default();
    if token.is_empty() || token == RESERVED_TOKEN {
        return Err(GatewayError::InvalidToken);
    }

    Ok(token)
}

/// Serves the subscription endpoint.
///
/// A request is authenticated against the user store, then a random subset
/// of at most `max_configs` entries of the config store is concatenated and
/// returned Base64 encoded. Both stores are only ever read.
pub struct SubscriptionHandler {
    users: Arc<dyn KvStore>,
    configs: Arc<dyn KvStore>,
    shuffler: Arc<dyn Shuffler>,
    max_configs: usize,
}

impl SubscriptionHandler {
    pub fn new(
        users: Arc<dyn KvStore>,
        configs: Arc<dyn KvStore>,
        shuffler: Arc<dyn Shuffler>,
        max_configs: usize,
    ) -> Self {
        SubscriptionHandler {
            users,
            configs,
            shuffler,
            max_configs,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.users.build(),
            config.configs.build(),
            shuffler_for_seed(config.sampling.seed),
            config.sampling.max_configs,
        )
    }

    pub fn is_ready(&self) -> bool {
        self.users.is_ready() && self.configs.is_ready()
    }

    /// Handles one request. The method and body are ignored.
    pub async fn handle<B>(&self, request: Request<B>) -> Response<HandlerBody> {
        let start = Instant::now();
        let (parts, _) = request.into_parts();

        let response = match self.resolve(parts.uri.path()).await {
            Ok(body) => make_text_response(StatusCode::OK, body),
            Err(err) => {
                if err.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!(error = %err, "Failed to serve subscription");
                } else {
                    tracing::debug!(reason = %err, "Rejected request");
                }
                err.into_response()
            }
        };

        let status = response.status().as_u16().to_string();
        histogram!(REQUEST_DURATION, "status" => status.clone())
            .record(start.elapsed().as_secs_f64());
        counter!(REQUESTS, "status" => status).increment(1);

        response
    }

    /// Resolves a request path to the Base64 encoded subscription body.
    pub async fn resolve(&self, path: &str) -> Result<String, GatewayError> {
        let path = normalize_path(path);
        let token = extract_token(&path)?;

        // Store errors may name the key, which is the token here
        let record = self.users.get(token).await.map_err(|err| {
            GatewayError::UserLookup(err.to_string().replace(token, &redact_token(token)))
        })?;

        // An empty record counts as no subscription
        if record.is_none_or(|record| record.is_empty()) {
            tracing::debug!(token = %redact_token(token), "Unknown subscription");
            return Err(GatewayError::InvalidSubscription);
        }

        // An unreachable config store is reported the same way as an empty one
        let keys = match self.configs.list().await {
            Ok(keys) if !keys.is_empty() => keys,
            Ok(_) => return Err(GatewayError::NoConfigsAvailable),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to list configs");
                return Err(GatewayError::NoConfigsAvailable);
            }
        };

        let selected = self.select(keys);
        let output = self.assemble(&selected).await?;

        Ok(encode_body(&output))
    }

    /// Shuffles the listed keys and keeps the first `max_configs`.
    pub fn select(&self, mut keys: Vec<String>) -> Vec<String> {
        self.shuffler.shuffle(&mut keys);
        keys.truncate(self.max_configs);
        keys
    }

    /// Fetches the selected configs in order and joins them, each followed by
    /// a newline. Entries without a value are left out.
    pub async fn assemble(&self, selected: &[String]) -> Result<String, GatewayError> {
        let mut output = String::new();
        let mut included = 0;

        for key in selected {
            match self.configs.get(key).await? {
                Some(value) if !value.is_empty() => {
                    output.push_str(&value);
                    output.push('\n');
                    included += 1;
                }
                _ => {
                    tracing::debug!(%key, "Selected config has no value, skipping");
                    counter!(CONFIGS_SKIPPED).increment(1);
                }
            }
        }

        histogram!(CONFIGS_SELECTED).record(included as f64);
        Ok(output)
    }
}
