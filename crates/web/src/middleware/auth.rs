use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use storage::RequestContext;

/// Bearer tokens, each bound to the user it acts as.
#[derive(Clone, Default)]
pub struct ApiKeys {
    keys: Arc<HashMap<String, i64>>,
}

impl ApiKeys {
    /// Parses `token:user_id,token:user_id`. Malformed entries are skipped.
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let keys = keys_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|entry| {
                let (token, user_id) = entry.rsplit_once(':')?;
                let user_id = user_id.trim().parse().ok();
                if user_id.is_none() {
                    tracing::warn!("Ignoring API key entry without a numeric user id");
                }
                Some((token.trim().to_string(), user_id?))
            })
            .filter(|(token, _)| !token.is_empty())
            .collect();

        Self {
            keys: Arc::new(keys),
        }
    }

    pub fn user_for(&self, token: &str) -> Option<i64> {
        self.keys.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Resolves the bearer token to a user and hands handlers an explicit
/// [`RequestContext`] through request extensions.
pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(user_id) = bearer_token(&request).and_then(|token| api_keys.user_for(token)) else {
        tracing::warn!("Invalid API key attempt");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid API key" })),
        )
            .into_response();
    };

    request.extensions_mut().insert(RequestContext::new(user_id));
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_token_user_pairs() {
        let keys = ApiKeys::from_comma_separated(" alpha:1, beta : 2 ,broken, gamma:x,:3");
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.user_for("alpha"), Some(1));
        assert_eq!(keys.user_for("beta"), Some(2));
        assert_eq!(keys.user_for("broken"), None);
        assert_eq!(keys.user_for("gamma"), None);
    }
}
