//! Credential types

use reqwest::RequestBuilder;

/// Credentials attached to every request of a client
#[derive(Clone)]
pub enum AuthConfig {
    /// Key sent as a query parameter (TMDB `api_key`, OMDb `apikey`)
    QueryKey {
        /// Parameter name
        param: String,
        /// The key
        value: String,
    },

    /// Service-role key for a PostgREST gateway
    ServiceRole {
        /// Sent as `apikey` and as bearer token
        key: String,
    },
}

impl AuthConfig {
    /// API key passed as a query parameter
    pub fn query_key(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::QueryKey {
            param: param.into(),
            value: value.into(),
        }
    }

    /// Service-role key
    pub fn service_role(key: impl Into<String>) -> Self {
        Self::ServiceRole { key: key.into() }
    }

    /// Sign a request
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Self::QueryKey { param, value } => req.query(&[(param.as_str(), value.as_str())]),
            Self::ServiceRole { key } => req.header("apikey", key.as_str()).bearer_auth(key),
        }
    }
}

// Keys never end up in logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QueryKey { param, .. } => f
                .debug_struct("QueryKey")
                .field("param", param)
                .finish_non_exhaustive(),
            Self::ServiceRole { .. } => f.debug_struct("ServiceRole").finish_non_exhaustive(),
        }
    }
}
