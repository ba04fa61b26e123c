//! Process configuration and the state shared by every request.

use crate::{
    cipher::{CipherError, CredentialCipher},
    session::{Clock, SystemClock},
    upstream::{GatewayClient, GatewayError},
};
use secrecy::SecretString;
use std::{fmt, sync::Arc, time::Duration};
use thiserror::Error;
use url::Url;

const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("upstream URL must use http or https, got {0}")]
    UpstreamScheme(String),
    #[error(transparent)]
    Key(#[from] CipherError),
    #[error("failed to build upstream client: {0}")]
    Gateway(#[from] GatewayError),
}

/// Read once at start-up, never mutated afterwards.
#[derive(Clone)]
pub struct ProcessConfig {
    upstream_base_url: Url,
    encryption_key: SecretString,
    upstream_timeout: Duration,
}

impl ProcessConfig {
    #[must_use]
    pub fn new(upstream_base_url: Url, encryption_key: SecretString) -> Self {
        Self {
            upstream_base_url,
            encryption_key,
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECONDS),
        }
    }

    #[must_use]
    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    #[must_use]
    pub fn upstream_base_url(&self) -> &Url {
        &self.upstream_base_url
    }

    #[must_use]
    pub fn encryption_key(&self) -> &SecretString {
        &self.encryption_key
    }

    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
    }
}

impl fmt::Debug for ProcessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessConfig")
            .field("upstream_base_url", &self.upstream_base_url.as_str())
            .field("encryption_key", &"***")
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}

pub struct AppState {
    gateway: GatewayClient,
    cipher: CredentialCipher,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Validate the configuration and build everything requests share.
    ///
    /// # Errors
    /// Returns an error for a non-http(s) upstream URL or an unusable key.
    pub fn from_config(config: &ProcessConfig) -> Result<Self, ConfigError> {
        let url = config.upstream_base_url();
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UpstreamScheme(url.scheme().to_string()));
        }
        let cipher = CredentialCipher::from_base64_key(config.encryption_key())?;
        let gateway = GatewayClient::new(url.clone(), config.upstream_timeout())?;
        Ok(Self::new(gateway, cipher, Arc::new(SystemClock)))
    }

    #[must_use]
    pub fn new(gateway: GatewayClient, cipher: CredentialCipher, clock: Arc<dyn Clock>) -> Self {
        Self {
            gateway,
            cipher,
            clock,
        }
    }

    #[must_use]
    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    #[must_use]
    pub fn cipher(&self) -> &CredentialCipher {
        &self.cipher
    }

    #[must_use]
    pub fn now(&self) -> i64 {
        self.clock.now()
    }
}
