//! Resource name generation
//!
//! Storage account and function app names must be globally unique within
//! Azure. Names are derived from a fixed prefix, the unix timestamp at
//! mint time, and a short random nonce so that two runs started within
//! the same second cannot collide.

use crate::core::config::DeployConfig;
use anyhow::Result;
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the random suffix appended to generated names
pub const NONCE_LEN: usize = 4;

/// Azure's storage account name limit
const STORAGE_NAME_MAX: usize = 24;

/// Azure's app service name limit
const APP_NAME_MAX: usize = 60;

/// The set of resource names for one deployment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNames {
    /// Resource group containing everything created by the run
    pub resource_group: String,

    /// Storage account backing the function app
    pub storage_account: String,

    /// Function app hosting the downloader endpoints
    pub function_app: String,
}

impl ResourceNames {
    /// Derive names from explicit inputs.
    ///
    /// Deterministic: the same (config, timestamp, nonce) always yields
    /// the same names.
    pub fn generate(config: &DeployConfig, timestamp: i64, nonce: &str) -> Self {
        ResourceNames {
            resource_group: config.resource_group.clone(),
            storage_account: format!("{}{}{}", config.storage_prefix, timestamp, nonce),
            function_app: format!("{}-{}-{}", config.app_prefix, timestamp, nonce),
        }
    }

    /// Mint a fresh set of names from the current clock and a random nonce
    pub fn fresh(config: &DeployConfig) -> Self {
        Self::generate(config, Utc::now().timestamp(), &fresh_nonce())
    }

    /// Base URL of the deployed app
    pub fn base_url(&self) -> String {
        format!("https://{}.azurewebsites.net", self.function_app)
    }

    /// Check the generated names against Azure's naming rules
    pub fn validate(&self) -> Result<()> {
        let storage_re = Regex::new(r"^[a-z][a-z0-9]*$").expect("static regex");
        if !storage_re.is_match(&self.storage_account) {
            anyhow::bail!(
                "Storage account name '{}' must be lowercase letters and digits",
                self.storage_account
            );
        }
        if self.storage_account.len() < 3 || self.storage_account.len() > STORAGE_NAME_MAX {
            anyhow::bail!(
                "Storage account name '{}' must be 3-{} characters",
                self.storage_account,
                STORAGE_NAME_MAX
            );
        }

        let app_re = Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$").expect("static regex");
        if !app_re.is_match(&self.function_app) {
            anyhow::bail!(
                "Function app name '{}' must be lowercase letters, digits and hyphens",
                self.function_app
            );
        }
        if self.function_app.len() > APP_NAME_MAX {
            anyhow::bail!(
                "Function app name '{}' exceeds {} characters",
                self.function_app,
                APP_NAME_MAX
            );
        }

        if self.resource_group.is_empty() {
            anyhow::bail!("Resource group name must not be empty");
        }

        Ok(())
    }
}

/// Random lowercase-hex nonce for name uniqueness
pub fn fresh_nonce() -> String {
    Uuid::new_v4().simple().to_string()[..NONCE_LEN].to_string()
}
