//! Deployment configuration
//!
//! Every parameter has a compiled-in default matching the original
//! deployment of the downloader, so `deltadeploy deploy` works with no
//! arguments. A YAML file can override any subset of them.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::Result;

use crate::core::names::NONCE_LEN;

/// Runtime stacks `az functionapp create` accepts
const KNOWN_STACKS: &[&str] = &["python", "node", "dotnet-isolated", "java", "powershell"];

/// Digits in a unix timestamp for the foreseeable future
const TIMESTAMP_LEN: usize = 10;

/// Top-level deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Resource group that scopes everything the run creates
    #[serde(default = "default_resource_group")]
    pub resource_group: String,

    /// Azure region for all resources
    #[serde(default = "default_location")]
    pub location: String,

    /// Prefix for the generated storage account name
    #[serde(default = "default_storage_prefix")]
    pub storage_prefix: String,

    /// Prefix for the generated function app name
    #[serde(default = "default_app_prefix")]
    pub app_prefix: String,

    /// Language runtime of the function app
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Readiness wait policy between provisioning and publish
    #[serde(default)]
    pub readiness: ReadinessConfig,

    /// Overrides for the external tool executables
    #[serde(default)]
    pub tools: ToolPaths,

    /// Timeout for each external command (in seconds)
    #[serde(default = "default_step_timeout_secs")]
    pub step_timeout_secs: u64,
}

/// Function app runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Language stack ("python", "node", ...)
    #[serde(default = "default_stack")]
    pub stack: String,

    /// Language runtime version
    #[serde(default = "default_runtime_version")]
    pub version: String,

    /// Functions platform version
    #[serde(default = "default_functions_version")]
    pub functions_version: String,

    /// Operating system family
    #[serde(default = "default_os")]
    pub os: String,
}

/// Poll policy for the post-provisioning readiness wait
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Seconds between state probes
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Give up waiting (and proceed to publish) after this many seconds
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
}

/// Paths to the external executables, when not on PATH
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolPaths {
    /// Azure CLI executable
    #[serde(default)]
    pub az: Option<String>,

    /// Azure Functions Core Tools executable
    #[serde(default)]
    pub func: Option<String>,
}

fn default_resource_group() -> String {
    "deltashare-rg".to_string()
}

fn default_location() -> String {
    "eastus".to_string()
}

fn default_storage_prefix() -> String {
    "deltashare".to_string()
}

fn default_app_prefix() -> String {
    "deltashare-func".to_string()
}

fn default_stack() -> String {
    "python".to_string()
}

fn default_runtime_version() -> String {
    "3.11".to_string()
}

fn default_functions_version() -> String {
    "4".to_string()
}

fn default_os() -> String {
    "linux".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_max_wait_secs() -> u64 {
    180
}

fn default_step_timeout_secs() -> u64 {
    900
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack: default_stack(),
            version: default_runtime_version(),
            functions_version: default_functions_version(),
            os: default_os(),
        }
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            max_wait_secs: default_max_wait_secs(),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            resource_group: default_resource_group(),
            location: default_location(),
            storage_prefix: default_storage_prefix(),
            app_prefix: default_app_prefix(),
            runtime: RuntimeConfig::default(),
            readiness: ReadinessConfig::default(),
            tools: ToolPaths::default(),
            step_timeout_secs: default_step_timeout_secs(),
        }
    }
}

impl DeployConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: DeployConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            anyhow::bail!("Location must not be empty");
        }

        if self.resource_group.trim().is_empty() {
            anyhow::bail!("Resource group name must not be empty");
        }

        let storage_re = Regex::new(r"^[a-z][a-z0-9]*$").expect("static regex");
        if !storage_re.is_match(&self.storage_prefix) {
            anyhow::bail!(
                "Storage prefix '{}' must be lowercase letters and digits",
                self.storage_prefix
            );
        }

        // Generated name is prefix + timestamp + nonce and must fit the
        // 24-character storage account limit
        if self.storage_prefix.len() + TIMESTAMP_LEN + NONCE_LEN > 24 {
            anyhow::bail!(
                "Storage prefix '{}' is too long: generated names would exceed 24 characters",
                self.storage_prefix
            );
        }

        let app_re = Regex::new(r"^[a-z][a-z0-9-]*$").expect("static regex");
        if !app_re.is_match(&self.app_prefix) {
            anyhow::bail!(
                "App prefix '{}' must be lowercase letters, digits and hyphens",
                self.app_prefix
            );
        }

        if !KNOWN_STACKS.contains(&self.runtime.stack.as_str()) {
            anyhow::bail!(
                "Unknown runtime stack '{}' (expected one of: {})",
                self.runtime.stack,
                KNOWN_STACKS.join(", ")
            );
        }

        Ok(())
    }

    /// Build a deployment plan with freshly minted resource names
    pub fn to_plan(&self) -> crate::core::plan::DeploymentPlan {
        let names = crate::core::names::ResourceNames::fresh(self);
        crate::core::plan::DeploymentPlan::new(self.clone(), names)
    }
}
