//! Service manifest parsing and validation
//!
//! Parses the declarative service manifest (`service.yml`): one provider
//! block of service-wide defaults plus a map of named functions, each of
//! which may override those defaults. Validation happens here, before
//! resolution — the resolver itself never fails.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Errors that can occur when loading or validating a service manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Manifest file not found: {0}")]
    NotFound(PathBuf),

    #[error("No function named '{0}' in manifest")]
    UnknownFunction(String),
}

/// Memory size bounds in MB
pub const MEMORY_SIZE_MIN: u32 = 128;
pub const MEMORY_SIZE_MAX: u32 = 10240;

/// Maximum function timeout in seconds
pub const TIMEOUT_MAX: u32 = 900;

/// VPC placement for a function
///
/// Resolved as one atomic block: a function-level vpc replaces the
/// provider-level vpc wholesale, never element-wise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcConfig {
    /// Security group ids to attach
    #[serde(default)]
    pub security_group_ids: Vec<String>,

    /// Subnets the function runs in (at least one required)
    #[serde(default)]
    pub subnet_ids: Vec<String>,
}

/// A single IAM policy statement attached at the service level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IamStatement {
    /// "Allow" or "Deny"
    pub effect: String,

    /// Actions covered by this statement
    #[serde(default)]
    pub action: Vec<String>,

    /// Resources covered by this statement
    #[serde(default)]
    pub resource: Vec<String>,
}

/// Service-wide defaults (the `provider` block)
///
/// Every field is optional; anything left unset falls through to the
/// built-in defaults during resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Default runtime identifier (e.g., "nodejs20.x")
    pub runtime: Option<String>,

    /// Default memory size in MB
    pub memory_size: Option<u32>,

    /// Default timeout in seconds
    pub timeout: Option<u32>,

    /// Deployment stage (e.g., "dev", "prod")
    pub stage: Option<String>,

    /// Deployment region
    pub region: Option<String>,

    /// Default execution role ARN
    pub role: Option<String>,

    /// Environment variables shared by all functions
    #[serde(default)]
    pub environment: BTreeMap<String, String>,

    /// Tags applied to all functions
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    /// Default VPC placement
    pub vpc: Option<VpcConfig>,

    /// IAM statements attached to every function that does not
    /// override `role`
    #[serde(default)]
    pub iam_role_statements: Vec<IamStatement>,

    /// Whether to publish a new version on each deploy
    pub version_functions: Option<bool>,
}

/// Per-function configuration (one entry in the `functions` map)
///
/// Mirrors the provider keys; present keys override, absent keys inherit.
/// Only `handler` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionConfig {
    /// Code entry point (e.g., "handler.run")
    #[serde(default)]
    pub handler: String,

    /// Human-readable description
    pub description: Option<String>,

    /// Runtime override
    pub runtime: Option<String>,

    /// Memory size override in MB
    pub memory_size: Option<u32>,

    /// Timeout override in seconds
    pub timeout: Option<u32>,

    /// Execution role override; suppresses inherited iam statements
    pub role: Option<String>,

    /// Environment variables merged on top of the provider's
    #[serde(default)]
    pub environment: BTreeMap<String, String>,

    /// Tags merged on top of the provider's
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    /// VPC override (replaces the provider block wholesale)
    pub vpc: Option<VpcConfig>,

    /// Per-function versioning override
    pub version_functions: Option<bool>,
}

/// The parsed service manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceManifest {
    /// Service name (shared prefix for all deployed functions)
    pub service: String,

    /// Service-wide defaults
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Named functions
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionConfig>,

    /// SHA-256 of the raw manifest bytes when loaded from a file
    #[serde(skip)]
    pub source_digest: Option<String>,
}

impl ServiceManifest {
    /// Load and parse a manifest from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes).map_err(|e| {
            ManifestError::Validation(format!("Manifest is not valid UTF-8: {}", e))
        })?;

        let mut manifest = Self::from_str(&contents)?;
        manifest.source_digest = Some(digest);
        Ok(manifest)
    }

    /// Parse a manifest from a YAML string
    pub fn from_str(s: &str) -> Result<Self, ManifestError> {
        let manifest: ServiceManifest = serde_yaml::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Look up a function by name
    pub fn function(&self, name: &str) -> Result<&FunctionConfig, ManifestError> {
        self.functions
            .get(name)
            .ok_or_else(|| ManifestError::UnknownFunction(name.to_string()))
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.service.is_empty() {
            return Err(ManifestError::Validation(
                "Service name must not be empty".to_string(),
            ));
        }
        validate_name("service", &self.service)?;

        if let Some(vpc) = &self.provider.vpc {
            validate_vpc("provider", vpc)?;
        }
        validate_bounds("provider", self.provider.memory_size, self.provider.timeout)?;

        for statement in &self.provider.iam_role_statements {
            if statement.effect != "Allow" && statement.effect != "Deny" {
                return Err(ManifestError::Validation(format!(
                    "Invalid iam statement effect '{}': must be 'Allow' or 'Deny'",
                    statement.effect
                )));
            }
        }

        for (name, function) in &self.functions {
            validate_name("function", name)?;

            if function.handler.is_empty() {
                return Err(ManifestError::Validation(format!(
                    "Function '{}': missing required field 'handler'",
                    name
                )));
            }

            validate_bounds(name, function.memory_size, function.timeout)?;

            if let Some(vpc) = &function.vpc {
                validate_vpc(name, vpc)?;
            }
        }

        Ok(())
    }
}

/// Names must start with a letter and contain only letters, digits, and '-'
fn validate_name(kind: &str, name: &str) -> Result<(), ManifestError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            first.is_ascii_alphabetic()
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
        }
        None => false,
    };

    if !valid {
        return Err(ManifestError::Validation(format!(
            "Invalid {} name '{}': must start with a letter and contain only letters, digits, and '-'",
            kind, name
        )));
    }

    Ok(())
}

fn validate_bounds(
    scope: &str,
    memory_size: Option<u32>,
    timeout: Option<u32>,
) -> Result<(), ManifestError> {
    if let Some(memory) = memory_size {
        if !(MEMORY_SIZE_MIN..=MEMORY_SIZE_MAX).contains(&memory) {
            return Err(ManifestError::Validation(format!(
                "'{}': memorySize must be in [{}, {}], got {}",
                scope, MEMORY_SIZE_MIN, MEMORY_SIZE_MAX, memory
            )));
        }
    }

    if let Some(timeout) = timeout {
        if timeout == 0 || timeout > TIMEOUT_MAX {
            return Err(ManifestError::Validation(format!(
                "'{}': timeout must be in (0, {}], got {}",
                scope, TIMEOUT_MAX, timeout
            )));
        }
    }

    Ok(())
}

fn validate_vpc(scope: &str, vpc: &VpcConfig) -> Result<(), ManifestError> {
    if vpc.subnet_ids.is_empty() {
        return Err(ManifestError::Validation(format!(
            "'{}': vpc block must list at least one subnet",
            scope
        )));
    }
    Ok(())
}
