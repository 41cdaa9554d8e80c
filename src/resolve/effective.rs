//! Effective configuration with provenance
//!
//! The effective config is the fully resolved record for one function:
//! every defaulted field holds a concrete value, and each scalar field
//! records which layer it came from.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::manifest::{
    FunctionConfig, IamStatement, ProviderConfig, ServiceManifest, VpcConfig,
};

use super::defaults::BuiltinDefaults;
use super::merge::merge_maps;

/// Schema version for the effective config record
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "sls-config/effective_config@1";

/// Which layer a resolved value came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueOrigin {
    Default,
    Provider,
    Function,
}

/// Per-field provenance for the scalar fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOrigins {
    pub runtime: ValueOrigin,
    pub memory_size: ValueOrigin,
    pub timeout: ValueOrigin,
    pub description: ValueOrigin,
    pub role: ValueOrigin,
    pub vpc: ValueOrigin,
    pub version_functions: ValueOrigin,
    pub stage: ValueOrigin,
    pub region: ValueOrigin,
}

/// Fully resolved configuration for one function
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this config was resolved
    pub resolved_at: DateTime<Utc>,

    /// Function name from the manifest (set when resolving a manifest)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,

    /// Deployed name: `{service}-{stage}-{function}` (set when resolving
    /// a manifest)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployed_name: Option<String>,

    /// SHA-256 of the manifest file this was resolved from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_digest: Option<String>,

    /// Code entry point
    pub handler: String,

    /// Resolved runtime identifier
    pub runtime: String,

    /// Resolved memory size in MB
    pub memory_size: u32,

    /// Resolved timeout in seconds
    pub timeout: u32,

    /// Description, if either layer set one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Execution role, if either layer set one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Merged environment variables
    pub environment: BTreeMap<String, String>,

    /// Merged tags
    pub tags: BTreeMap<String, String>,

    /// VPC placement, if either layer set one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc: Option<VpcConfig>,

    /// IAM statements inherited from the service level; empty when the
    /// function overrides `role`
    pub iam_role_statements: Vec<IamStatement>,

    /// Resolved versioning flag
    pub version_functions: bool,

    /// Resolved stage
    pub stage: String,

    /// Resolved region
    pub region: String,

    /// Where each scalar value came from
    pub origins: FieldOrigins,
}

/// Resolve one function against the provider defaults.
///
/// Pure: no I/O, no shared state. Cannot fail — an empty provider and an
/// empty function resolve to the built-in defaults.
pub fn resolve(provider: &ProviderConfig, function: &FunctionConfig) -> EffectiveConfig {
    let defaults = BuiltinDefaults::default();

    let (runtime, runtime_origin) = pick(
        function.runtime.clone(),
        provider.runtime.clone(),
        defaults.runtime,
    );
    let (memory_size, memory_origin) =
        pick(function.memory_size, provider.memory_size, defaults.memory_size);
    let (timeout, timeout_origin) =
        pick(function.timeout, provider.timeout, defaults.timeout);
    let (version_functions, version_origin) = pick(
        function.version_functions,
        provider.version_functions,
        defaults.version_functions,
    );
    let (stage, stage_origin) = pick(None, provider.stage.clone(), defaults.stage);
    let (region, region_origin) = pick(None, provider.region.clone(), defaults.region);

    let (description, description_origin) = pick_optional(function.description.clone(), None);
    let (vpc, vpc_origin) = pick_optional(function.vpc.clone(), provider.vpc.clone());

    // A function-level role replaces the inherited one and detaches the
    // service-level iam statements from this function.
    let (role, role_origin, iam_role_statements) = if function.role.is_some() {
        (function.role.clone(), ValueOrigin::Function, Vec::new())
    } else if provider.role.is_some() {
        (
            provider.role.clone(),
            ValueOrigin::Provider,
            provider.iam_role_statements.clone(),
        )
    } else {
        (None, ValueOrigin::Default, provider.iam_role_statements.clone())
    };

    EffectiveConfig {
        schema_version: SCHEMA_VERSION,
        schema_id: SCHEMA_ID.to_string(),
        resolved_at: Utc::now(),
        function_name: None,
        deployed_name: None,
        source_digest: None,
        handler: function.handler.clone(),
        runtime,
        memory_size,
        timeout,
        description,
        role,
        environment: merge_maps(&provider.environment, &function.environment),
        tags: merge_maps(&provider.tags, &function.tags),
        vpc,
        iam_role_statements,
        version_functions,
        stage,
        region,
        origins: FieldOrigins {
            runtime: runtime_origin,
            memory_size: memory_origin,
            timeout: timeout_origin,
            description: description_origin,
            role: role_origin,
            vpc: vpc_origin,
            version_functions: version_origin,
            stage: stage_origin,
            region: region_origin,
        },
    }
}

/// Resolve every function in a manifest, keyed by function name.
pub fn resolve_all(manifest: &ServiceManifest) -> BTreeMap<String, EffectiveConfig> {
    manifest
        .functions
        .iter()
        .map(|(name, function)| {
            let config = resolve(&manifest.provider, function)
                .named(&manifest.service, name)
                .with_source_digest(manifest.source_digest.clone());
            (name.clone(), config)
        })
        .collect()
}

impl EffectiveConfig {
    /// Attach the manifest context: function name and deployed name
    pub fn named(mut self, service: &str, function: &str) -> Self {
        self.deployed_name = Some(format!("{}-{}-{}", service, self.stage, function));
        self.function_name = Some(function.to_string());
        self
    }

    /// Attach the manifest source digest
    pub fn with_source_digest(mut self, digest: Option<String>) -> Self {
        self.source_digest = digest;
        self
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Function value wins, else provider, else the built-in default.
fn pick<T>(function: Option<T>, provider: Option<T>, default: T) -> (T, ValueOrigin) {
    match (function, provider) {
        (Some(value), _) => (value, ValueOrigin::Function),
        (None, Some(value)) => (value, ValueOrigin::Provider),
        (None, None) => (default, ValueOrigin::Default),
    }
}

/// Same precedence for fields with no built-in fallback.
fn pick_optional<T>(function: Option<T>, provider: Option<T>) -> (Option<T>, ValueOrigin) {
    match (function, provider) {
        (Some(value), _) => (Some(value), ValueOrigin::Function),
        (None, Some(value)) => (Some(value), ValueOrigin::Provider),
        (None, None) => (None, ValueOrigin::Default),
    }
}
