//! sls-config - serverless function configuration resolver
//!
//! This crate loads a declarative service manifest (`service.yml`) and
//! resolves the effective deployment configuration for each function:
//! service-wide provider defaults overlaid by per-function overrides,
//! backstopped by built-in default constants.

pub mod manifest;
pub mod resolve;

pub use manifest::{
    FunctionConfig, IamStatement, ManifestError, ProviderConfig, ServiceManifest, VpcConfig,
};
pub use resolve::{resolve, resolve_all, BuiltinDefaults, EffectiveConfig, ValueOrigin};
