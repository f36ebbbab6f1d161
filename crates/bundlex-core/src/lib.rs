//! Translates unified bundles into the phase-specific bundles that legacy
//! integration scripts expect, and legacy requests back into request options.

pub mod assembler;
pub mod bundle;
pub mod classifier;
pub mod credentials;
pub mod error;
pub mod fields;
pub mod sections;

pub use assembler::{assemble, assemble_json, LegacyBundle};
pub use bundle::{EventDescriptor, UnifiedBundle, UpstreamResponse};
pub use classifier::{classify, Category, ClassifiedEvent, HttpMethod, Phase, KNOWN_EVENTS};
pub use credentials::{load_config, resolve_credentials, ClientCredentials, EngineConfig};
pub use error::{BundleError, Result};
pub use sections::request::{restore_request, RestoredRequest};
