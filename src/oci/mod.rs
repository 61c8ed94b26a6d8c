// ABOUTME: OCI runtime-spec documents and translation from sandbox records.
// ABOUTME: Exposes OciConfig, OciState, and the two translation functions.

mod config;
mod convert;
mod state;

pub use config::{Linux, Mount, OciConfig, Resources};
pub use convert::{
    AnnotationTranslator, BUNDLE_PATH_ANNOTATION, CONFIG_JSON_ANNOTATION, OciTranslator,
    TranslationError, phase_to_oci_status, sandbox_to_oci_config, status_to_oci_state,
};
pub use state::{OCI_VERSION, OciState, OciStatus};
