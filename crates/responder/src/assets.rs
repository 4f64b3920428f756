//! Files shipped with the package and embedded at compile time.

/// Default configuration, published to `config/responder.yaml`
pub const DEFAULT_CONFIG: &str = include_str!("../resources/config/responder.yaml");

/// Default English error messages, published to `resources/lang/en/errors.yaml`
pub const DEFAULT_ERRORS_LANG: &str = include_str!("../resources/lang/en/errors.yaml");

/// Template for `make:transformer`
pub const TRANSFORMER_STUB: &str = include_str!("../resources/stubs/transformer.rs.stub");

/// Namespace every responder config key lives under
pub const CONFIG_NAMESPACE: &str = "responder";

/// Application-relative path of the published config file
pub const CONFIG_TARGET: &str = "config/responder.yaml";

/// Application-relative path of the published English error messages
pub const LANG_TARGET: &str = "resources/lang/en/errors.yaml";
