//! Selection-layer errors

use blaster_css::CssError;
use blaster_dom::DomError;
use blaster_html::ParseError;

use crate::ExtensionModule;

/// Result type for extension calls
pub type BlasterResult<T> = Result<T, BlasterError>;

/// Errors raised by the registry and the built-in extensions
#[derive(Debug, thiserror::Error)]
pub enum BlasterError {
    /// An argument had a shape the operation refuses to coerce
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A module was loaded before the module it builds on
    #[error("Module '{module}' requires module '{requires}' to be loaded first")]
    MissingDependency {
        module: ExtensionModule,
        requires: ExtensionModule,
    },

    /// No extension is registered under this name
    #[error("Unknown extension: {0}")]
    UnknownExtension(String),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Css(#[from] CssError),

    #[error(transparent)]
    Html(#[from] ParseError),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
