//! DOMBlaster
//!
//! Chainable selection groups over a `blaster-dom` document.
//!
//! A [`Blaster`] owns the extension registry. Binding it to a document
//! yields a [`Dom`] context that resolves selectors into [`Group`]s and
//! dispatches named operations over them.
//!
//! # Example
//! ```rust,ignore
//! use blaster::{Arg, Blaster, BlasterConfig};
//!
//! let blaster = Blaster::with_config(BlasterConfig::default())?;
//! let mut document = blaster::html::parse(r#"<p class="note">hi</p>"#)?;
//! let mut dom = blaster.bind(&mut document);
//!
//! let notes = dom.select("p.note", false);
//! dom.call(&notes, "addClass", &[Arg::from("seen")])?;
//! let text = dom.call(&notes, "text", &[])?;
//! ```

mod config;
mod context;
mod error;
mod ext;
mod group;
mod registry;
mod selector;
mod value;
pub mod util;

pub use config::BlasterConfig;
pub use context::Dom;
pub use error::{BlasterError, BlasterResult};
pub use group::Group;
pub use registry::{Blaster, ElementFn, Extension, ExtensionModule, GroupFn};
pub use selector::Selector;
pub use value::{Arg, Callback, Value};

// Re-export sub-crates for advanced usage
pub use blaster_css as css;
pub use blaster_dom as dom;
pub use blaster_html as html;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
