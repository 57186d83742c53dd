//! Extension registry

use std::fmt;
use std::rc::Rc;

use blaster_dom::{Document, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Arg, BlasterConfig, BlasterError, BlasterResult, Dom, Group, Value, ext};

/// Per-element operation; `Some` ends the dispatch with that value
pub type ElementFn = Rc<dyn Fn(&mut Dom<'_>, NodeId, &[Arg]) -> BlasterResult<Option<Value>>>;

/// Operation over a whole group
pub type GroupFn = Rc<dyn Fn(&mut Dom<'_>, &Group, &[Arg]) -> BlasterResult<Value>>;

/// Registered operation
#[derive(Clone)]
pub enum Extension {
    Element(ElementFn),
    Group(GroupFn),
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extension::Element(_) => f.write_str("Extension::Element"),
            Extension::Group(_) => f.write_str("Extension::Group"),
        }
    }
}

/// Optional bundles of extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionModule {
    Attributes,
    Css,
    Dom,
    Event,
    EventForm,
    EventKeyboard,
    EventMouse,
    Forms,
}

impl ExtensionModule {
    /// Every module, prerequisites first
    pub const ALL: [ExtensionModule; 8] = [
        ExtensionModule::Attributes,
        ExtensionModule::Css,
        ExtensionModule::Dom,
        ExtensionModule::Event,
        ExtensionModule::EventForm,
        ExtensionModule::EventKeyboard,
        ExtensionModule::EventMouse,
        ExtensionModule::Forms,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExtensionModule::Attributes => "attributes",
            ExtensionModule::Css => "css",
            ExtensionModule::Dom => "dom",
            ExtensionModule::Event => "event",
            ExtensionModule::EventForm => "eventform",
            ExtensionModule::EventKeyboard => "eventkeyboard",
            ExtensionModule::EventMouse => "eventmouse",
            ExtensionModule::Forms => "forms",
        }
    }

    /// Module that must be loaded first
    pub fn requires(self) -> Option<ExtensionModule> {
        match self {
            ExtensionModule::EventForm | ExtensionModule::EventKeyboard | ExtensionModule::EventMouse => {
                Some(ExtensionModule::Event)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ExtensionModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owner of the extension table and the set of loaded modules
pub struct Blaster {
    extensions: IndexMap<String, Extension>,
    modules: Vec<ExtensionModule>,
    skip_unmet_dependencies: bool,
}

impl Blaster {
    /// Registry holding only the core operations
    pub fn new() -> Self {
        let mut blaster = Self {
            extensions: IndexMap::new(),
            modules: Vec::new(),
            skip_unmet_dependencies: false,
        };
        ext::builtin::register(&mut blaster);
        blaster
    }

    /// Registry with every module loaded
    pub fn full() -> Self {
        let mut blaster = Self::new();
        for module in ExtensionModule::ALL {
            blaster.install(module);
        }
        blaster
    }

    /// Registry with the configured modules loaded in order
    pub fn with_config(config: BlasterConfig) -> BlasterResult<Self> {
        let mut blaster = Self::new();
        blaster.skip_unmet_dependencies = config.skip_unmet_dependencies;
        for module in config.modules {
            blaster.load(module)?;
        }
        tracing::debug!(modules = ?blaster.modules, extensions = blaster.extensions.len(), "registry ready");
        Ok(blaster)
    }

    /// Register a per-element operation, replacing any previous `name`
    pub fn extend(
        &mut self,
        name: &str,
        f: impl Fn(&mut Dom<'_>, NodeId, &[Arg]) -> BlasterResult<Option<Value>> + 'static,
    ) {
        self.register(name, Extension::Element(Rc::new(f)));
    }

    /// Register a group-level operation, replacing any previous `name`
    pub fn extend_group(
        &mut self,
        name: &str,
        f: impl Fn(&mut Dom<'_>, &Group, &[Arg]) -> BlasterResult<Value> + 'static,
    ) {
        self.register(name, Extension::Group(Rc::new(f)));
    }

    pub fn extension(&self, name: &str) -> Option<&Extension> {
        self.extensions.get(name)
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    /// Registered names in registration order
    pub fn extension_names(&self) -> impl Iterator<Item = &str> {
        self.extensions.keys().map(String::as_str)
    }

    /// Load a module.
    ///
    /// Returns `Ok(false)` when the module was skipped because its
    /// prerequisite is missing and the registry is configured to skip.
    pub fn load(&mut self, module: ExtensionModule) -> BlasterResult<bool> {
        if let Some(requires) = module.requires().filter(|&r| !self.has_module(r)) {
            if self.skip_unmet_dependencies {
                tracing::warn!(%module, %requires, "skipping module with unmet prerequisite");
                return Ok(false);
            }
            return Err(BlasterError::MissingDependency { module, requires });
        }
        self.install(module);
        Ok(true)
    }

    pub fn has_module(&self, module: ExtensionModule) -> bool {
        self.modules.contains(&module)
    }

    /// Loaded modules in load order
    pub fn modules(&self) -> &[ExtensionModule] {
        &self.modules
    }

    /// Bind the registry to a document
    pub fn bind<'d>(&'d self, document: &'d mut Document) -> Dom<'d> {
        Dom::new(self, document)
    }

    fn install(&mut self, module: ExtensionModule) {
        ext::install(self, module);
        if !self.has_module(module) {
            self.modules.push(module);
        }
        tracing::debug!(%module, "loaded module");
    }

    fn register(&mut self, name: &str, extension: Extension) {
        if self.extensions.insert(name.to_string(), extension).is_some() {
            tracing::debug!(name, "extension overwritten");
        }
    }
}

impl Default for Blaster {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Blaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blaster")
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .field("modules", &self.modules)
            .finish()
    }
}
