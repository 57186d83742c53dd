//! Inline style declarations
//!
//! The `style` attribute as an ordered declaration block. Attribute text
//! is parsed by lightningcss; edits made through [`InlineStyle::set`] keep
//! the caller's text.

use std::fmt;

use lightningcss::declaration::DeclarationBlock;
use lightningcss::stylesheet::{PrinterOptions, StyleAttribute};

use crate::stylesheet::parser_options;

/// CSS declaration (property: value)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    /// Parse `property: value [!important]`
    pub fn parse(text: &str) -> Option<Self> {
        let (property, value) = text.split_once(':')?;
        let property = property_name(property.trim());
        if property.is_empty() {
            return None;
        }
        let (value, important) = split_important(value.trim());
        if value.is_empty() {
            return None;
        }
        Some(Self {
            property,
            value: value.to_string(),
            important,
        })
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        f.write_str(";")
    }
}

fn split_important(value: &str) -> (&str, bool) {
    if let Some(bang) = value.rfind('!') {
        if value[bang + 1..].trim().eq_ignore_ascii_case("important") {
            return (value[..bang].trim_end(), true);
        }
    }
    (value, false)
}

/// Declarations of a parsed block, normal ones first.
///
/// Each property is printed back and re-read as a [`Declaration`], so
/// values carry lightningcss's serialization.
pub(crate) fn declarations_of(block: &DeclarationBlock<'_>) -> Vec<Declaration> {
    let normal = block.declarations.iter().map(|property| (property, false));
    let important = block.important_declarations.iter().map(|property| (property, true));
    normal
        .chain(important)
        .filter_map(|(property, important)| {
            match property.to_css_string(important, PrinterOptions::default()) {
                Ok(text) => Declaration::parse(&text),
                Err(err) => {
                    tracing::debug!(%err, "dropping unprintable declaration");
                    None
                }
            }
        })
        .collect()
}

/// Normalize a property name to its CSS form.
///
/// Accepts either the CSS spelling (`background-color`) or the
/// camelCase scripting spelling (`backgroundColor`, `cssFloat`,
/// `WebkitTransform`, `msTransform`). Custom properties are kept as-is.
pub fn property_name(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    if name == "cssFloat" {
        return "float".to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    let vendor_prefixed = name.starts_with(|c: char| c.is_ascii_uppercase())
        || (name.starts_with("ms") && name[2..].starts_with(|c: char| c.is_ascii_uppercase()));
    if vendor_prefixed {
        out.push('-');
    }
    for ch in name.chars() {
        if ch.is_ascii_uppercase() && !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
        out.push(ch.to_ascii_lowercase());
    }
    out
}

/// Parsed `style` attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<Declaration>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute value; malformed declarations are dropped
    pub fn parse(text: &str) -> Self {
        let mut style = Self::new();
        match StyleAttribute::parse(text, parser_options()) {
            Ok(attribute) => {
                for decl in declarations_of(&attribute.declarations) {
                    style.push(decl);
                }
            }
            Err(err) => tracing::debug!(%err, "dropping unparsable style attribute"),
        }
        style
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Value of a property (CSS or camelCase name)
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = property_name(name);
        self.declarations
            .iter()
            .find(|d| d.property == name)
            .map(|d| d.value.as_str())
    }

    /// Set a property; a trailing `!important` in `value` is honored and
    /// an empty value removes the property
    pub fn set(&mut self, name: &str, value: &str) {
        let property = property_name(name.trim());
        let (value, important) = split_important(value.trim());
        if value.is_empty() {
            self.remove(&property);
            return;
        }
        self.push(Declaration {
            property,
            value: value.to_string(),
            important,
        });
    }

    /// Remove a property, returning its old value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = property_name(name);
        let index = self.declarations.iter().position(|d| d.property == name)?;
        Some(self.declarations.remove(index).value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Serialize back to `style` attribute text
    pub fn serialize(&self) -> String {
        self.declarations
            .iter()
            .map(Declaration::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn push(&mut self, decl: Declaration) {
        match self.declarations.iter_mut().find(|d| d.property == decl.property) {
            Some(existing) => *existing = decl,
            None => self.declarations.push(decl),
        }
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
