//! Stylesheet parser using lightningcss
//!
//! `<style>` contents are parsed by lightningcss with error recovery, so a
//! broken rule is dropped on its own. Style rules are then converted to
//! our representation: selectors are printed back and parsed by the local
//! selector engine, declarations are printed back one by one. Other rules
//! (`@media`, `@font-face`, ...) are skipped.

use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;

use crate::parser::parse_selector_list;
use crate::selectors::SelectorList;
use crate::style::{Declaration, declarations_of};

/// Parsed stylesheet
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

/// CSS style rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub selector_text: String,
    pub selectors: SelectorList,
    pub declarations: Vec<Declaration>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Parse a CSS stylesheet
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let mut stylesheet = Stylesheet::new();
    let parsed = match StyleSheet::parse(css, parser_options()) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(%err, "dropping unparsable stylesheet");
            return stylesheet;
        }
    };

    for rule in &parsed.rules.0 {
        let CssRule::Style(style_rule) = rule else {
            continue;
        };
        let selector_text = match style_rule.selectors.to_css_string(PrinterOptions::default()) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(%err, "dropping style rule with unprintable selector");
                continue;
            }
        };
        match parse_selector_list(&selector_text) {
            Ok(selectors) => stylesheet.rules.push(Rule {
                selector_text,
                selectors,
                declarations: declarations_of(&style_rule.declarations),
            }),
            Err(err) => tracing::debug!(%err, "dropping style rule"),
        }
    }

    tracing::trace!(rules = stylesheet.rules.len(), "parsed stylesheet");
    stylesheet
}

/// Options shared by stylesheet and `style` attribute parsing
pub(crate) fn parser_options<'i>() -> ParserOptions<'i> {
    ParserOptions {
        error_recovery: true,
        ..ParserOptions::default()
    }
}
