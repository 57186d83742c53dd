//! Form control state
//!
//! Value, checkedness and disabled state of `input`, `textarea` and
//! `select`, derived from the tree the way the host exposes them as
//! element properties.

use crate::{DomError, DomResult, DomTree, NodeId};

/// Input element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Password,
    Email,
    Number,
    Search,
    Tel,
    Url,
    Date,
    Checkbox,
    Radio,
    Hidden,
    File,
    Submit,
    Reset,
    Button,
    Image,
    Range,
    Color,
}

impl InputType {
    /// Parse from the `type` attribute (unknown values fall back to text)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "password" => Self::Password,
            "email" => Self::Email,
            "number" => Self::Number,
            "search" => Self::Search,
            "tel" => Self::Tel,
            "url" => Self::Url,
            "date" => Self::Date,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "hidden" => Self::Hidden,
            "file" => Self::File,
            "submit" => Self::Submit,
            "reset" => Self::Reset,
            "button" => Self::Button,
            "image" => Self::Image,
            "range" => Self::Range,
            "color" => Self::Color,
            _ => Self::Text,
        }
    }

    /// Checkbox or radio
    pub fn is_checkable(&self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

/// Kind of form control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Input(InputType),
    Textarea,
    Select { multiple: bool },
}

const DISABLEABLE: &[&str] = &["button", "input", "select", "textarea", "fieldset", "optgroup", "option"];

impl DomTree {
    /// Kind of form control, if `id` is one
    pub fn control_kind(&self, id: NodeId) -> Option<ControlKind> {
        let elem = self.element(id)?;
        match elem.tag.as_str() {
            "input" => Some(ControlKind::Input(InputType::parse(elem.get_attr("type").unwrap_or_default()))),
            "textarea" => Some(ControlKind::Textarea),
            "select" => Some(ControlKind::Select { multiple: elem.has_attr("multiple") }),
            _ => None,
        }
    }

    /// Checked state of a checkbox/radio (`checked` attribute)
    pub fn is_checked(&self, id: NodeId) -> bool {
        match self.control_kind(id) {
            Some(ControlKind::Input(t)) if t.is_checkable() => {
                self.element(id).is_some_and(|e| e.has_attr("checked"))
            }
            _ => false,
        }
    }

    /// Set the checked state of a checkbox/radio; checking a radio
    /// unchecks the other radios of its group in the same form owner
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> DomResult<()> {
        let Some(ControlKind::Input(input_type)) = self.control_kind(id) else {
            return Err(DomError::InvalidNodeType(id));
        };
        if checked && input_type == InputType::Radio {
            for other in self.radio_group(id) {
                if other != id {
                    self.remove_attr(other, "checked")?;
                }
            }
        }
        if checked {
            self.set_attr(id, "checked", "")
        } else {
            self.remove_attr(id, "checked").map(|_| ())
        }
    }

    /// `:disabled` state: own `disabled` attribute, a disabled `optgroup`
    /// for options, or a disabled ancestor `fieldset` (outside its first
    /// `legend`)
    pub fn is_disabled(&self, id: NodeId) -> bool {
        let Some(elem) = self.element(id) else {
            return false;
        };
        if !DISABLEABLE.contains(&elem.tag.as_str()) {
            return false;
        }
        if elem.has_attr("disabled") {
            return true;
        }
        if elem.is("option") {
            return self
                .parent_element(id)
                .is_some_and(|p| self.tag_name(p) == Some("optgroup") && self.is_disabled(p));
        }
        if elem.is("optgroup") {
            return false;
        }

        let mut child = id;
        for ancestor in self.ancestors(id) {
            if let Some(a) = self.element(ancestor) {
                if a.is("fieldset") && a.has_attr("disabled") {
                    let first_legend = self
                        .element_children(ancestor)
                        .into_iter()
                        .find(|&c| self.tag_name(c) == Some("legend"));
                    if first_legend != Some(child) {
                        return true;
                    }
                }
            }
            child = ancestor;
        }
        false
    }

    /// Current value of a form control (or `option`)
    pub fn control_value(&self, id: NodeId) -> Option<String> {
        if self.tag_name(id) == Some("option") {
            return Some(self.option_value(id));
        }
        match self.control_kind(id)? {
            ControlKind::Input(input_type) => {
                let value = self.attr(id, "value");
                Some(match (value, input_type.is_checkable()) {
                    (Some(v), _) => v.to_string(),
                    (None, true) => "on".to_string(),
                    (None, false) => String::new(),
                })
            }
            ControlKind::Textarea => Some(self.text_content(id)),
            ControlKind::Select { .. } => Some(
                self.selected_options(id)
                    .first()
                    .map(|&o| self.option_value(o))
                    .unwrap_or_default(),
            ),
        }
    }

    /// Set the value of a form control
    pub fn set_control_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        match self.control_kind(id) {
            Some(ControlKind::Input(_)) => self.set_attr(id, "value", value),
            Some(ControlKind::Textarea) => self.set_text_content(id, value),
            Some(ControlKind::Select { .. }) => {
                let mut matched = false;
                for option in self.options(id) {
                    if !matched && self.option_value(option) == value {
                        matched = true;
                        self.set_attr(option, "selected", "")?;
                    } else {
                        self.remove_attr(option, "selected")?;
                    }
                }
                Ok(())
            }
            None if self.tag_name(id) == Some("option") => self.set_attr(id, "value", value),
            None => Err(DomError::InvalidNodeType(id)),
        }
    }

    /// `option` descendants of a `select` in document order
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendant_elements(select)
            .into_iter()
            .filter(|&n| self.tag_name(n) == Some("option"))
            .collect()
    }

    /// Selected options; a single-choice select without an explicit
    /// selection reports its first enabled option
    pub fn selected_options(&self, select: NodeId) -> Vec<NodeId> {
        let options = self.options(select);
        let selected: Vec<NodeId> = options
            .iter()
            .copied()
            .filter(|&o| self.element(o).is_some_and(|e| e.has_attr("selected")))
            .collect();
        let multiple = matches!(self.control_kind(select), Some(ControlKind::Select { multiple: true }));

        if multiple {
            return selected;
        }
        if let Some(&last) = selected.last() {
            return vec![last];
        }
        options
            .into_iter()
            .find(|&o| !self.is_disabled(o))
            .into_iter()
            .collect()
    }

    /// Value of an `option`: its `value` attribute, else its collapsed text
    pub fn option_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(v) => v.to_string(),
            None => self
                .text_content(option)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Nearest ancestor `form`
    pub fn form_owner(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).find(|&a| self.tag_name(a) == Some("form"))
    }

    fn radio_group(&self, id: NodeId) -> Vec<NodeId> {
        let Some(name) = self.attr(id, "name").filter(|n| !n.is_empty()) else {
            return vec![id];
        };
        let scope = self
            .form_owner(id)
            .unwrap_or_else(|| self.ancestors(id).last().unwrap_or(id));
        self.descendant_elements(scope)
            .into_iter()
            .filter(|&n| {
                matches!(self.control_kind(n), Some(ControlKind::Input(InputType::Radio)))
                    && self.attr(n, "name") == Some(name)
            })
            .collect()
    }
}
