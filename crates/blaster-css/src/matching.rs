//! Selector matching against a `DomTree`
//!
//! Complex selectors are matched right to left: the rightmost compound
//! must match the candidate, then each combinator walks towards the left
//! part, backtracking over every ancestor/sibling that could satisfy it.

use blaster_dom::{ControlKind, DomTree, ElementData, InputType, NodeData, NodeId};

use crate::selectors::{
    Combinator, ComplexSelector, CompoundSelector, NthExpression, PseudoClass, SelectorComponent, SelectorList,
    SelectorPart,
};

const DISABLEABLE: &[&str] = &["button", "input", "select", "textarea", "fieldset", "optgroup", "option"];

/// Does the element `node` match any selector of `list`?
pub fn matches(tree: &DomTree, node: NodeId, list: &SelectorList) -> bool {
    tree.is_element(node) && list.0.iter().any(|complex| matches_complex(tree, node, complex))
}

/// First descendant element of `root` (document order) matching `list`
pub fn query_selector(tree: &DomTree, root: NodeId, list: &SelectorList) -> Option<NodeId> {
    tree.descendant_elements(root)
        .into_iter()
        .find(|&node| matches(tree, node, list))
}

/// Every descendant element of `root` matching `list`, in document order
pub fn query_selector_all(tree: &DomTree, root: NodeId, list: &SelectorList) -> Vec<NodeId> {
    let found: Vec<NodeId> = tree
        .descendant_elements(root)
        .into_iter()
        .filter(|&node| matches(tree, node, list))
        .collect();
    tracing::trace!(root = %root, matches = found.len(), "query_selector_all");
    found
}

pub(crate) fn matches_complex(tree: &DomTree, node: NodeId, complex: &ComplexSelector) -> bool {
    matches_parts(tree, node, &complex.parts)
}

fn matches_parts(tree: &DomTree, node: NodeId, parts: &[SelectorPart]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return true;
    };
    if !matches_compound(tree, node, &last.compound) {
        return false;
    }
    let Some(combinator) = last.combinator else {
        return rest.is_empty();
    };

    match combinator {
        Combinator::Descendant => tree
            .ancestors(node)
            .filter(|&a| tree.is_element(a))
            .any(|a| matches_parts(tree, a, rest)),
        Combinator::Child => tree.parent_element(node).is_some_and(|p| matches_parts(tree, p, rest)),
        Combinator::NextSibling => tree
            .previous_element_sibling(node)
            .is_some_and(|s| matches_parts(tree, s, rest)),
        Combinator::SubsequentSibling => {
            std::iter::successors(tree.previous_element_sibling(node), |&s| tree.previous_element_sibling(s))
                .any(|s| matches_parts(tree, s, rest))
        }
    }
}

fn matches_compound(tree: &DomTree, node: NodeId, compound: &CompoundSelector) -> bool {
    let Some(elem) = tree.element(node) else {
        return false;
    };
    compound
        .components
        .iter()
        .all(|component| match_component(tree, node, elem, component))
}

fn match_component(tree: &DomTree, node: NodeId, elem: &ElementData, component: &SelectorComponent) -> bool {
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => elem.tag == *tag,
        SelectorComponent::Id(id) => elem.id() == Some(id.as_str()),
        SelectorComponent::Class(class) => elem.has_class(class),
        SelectorComponent::Attribute(attr) => attr.matches(elem.get_attr(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match_pseudo_class(tree, node, elem, pseudo),
        SelectorComponent::PseudoElement(_) => false,
    }
}

fn match_pseudo_class(tree: &DomTree, node: NodeId, elem: &ElementData, pseudo: &PseudoClass) -> bool {
    match pseudo {
        PseudoClass::Root => tree.parent(node) == Some(tree.root()),
        PseudoClass::Empty => tree.children(node).all(|(_, child)| match &child.data {
            NodeData::Element(_) => false,
            NodeData::Text(text) => text.is_empty(),
            _ => true,
        }),
        PseudoClass::FirstChild => tree.previous_element_sibling(node).is_none(),
        PseudoClass::LastChild => tree.next_element_sibling(node).is_none(),
        PseudoClass::OnlyChild => {
            tree.previous_element_sibling(node).is_none() && tree.next_element_sibling(node).is_none()
        }
        PseudoClass::FirstOfType => nth_position(tree, node, true, false).0 == 1,
        PseudoClass::LastOfType => nth_position(tree, node, true, true).0 == 1,
        PseudoClass::OnlyOfType => nth_position(tree, node, true, false).1 == 1,
        PseudoClass::NthChild(expr) => nth_matches(tree, node, expr, false, false),
        PseudoClass::NthLastChild(expr) => nth_matches(tree, node, expr, false, true),
        PseudoClass::NthOfType(expr) => nth_matches(tree, node, expr, true, false),
        PseudoClass::NthLastOfType(expr) => nth_matches(tree, node, expr, true, true),

        PseudoClass::Not(list) => !matches(tree, node, list),
        PseudoClass::Is(list) | PseudoClass::Where(list) => matches(tree, node, list),
        PseudoClass::Has(list) => tree
            .descendant_elements(node)
            .into_iter()
            .any(|d| matches(tree, d, list)),

        PseudoClass::Checked => match tree.control_kind(node) {
            Some(ControlKind::Input(t)) if t.is_checkable() => tree.is_checked(node),
            _ if elem.is("option") => elem.has_attr("selected"),
            _ => false,
        },
        PseudoClass::Disabled => tree.is_disabled(node),
        PseudoClass::Enabled => DISABLEABLE.contains(&elem.tag.as_str()) && !tree.is_disabled(node),
        PseudoClass::Required => tree.control_kind(node).is_some() && elem.has_attr("required"),
        PseudoClass::Optional => tree.control_kind(node).is_some() && !elem.has_attr("required"),
        PseudoClass::ReadWrite => is_read_write(tree, node, elem),
        PseudoClass::ReadOnly => !is_read_write(tree, node, elem),
        PseudoClass::PlaceholderShown => {
            matches!(tree.control_kind(node), Some(ControlKind::Input(_) | ControlKind::Textarea))
                && elem.has_attr("placeholder")
                && tree.control_value(node).is_some_and(|v| v.is_empty())
        }
        PseudoClass::Link => (elem.is("a") || elem.is("area")) && elem.has_attr("href"),
        PseudoClass::Lang(lang) => {
            let declared = std::iter::once(node)
                .chain(tree.ancestors(node))
                .find_map(|n| tree.attr(n, "lang"))
                .map(str::to_ascii_lowercase);
            declared.is_some_and(|d| d == *lang || d.starts_with(&format!("{lang}-")))
        }
        PseudoClass::State(_) => false,
    }
}

fn is_read_write(tree: &DomTree, node: NodeId, elem: &ElementData) -> bool {
    let editable_control = match tree.control_kind(node) {
        Some(ControlKind::Input(t)) => !matches!(
            t,
            InputType::Checkbox
                | InputType::Radio
                | InputType::Hidden
                | InputType::File
                | InputType::Submit
                | InputType::Reset
                | InputType::Button
                | InputType::Image
                | InputType::Range
                | InputType::Color
        ),
        Some(ControlKind::Textarea) => true,
        _ => false,
    };
    if editable_control {
        return !elem.has_attr("readonly") && !tree.is_disabled(node);
    }
    elem.get_attr("contenteditable")
        .is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true"))
}

/// 1-based position among the element's siblings and the sibling count,
/// optionally restricted to the same tag and counted from the end
fn nth_position(tree: &DomTree, node: NodeId, of_type: bool, from_end: bool) -> (usize, usize) {
    let Some(parent) = tree.parent(node) else {
        return (1, 1);
    };
    let tag = tree.tag_name(node);
    let mut siblings: Vec<NodeId> = tree
        .element_children(parent)
        .into_iter()
        .filter(|&s| !of_type || tree.tag_name(s) == tag)
        .collect();
    if from_end {
        siblings.reverse();
    }
    let index = siblings.iter().position(|&s| s == node).map_or(0, |i| i + 1);
    (index, siblings.len())
}

fn nth_matches(tree: &DomTree, node: NodeId, expr: &NthExpression, of_type: bool, from_end: bool) -> bool {
    let (index, _) = nth_position(tree, node, of_type, from_end);
    i32::try_from(index).is_ok_and(|i| i > 0 && expr.matches(i))
}
