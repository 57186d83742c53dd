//! Selector parser
//!
//! Turns selector text into a [`SelectorList`]. Group splitting and
//! combinator tokenizing only act at the top level, so commas and
//! combinator characters inside `[...]`, `(...)` or quotes are left alone.

use crate::selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, NthExpression,
    PseudoClass, SelectorComponent, SelectorList, SelectorPart,
};
use crate::{CssError, CssResult};

/// Parse a comma-separated selector list
pub fn parse_selector_list(selector: &str) -> CssResult<SelectorList> {
    let groups = split_selector_groups(selector)?;
    let mut complex = Vec::with_capacity(groups.len());
    for group in groups {
        complex.push(parse_complex(&group, selector)?);
    }
    tracing::trace!(selector, groups = complex.len(), "parsed selector list");
    Ok(SelectorList(complex))
}

/// Bracket, parenthesis and quote nesting of a scan
#[derive(Default)]
struct Nesting {
    brackets: usize,
    parens: usize,
    quote: Option<char>,
}

impl Nesting {
    /// Account for `ch`; false on an unbalanced closing character
    fn feed(&mut self, ch: char) -> bool {
        if let Some(quote) = self.quote {
            if ch == quote {
                self.quote = None;
            }
            return true;
        }
        match ch {
            '"' | '\'' => self.quote = Some(ch),
            '[' => self.brackets += 1,
            '(' => self.parens += 1,
            ']' => match self.brackets.checked_sub(1) {
                Some(depth) => self.brackets = depth,
                None => return false,
            },
            ')' => match self.parens.checked_sub(1) {
                Some(depth) => self.parens = depth,
                None => return false,
            },
            _ => {}
        }
        true
    }

    fn is_top_level(&self) -> bool {
        self.brackets == 0 && self.parens == 0 && self.quote.is_none()
    }
}

fn split_selector_groups(selector: &str) -> CssResult<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut nesting = Nesting::default();

    for ch in selector.chars() {
        if ch == ',' && nesting.is_top_level() {
            let trimmed = current.trim();
            if trimmed.is_empty() {
                return Err(CssError::selector(selector, "empty selector in list"));
            }
            groups.push(trimmed.to_string());
            current.clear();
            continue;
        }
        if !nesting.feed(ch) {
            return Err(CssError::selector(selector, format!("unbalanced '{ch}'")));
        }
        current.push(ch);
    }

    if !nesting.is_top_level() {
        return Err(CssError::selector(selector, "unterminated bracket, parenthesis or string"));
    }
    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(CssError::selector(selector, "empty selector"));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

enum Token {
    Compound(String),
    Combinator(Combinator),
}

fn tokenize_selector(group: &str, source: &str) -> CssResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut nesting = Nesting::default();

    let flush = |current: &mut String, tokens: &mut Vec<Token>| {
        if !current.is_empty() {
            tokens.push(Token::Compound(std::mem::take(current)));
        }
    };

    for ch in group.chars() {
        if nesting.is_top_level() {
            let combinator = match ch {
                '>' => Some(Combinator::Child),
                '+' => Some(Combinator::NextSibling),
                '~' => Some(Combinator::SubsequentSibling),
                _ => None,
            };
            if let Some(combinator) = combinator {
                flush(&mut current, &mut tokens);
                tokens.push(Token::Combinator(combinator));
                continue;
            }
            if ch.is_whitespace() {
                flush(&mut current, &mut tokens);
                continue;
            }
        }
        if !nesting.feed(ch) {
            return Err(CssError::selector(source, format!("unbalanced '{ch}'")));
        }
        current.push(ch);
    }
    flush(&mut current, &mut tokens);
    Ok(tokens)
}

fn parse_complex(group: &str, source: &str) -> CssResult<ComplexSelector> {
    let mut parts: Vec<SelectorPart> = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize_selector(group, source)? {
        match token {
            Token::Combinator(combinator) => {
                if pending.is_some() || parts.is_empty() {
                    return Err(CssError::selector(source, "misplaced combinator"));
                }
                pending = Some(combinator);
            }
            Token::Compound(text) => {
                let compound = parse_compound(&text, source)?;
                let combinator = if parts.is_empty() {
                    None
                } else {
                    Some(pending.take().unwrap_or(Combinator::Descendant))
                };
                parts.push(SelectorPart { compound, combinator });
            }
        }
    }

    if parts.is_empty() || pending.is_some() {
        return Err(CssError::selector(source, "dangling combinator"));
    }
    Ok(ComplexSelector { parts })
}

/// Character cursor over one compound selector
struct Cursor<'a> {
    chars: Vec<char>,
    pos: usize,
    source: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(text: &str, source: &'a str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            source,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> CssError {
        CssError::selector(self.source, message)
    }

    fn ident(&mut self) -> CssResult<String> {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.pos += 1;
                let escaped = self.bump().ok_or_else(|| self.error("dangling escape"))?;
                out.push(escaped);
            } else if ch.is_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
                out.push(ch);
                self.pos += 1;
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(self.error(format!("expected identifier at offset {}", self.pos)));
        }
        Ok(out)
    }

    /// Raw text up to the parenthesis closing the one just consumed
    fn parenthesized(&mut self) -> CssResult<String> {
        let mut nesting = Nesting {
            parens: 1,
            ..Nesting::default()
        };
        let mut out = String::new();
        while let Some(ch) = self.bump() {
            if !nesting.feed(ch) {
                return Err(self.error("unbalanced parenthesis"));
            }
            if nesting.parens == 0 && nesting.quote.is_none() {
                return Ok(out);
            }
            out.push(ch);
        }
        Err(self.error("unterminated parenthesis"))
    }

    fn quoted(&mut self, quote: char) -> CssResult<String> {
        let mut out = String::new();
        while let Some(ch) = self.bump() {
            match ch {
                '\\' => out.push(self.bump().ok_or_else(|| self.error("dangling escape"))?),
                c if c == quote => return Ok(out),
                c => out.push(c),
            }
        }
        Err(self.error("unterminated string"))
    }
}

fn parse_compound(text: &str, source: &str) -> CssResult<CompoundSelector> {
    let mut cursor = Cursor::new(text, source);
    let mut components = Vec::new();

    while let Some(ch) = cursor.peek() {
        let component = match ch {
            '*' if components.is_empty() => {
                cursor.bump();
                SelectorComponent::Universal
            }
            '#' => {
                cursor.bump();
                SelectorComponent::Id(cursor.ident()?)
            }
            '.' => {
                cursor.bump();
                SelectorComponent::Class(cursor.ident()?)
            }
            '[' => {
                cursor.bump();
                SelectorComponent::Attribute(parse_attribute(&mut cursor)?)
            }
            ':' => {
                cursor.bump();
                if cursor.eat(':') {
                    SelectorComponent::PseudoElement(cursor.ident()?.to_ascii_lowercase())
                } else {
                    parse_pseudo(&mut cursor)?
                }
            }
            c if components.is_empty() && (c.is_alphabetic() || c == '_' || c == '-' || c == '\\') => {
                SelectorComponent::Type(cursor.ident()?.to_ascii_lowercase())
            }
            c => return Err(cursor.error(format!("unexpected '{c}'"))),
        };
        components.push(component);
    }

    Ok(CompoundSelector { components })
}

fn parse_attribute(cursor: &mut Cursor<'_>) -> CssResult<AttributeSelector> {
    cursor.skip_whitespace();
    let name = cursor.ident()?.to_ascii_lowercase();
    cursor.skip_whitespace();

    if cursor.eat(']') {
        return Ok(AttributeSelector {
            name,
            matcher: None,
            case_insensitive: false,
        });
    }

    let operator = match cursor.bump() {
        Some('=') => '=',
        Some(op @ ('~' | '|' | '^' | '$' | '*')) if cursor.eat('=') => op,
        _ => return Err(cursor.error("invalid attribute operator")),
    };

    cursor.skip_whitespace();
    let value = match cursor.peek() {
        Some(quote @ ('"' | '\'')) => {
            cursor.bump();
            cursor.quoted(quote)?
        }
        _ => cursor.ident()?,
    };

    cursor.skip_whitespace();
    let case_insensitive = match cursor.peek() {
        Some('i' | 'I') => {
            cursor.bump();
            true
        }
        Some('s' | 'S') => {
            cursor.bump();
            false
        }
        _ => false,
    };
    cursor.skip_whitespace();
    if !cursor.eat(']') {
        return Err(cursor.error("unterminated attribute selector"));
    }

    let matcher = match operator {
        '=' => AttributeMatcher::Exact(value),
        '~' => AttributeMatcher::Contains(value),
        '|' => AttributeMatcher::DashMatch(value),
        '^' => AttributeMatcher::Prefix(value),
        '$' => AttributeMatcher::Suffix(value),
        _ => AttributeMatcher::Substring(value),
    };
    Ok(AttributeSelector {
        name,
        matcher: Some(matcher),
        case_insensitive,
    })
}

fn parse_pseudo(cursor: &mut Cursor<'_>) -> CssResult<SelectorComponent> {
    let name = cursor.ident()?.to_ascii_lowercase();

    if cursor.peek() != Some('(') {
        if let Some(pseudo) = PseudoClass::from_name(&name) {
            return Ok(SelectorComponent::PseudoClass(pseudo));
        }
        // CSS2 pseudo-elements written with a single colon
        return match name.as_str() {
            "before" | "after" | "first-line" | "first-letter" => Ok(SelectorComponent::PseudoElement(name)),
            _ => Err(cursor.error(format!("unknown pseudo-class ':{name}'"))),
        };
    }

    cursor.bump();
    let argument = cursor.parenthesized()?;
    let nth = |arg: &str| {
        NthExpression::parse(arg).ok_or_else(|| cursor.error(format!("invalid :{name}() argument '{arg}'")))
    };

    let pseudo = match name.as_str() {
        "not" => PseudoClass::Not(parse_selector_list(&argument)?),
        "is" | "matches" | "any" => PseudoClass::Is(parse_selector_list(&argument)?),
        "where" => PseudoClass::Where(parse_selector_list(&argument)?),
        "has" => PseudoClass::Has(parse_selector_list(&argument)?),
        "nth-child" => PseudoClass::NthChild(nth(&argument)?),
        "nth-last-child" => PseudoClass::NthLastChild(nth(&argument)?),
        "nth-of-type" => PseudoClass::NthOfType(nth(&argument)?),
        "nth-last-of-type" => PseudoClass::NthLastOfType(nth(&argument)?),
        "lang" => {
            let lang = argument.trim().trim_matches(|c| c == '"' || c == '\'');
            if lang.is_empty() {
                return Err(cursor.error(":lang() needs an argument"));
            }
            PseudoClass::Lang(lang.to_ascii_lowercase())
        }
        _ => return Err(cursor.error(format!("unknown functional pseudo-class ':{name}()'"))),
    };
    Ok(SelectorComponent::PseudoClass(pseudo))
}
