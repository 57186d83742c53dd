//! Class list (class map)
//!
//! Set-like view of a serialized `class` attribute: parsed on whitespace,
//! mutated, then re-serialized space-joined.

/// Set of class tokens parsed from a `class` attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// Create empty class list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string (duplicates collapse)
    pub fn parse(s: &str) -> Self {
        let mut list = Self::new();
        for token in s.split_whitespace() {
            list.insert(token);
        }
        list
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check if class is present
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add class(es)
    pub fn add(&mut self, tokens: &[&str]) {
        for token in tokens {
            self.insert(token);
        }
    }

    /// Remove class(es)
    pub fn remove(&mut self, tokens: &[&str]) {
        self.tokens.retain(|t| !tokens.contains(&t.as_str()));
    }

    /// Toggle class, returns new presence
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        let next = force.unwrap_or(!self.contains(token));
        if next {
            self.insert(token);
        } else {
            self.remove(&[token]);
        }
        next
    }

    /// Replace `old_token` with `new_token` if present
    pub fn replace(&mut self, old_token: &str, new_token: &str) -> bool {
        let Some(pos) = self.tokens.iter().position(|t| t == old_token) else {
            return false;
        };
        if self.contains(new_token) || new_token.trim().is_empty() {
            self.tokens.remove(pos);
        } else {
            self.tokens[pos] = new_token.to_string();
        }
        true
    }

    /// Serialized form (space-joined)
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    /// Iterate over classes
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }

    fn insert(&mut self, token: &str) {
        let token = token.trim();
        if !token.is_empty() && !self.contains(token) {
            self.tokens.push(token.to_string());
        }
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value())
    }
}

impl<'a> FromIterator<&'a str> for ClassList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut list = Self::new();
        for token in iter {
            list.insert(token);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let list = ClassList::parse("  btn btn-primary\tactive btn ");
        assert_eq!(list.len(), 3);
        assert!(list.contains("btn"));
        assert!(list.contains("btn-primary"));
        assert_eq!(list.value(), "btn btn-primary active");
    }

    #[test]
    fn test_add_remove() {
        let mut list = ClassList::new();
        list.add(&["foo", "bar", "foo"]);
        assert_eq!(list.len(), 2);

        list.remove(&["foo"]);
        assert_eq!(list.len(), 1);
        assert!(!list.contains("foo"));
    }

    #[test]
    fn test_toggle() {
        let mut list = ClassList::new();

        assert!(list.toggle("active", None));
        assert!(list.contains("active"));

        assert!(!list.toggle("active", None));
        assert!(!list.contains("active"));
    }

    #[test]
    fn test_replace() {
        let mut list = ClassList::parse("old-class other");

        assert!(list.replace("old-class", "new-class"));
        assert!(!list.contains("old-class"));
        assert!(list.contains("new-class"));

        assert!(list.replace("new-class", "other"));
        assert_eq!(list.value(), "other");
        assert!(!list.replace("missing", "x"));
    }
}
