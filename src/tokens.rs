use log::debug;

/// append-only list of run tokens
/// tokens are addressed by their 1-based position, which never changes
#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: Vec<String>
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, token: String) {
        debug!("Registering token {} at index {}", token, self.tokens.len() + 1);
        self.tokens.push(token);
    }

    /// look up a token by its 1-based index
    pub fn resolve(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(String::as_str)
    }

    /// (index, token) pairs in insertion order
    pub fn list(&self) -> impl Iterator<Item = (usize, &str)> {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, token)| (i + 1, token.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_of(tokens: &[&str]) -> TokenRegistry {
        let mut registry = TokenRegistry::new();
        for token in tokens {
            registry.append(token.to_string());
        }
        registry
    }

    #[test]
    fn resolve_is_one_based() {
        let registry = registry_of(&["a", "b", "c"]);
        assert_eq!(registry.resolve(1), Some("a"));
        assert_eq!(registry.resolve(2), Some("b"));
        assert_eq!(registry.resolve(3), Some("c"));
    }

    #[test]
    fn resolve_rejects_out_of_range() {
        let registry = registry_of(&["a", "b"]);
        assert_eq!(registry.resolve(0), None);
        assert_eq!(registry.resolve(3), None);
        assert_eq!(registry.resolve(usize::MAX), None);

        let empty = TokenRegistry::new();
        assert!(empty.is_empty());
        assert_eq!(empty.resolve(1), None);
    }

    #[test]
    fn list_keeps_insertion_order_and_duplicates() {
        let registry = registry_of(&["x", "y", "x"]);
        // resolving must not disturb the listing
        assert_eq!(registry.resolve(3), Some("x"));
        assert_eq!(registry.resolve(9), None);

        let listed: Vec<_> = registry.list().collect();
        assert_eq!(listed, vec![(1, "x"), (2, "y"), (3, "x")]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn indices_are_stable_across_appends() {
        let mut registry = registry_of(&["first"]);
        registry.append("second".into());
        registry.append("third".into());
        assert_eq!(registry.resolve(1), Some("first"));
        assert_eq!(registry.resolve(3), Some("third"));
    }
}
