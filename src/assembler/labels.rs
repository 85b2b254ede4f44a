//! Label bindings, filled in source order during the single pass.
use std::collections::HashMap;

#[derive(Default, Debug)]
pub struct LabelTable {
    bindings: HashMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        LabelTable::default()
    }

    /// Binds `name` to the line index it was declared on.
    /// Returns false, leaving the table untouched, if the name is already bound.
    pub fn declare(&mut self, name: &str, index: usize) -> bool {
        if self.bindings.contains_key(name) {
            return false;
        }
        self.bindings.insert(name.to_owned(), index);
        true
    }

    /// The line index bound to `name`, if it has been declared so far.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.bindings.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_resolve() {
        let mut table = LabelTable::new();
        assert!(table.is_empty());
        assert_eq!(table.resolve("loop"), None);

        assert!(table.declare("loop", 4));
        assert!(table.declare("end", 9));
        assert_eq!(table.resolve("loop"), Some(4));
        assert_eq!(table.resolve("end"), Some(9));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_redeclare_keeps_first_binding() {
        let mut table = LabelTable::new();
        assert!(table.declare("loop", 1));
        assert!(!table.declare("loop", 7));
        assert_eq!(table.resolve("loop"), Some(1));
        assert_eq!(table.len(), 1);
    }
}
