use crate::kernel::text::to_lower_tr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEntry {
    pub display_name: String,
    pub number: String,
}

/// Address book queries, shaped after what a contacts provider offers.
pub trait ContactBook: Send + Sync {
    /// Display name equals `name` exactly (case-sensitive).
    fn find_exact(&self, name: &str) -> Option<String>;
    /// Display name contains `term`, ignoring case.
    fn find_containing(&self, term: &str) -> Option<String>;
    fn all(&self) -> Vec<ContactEntry>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryContactBook {
    entries: Vec<ContactEntry>,
}

impl InMemoryContactBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, display_name: &str, number: &str) -> Self {
        self.entries.push(ContactEntry {
            display_name: display_name.to_string(),
            number: number.to_string(),
        });
        self
    }
}

impl ContactBook for InMemoryContactBook {
    fn find_exact(&self, name: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|e| e.display_name == name)
            .map(|e| e.number.clone())
    }

    fn find_containing(&self, term: &str) -> Option<String> {
        let term = to_lower_tr(term);
        self.entries
            .iter()
            .find(|e| to_lower_tr(&e.display_name).contains(&term))
            .map(|e| e.number.clone())
    }

    fn all(&self) -> Vec<ContactEntry> {
        self.entries.clone()
    }
}
