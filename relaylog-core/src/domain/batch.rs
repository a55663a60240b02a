//! Pending log batch

/// Ordered collection of log lines awaiting delivery
///
/// Entries keep their insertion order so the joined payload reads
/// chronologically on the collector side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogBatch {
    entries: Vec<String>,
}

impl LogBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single free-text entry
    pub fn push_message(&mut self, text: impl Into<String>) {
        self.entries.push(text.into());
    }

    /// Appends an error as two entries: the description, then the stack
    /// trace with every frame indented by two spaces
    ///
    /// An empty trace still produces the indented entry (`"  "`).
    pub fn push_error<S: AsRef<str>>(&mut self, description: impl Into<String>, frames: &[S]) {
        let frames: Vec<&str> = frames.iter().map(AsRef::as_ref).collect();
        self.entries.push(description.into());
        self.entries.push(format!("  {}", frames.join("\n  ")));
    }

    /// Joins all entries with newlines into one payload string
    pub fn joined(&self) -> String {
        self.entries.join("\n")
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}
