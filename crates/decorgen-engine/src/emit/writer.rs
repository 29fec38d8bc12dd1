//! Indented source text writer

const INDENT: &str = "    ";

/// Source writer for emitting generated text
///
/// Tracks the current brace depth so callers only write line contents.
/// Blank lines never carry indentation and consecutive blank lines are
/// collapsed into one.
pub struct SourceWriter {
    /// Text emitted so far
    pub(crate) buffer: String,
    depth: usize,
}

impl SourceWriter {
    /// Create a new writer
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            depth: 0,
        }
    }

    /// Create a new writer with capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
            depth: 0,
        }
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    // ===== Basic Emission =====

    /// Emit one line at the current depth
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.blank();
            return;
        }
        for _ in 0..self.depth {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(text.trim_end());
        self.buffer.push('\n');
    }

    /// Emit an empty line, unless the previous line was empty or an opening brace
    pub fn blank(&mut self) {
        if self.buffer.is_empty() || self.buffer.ends_with("\n\n") || self.buffer.ends_with("{\n") {
            return;
        }
        self.buffer.push('\n');
    }

    // ===== Blocks =====

    /// Emit `header` (if any) then `{` and indent
    pub fn open(&mut self, header: impl AsRef<str>) {
        let header = header.as_ref();
        if !header.is_empty() {
            self.line(header);
        }
        self.line("{");
        self.depth += 1;
    }

    /// Dedent and emit `}`
    pub fn close(&mut self) {
        self.close_with("}");
    }

    /// Dedent and emit a closing line such as `});`
    pub fn close_with(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        if self.buffer.ends_with("\n\n") {
            self.buffer.pop();
        }
        self.line(text);
    }

    /// Consume the writer and return the text
    pub fn finish(mut self) -> String {
        while self.buffer.ends_with("\n\n") {
            self.buffer.pop();
        }
        self.buffer
    }
}

impl Default for SourceWriter {
    fn default() -> Self {
        Self::new()
    }
}
