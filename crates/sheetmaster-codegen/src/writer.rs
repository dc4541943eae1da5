/// Line-oriented source buffer with four-space indentation.
#[derive(Debug, Default)]
pub struct SourceWriter {
    buf: String,
    depth: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current depth. Empty text writes a bare newline.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str("    ");
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    /// Write `text` and indent what follows.
    pub fn open(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.line(text);
        self.depth += 1;
        self
    }

    /// Dedent and write `text`.
    pub fn close(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(text)
    }

    /// `///` comment, one output line per input line.
    pub fn doc(&mut self, text: &str) -> &mut Self {
        self.comment("///", text)
    }

    /// `//!` comment, one output line per input line.
    pub fn inner_doc(&mut self, text: &str) -> &mut Self {
        self.comment("//!", text)
    }

    fn comment(&mut self, marker: &str, text: &str) -> &mut Self {
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.line(marker);
            } else {
                self.line(format!("{marker} {line}"));
            }
        }
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
