//! Indentation-aware text builder.
//!
//! Nesting is scoped by closures, so an opened level is always closed and
//! the indentation of generated Ada always follows its block structure.

/// Line-oriented writer for generated source.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
    width: usize,
}

impl CodeWriter {
    /// Creates a writer starting at nesting depth zero.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self::at_depth(width, 0)
    }

    /// Creates a writer starting at the given nesting depth.
    #[must_use]
    pub fn at_depth(width: usize, depth: usize) -> Self {
        Self {
            buf: String::new(),
            depth,
            width,
        }
    }

    /// Returns the current nesting depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes one line at the current depth.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            self.buf
                .extend(std::iter::repeat_n(' ', self.depth * self.width));
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    /// Writes an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Runs `f` one level deeper.
    pub fn nest<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Writes `open`, runs `f` one level deeper, then writes `close`.
    pub fn block<R>(
        &mut self,
        open: impl AsRef<str>,
        close: impl AsRef<str>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.line(open);
        let result = self.nest(f);
        self.line(close);
        result
    }

    /// Appends pre-rendered text verbatim.
    pub fn raw(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }

    /// Returns the accumulated text.
    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }
}
