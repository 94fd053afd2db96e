//! Source positions.
//!
//! A [`Pos`] is a compact handle into a [`FileSet`]: every file owns the
//! half-open range `[base, base + size]` of handles, so a handle alone is
//! enough to find its file. Line starts are registered incrementally by the
//! scanner through [`SourceFile::add_line`] and resolved with a binary
//! search, giving O(log L) lookups.

use std::fmt;

/// Abstract, monotonic source position.
///
/// `Pos::NONE` is never produced for a real offset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos(pub u32);

impl Pos {
    pub const NONE: Pos = Pos(0);

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Human-readable position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub filename: String,
    /// Byte offset, starting at 0.
    pub offset: u32,
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number in bytes, starting at 1.
    pub column: u32,
}

impl Position {
    pub fn new(filename: impl Into<String>, offset: u32, line: u32, column: u32) -> Self {
        Position {
            filename: filename.into(),
            offset,
            line,
            column,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

/// Renders `file:line:column`, `line:column`, `file` or `-`.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let has_name = !self.filename.is_empty();
        match (has_name, self.is_valid()) {
            (true, true) => write!(f, "{}:{}:{}", self.filename, self.line, self.column),
            (false, true) => write!(f, "{}:{}", self.line, self.column),
            (true, false) => f.write_str(&self.filename),
            (false, false) => f.write_str("-"),
        }
    }
}

/// Line bookkeeping for one source unit.
#[derive(Clone, Debug)]
pub struct SourceFile {
    name: String,
    base: u32,
    size: u32,
    /// Byte offset of each line start; `lines[0] == 0`.
    lines: Vec<u32>,
}

impl SourceFile {
    /// Create a standalone file with base 1.
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self::with_base(name, 1, size)
    }

    fn with_base(name: impl Into<String>, base: u32, size: u32) -> Self {
        SourceFile {
            name: name.into(),
            base,
            size,
            lines: vec![0],
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Size of the source in bytes.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Register the start of a new line.
    ///
    /// The offset must be greater than the last registered line start and
    /// smaller than the file size; anything else is ignored.
    pub fn add_line(&mut self, offset: u32) {
        let last = self.lines.last().copied().unwrap_or(0);
        if offset > last && offset < self.size {
            self.lines.push(offset);
        }
    }

    /// Handle for a byte offset. Offsets past the end are clamped.
    #[inline]
    pub fn pos(&self, offset: u32) -> Pos {
        Pos(self.base + offset.min(self.size))
    }

    /// Byte offset of a handle belonging to this file.
    #[inline]
    pub fn offset(&self, pos: Pos) -> u32 {
        pos.0.saturating_sub(self.base).min(self.size)
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        self.base <= pos.0 && pos.0 <= self.base + self.size
    }

    /// 1-based line number containing `offset`.
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.lines.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// Resolve a handle to a human-readable position.
    ///
    /// Returns an invalid (default) position for `Pos::NONE` or handles of
    /// other files.
    pub fn position(&self, pos: Pos) -> Position {
        if !pos.is_valid() || !self.contains(pos) {
            return Position::default();
        }
        let offset = self.offset(pos);
        let line = self.line_from_offset(offset);
        let line_start = self.lines[(line - 1) as usize];
        Position {
            filename: self.name.clone(),
            offset,
            line,
            column: offset - line_start + 1,
        }
    }
}

/// Index of a file inside a [`FileSet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileId(u32);

/// A set of source files sharing one position space.
#[derive(Clone, Debug)]
pub struct FileSet {
    files: Vec<SourceFile>,
    /// Base for the next file.
    base: u32,
}

impl Default for FileSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSet {
    pub fn new() -> Self {
        FileSet {
            files: Vec::new(),
            base: 1,
        }
    }

    /// Reserve a position range for a new file.
    ///
    /// Each file reserves one extra handle past its end so that the EOF
    /// position of one file never collides with the next file's start.
    pub fn add_file(&mut self, name: impl Into<String>, size: u32) -> FileId {
        let id = FileId(u32::try_from(self.files.len()).unwrap_or(u32::MAX));
        self.files.push(SourceFile::with_base(name, self.base, size));
        self.base = self.base.saturating_add(size).saturating_add(1);
        id
    }

    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }

    pub fn file_mut(&mut self, id: FileId) -> Option<&mut SourceFile> {
        self.files.get_mut(id.0 as usize)
    }

    /// File owning a handle.
    pub fn file_of(&self, pos: Pos) -> Option<&SourceFile> {
        if !pos.is_valid() {
            return None;
        }
        let idx = match self.files.binary_search_by_key(&pos.0, SourceFile::base) {
            Ok(exact) => exact,
            Err(insert) => insert.checked_sub(1)?,
        };
        self.files.get(idx).filter(|f| f.contains(pos))
    }

    pub fn position(&self, pos: Pos) -> Position {
        self.file_of(pos)
            .map(|f| f.position(pos))
            .unwrap_or_default()
    }
}
