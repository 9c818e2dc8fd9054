//! Line buffer that reflows the cursor line past a fixed width.
//!
//! # Responsibility
//! - Hold the text of one note under edit as lines plus a cursor.
//! - Split the cursor line whenever an edit pushes it past the limit.
//!
//! # Invariants
//! - Columns count characters, not bytes.
//! - After `on_edit_applied` returns, the cursor line is within the limit.
//! - Only the cursor line is reflowed; other lines are never touched.
//! - A reflow never re-enters itself through its own buffer mutations.

use log::trace;

/// Width used by the note editor.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 80;

/// Cursor location as `(line index, character column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Cursor motion requested by the shell. Motion never reflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappingTextBuffer {
    lines: Vec<String>,
    cursor: Position,
    max_line_length: usize,
    /// Set while a reflow rewrites the buffer.
    wrapping: bool,
}

impl WrappingTextBuffer {
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Seeds the buffer from note content; the cursor starts at `(0, 0)`.
    ///
    /// Existing over-long lines are kept as-is until the cursor edits them.
    pub fn from_text(text: &str) -> Self {
        Self::with_max_line_length(text, DEFAULT_MAX_LINE_LENGTH)
    }

    /// Like `from_text` with a custom width (at least 1).
    pub fn with_max_line_length(text: &str, max_line_length: usize) -> Self {
        Self {
            lines: split_lines(text),
            cursor: Position::default(),
            max_line_length: max_line_length.max(1),
            wrapping: false,
        }
    }

    /// Full text joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    /// Moves the cursor, clamped to existing text.
    pub fn set_cursor(&mut self, position: Position) {
        let line = position.line.min(self.lines.len() - 1);
        let column = position.column.min(self.line_len(line));
        self.cursor = Position::new(line, column);
    }

    pub fn move_cursor(&mut self, motion: CursorMove) {
        let Position { line, column } = self.cursor;
        let target = match motion {
            CursorMove::Left if column > 0 => Position::new(line, column - 1),
            CursorMove::Left if line > 0 => Position::new(line - 1, self.line_len(line - 1)),
            CursorMove::Left => self.cursor,
            CursorMove::Right if column < self.line_len(line) => Position::new(line, column + 1),
            CursorMove::Right if line + 1 < self.lines.len() => Position::new(line + 1, 0),
            CursorMove::Right => self.cursor,
            CursorMove::Up => Position::new(line.saturating_sub(1), column),
            CursorMove::Down => Position::new(line + 1, column),
            CursorMove::LineStart => Position::new(line, 0),
            CursorMove::LineEnd => Position::new(line, self.line_len(line)),
        };
        self.set_cursor(target);
    }

    /// Types one character at the cursor.
    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        let Position { line, column } = self.cursor;
        let at = byte_index(&self.lines[line], column);
        self.lines[line].insert(at, ch);
        self.cursor.column += 1;
        self.on_edit_applied();
    }

    /// Inserts `text` (which may span lines) at the cursor, leaving the cursor
    /// after it. Reflow runs once, on the line the cursor ends on.
    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let Position { line, column } = self.cursor;
        let at = byte_index(&self.lines[line], column);
        let rest = self.lines[line].split_off(at);

        let mut segments = text.split('\n');
        if let Some(first) = segments.next() {
            self.lines[line].push_str(first);
        }
        let mut row = line;
        for segment in segments {
            row += 1;
            self.lines.insert(row, segment.to_string());
        }

        let end_column = self.line_len(row);
        self.lines[row].push_str(&rest);
        self.cursor = Position::new(row, end_column);
        self.on_edit_applied();
    }

    /// Splits the cursor line at the cursor.
    pub fn insert_newline(&mut self) {
        let Position { line, column } = self.cursor;
        let at = byte_index(&self.lines[line], column);
        let rest = self.lines[line].split_off(at);
        self.lines.insert(line + 1, rest);
        self.cursor = Position::new(line + 1, 0);
        self.on_edit_applied();
    }

    /// Deletes the character before the cursor, joining lines at column 0.
    ///
    /// Returns `false` at the start of the buffer.
    pub fn backspace(&mut self) -> bool {
        let Position { line, column } = self.cursor;
        if column > 0 {
            let at = byte_index(&self.lines[line], column - 1);
            self.lines[line].remove(at);
            self.cursor.column -= 1;
        } else if line > 0 {
            let current = self.lines.remove(line);
            let join_column = self.line_len(line - 1);
            self.lines[line - 1].push_str(&current);
            self.cursor = Position::new(line - 1, join_column);
        } else {
            return false;
        }
        self.on_edit_applied();
        true
    }

    /// Deletes the character under the cursor, joining the next line at the
    /// end of a line.
    ///
    /// Returns `false` at the end of the buffer.
    pub fn delete_forward(&mut self) -> bool {
        let Position { line, column } = self.cursor;
        if column < self.line_len(line) {
            let at = byte_index(&self.lines[line], column);
            self.lines[line].remove(at);
        } else if line + 1 < self.lines.len() {
            let next = self.lines.remove(line + 1);
            self.lines[line].push_str(&next);
        } else {
            return false;
        }
        self.on_edit_applied();
        true
    }

    /// Replaces the whole text, keeping the cursor clamped where it was.
    pub fn replace_text(&mut self, text: &str) {
        let cursor = self.cursor;
        self.lines = split_lines(text);
        self.set_cursor(cursor);
        self.on_edit_applied();
    }

    /// Edit-applied hook: the shell calls this after every keystroke that
    /// changed content. Returns the number of splits performed.
    ///
    /// Calls made while a reflow is already rewriting the buffer are ignored.
    pub fn on_edit_applied(&mut self) -> usize {
        if self.wrapping {
            return 0;
        }
        self.reflow()
    }

    /// Splits the cursor line until it fits, returning the split count.
    ///
    /// Each split moves the cursor to the newly inserted line, which is
    /// strictly shorter than the line it came from, so this terminates and a
    /// second call without edits is a no-op.
    pub fn reflow(&mut self) -> usize {
        if self.wrapping {
            return 0;
        }
        self.wrapping = true;
        let mut splits = 0;
        while self.reflow_cursor_line() {
            splits += 1;
        }
        self.wrapping = false;
        if splits > 0 {
            trace!(
                "event=reflow module=editor status=ok splits={} line={}",
                splits,
                self.cursor.line
            );
        }
        splits
    }

    fn reflow_cursor_line(&mut self) -> bool {
        let Position { line: row, column } = self.cursor;
        let Some(current) = self.lines.get(row) else {
            return false;
        };
        let chars: Vec<char> = current.chars().collect();
        if chars.len() <= self.max_line_length {
            return false;
        }

        let limit = self.max_line_length;
        let wrap_point = chars[..limit]
            .iter()
            .rposition(|ch| *ch == ' ')
            .unwrap_or(limit);

        let head: String = chars[..wrap_point].iter().collect();
        let tail: String = chars[wrap_point..].iter().collect();
        let first = head.trim_end().to_string();
        let second = tail.trim_start().to_string();
        let stripped = tail.chars().count() - second.chars().count();

        // Cursor at or before the break rides the displaced text to the end
        // of the new line.
        let new_column = if column > first.chars().count() {
            column.saturating_sub(wrap_point + stripped)
        } else {
            second.chars().count()
        };

        let mut lines = self.lines.clone();
        lines[row] = first;
        lines.insert(row + 1, second);
        self.load_lines(lines);
        self.set_cursor(Position::new(row + 1, new_column));
        true
    }

    /// Swaps in new content and signals the change like any other edit.
    fn load_lines(&mut self, lines: Vec<String>) {
        self.lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        };
        self.on_edit_applied();
    }

    fn line_len(&self, index: usize) -> usize {
        self.lines
            .get(index)
            .map_or(0, |line| line.chars().count())
    }
}

impl Default for WrappingTextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(index, _)| index)
}
