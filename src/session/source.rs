/// Multi-line source buffer with a char-indexed cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceBuffer {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
}

const TAB: &str = "    ";

impl SourceBuffer {
    /// New buffer with the cursor at the end of `text`.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// (line, column) of the cursor, both zero-based, in chars.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let mut line = 0;
        let mut col = 0;
        for ch in self.text.chars().take(self.cursor) {
            if ch == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    pub fn insert_char(&mut self, ch: char) {
        let byte_offset = self.char_to_byte(self.cursor);
        self.text.insert(byte_offset, ch);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        self.text.insert_str(byte_offset, s);
        self.cursor += s.chars().count();
    }

    /// Newline that keeps the current line's leading indentation.
    pub fn newline(&mut self) {
        let (line, _) = self.cursor_line_col();
        let indent: String = self
            .text
            .lines()
            .nth(line)
            .unwrap_or("")
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        self.insert_char('\n');
        self.insert_str(&indent);
    }

    pub fn tab(&mut self) {
        self.insert_str(TAB);
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let byte_offset = self.char_to_byte(self.cursor - 1);
            self.remove_char_at(byte_offset);
            self.cursor -= 1;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len_chars() {
            let byte_offset = self.char_to_byte(self.cursor);
            self.remove_char_at(byte_offset);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        if self.cursor < self.len_chars() {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        let (_, col) = self.cursor_line_col();
        self.cursor -= col;
    }

    pub fn end(&mut self) {
        let (line, col) = self.cursor_line_col();
        let line_len = self.line_len(line);
        self.cursor += line_len - col;
    }

    pub fn up(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line > 0 {
            self.cursor = self.position_of(line - 1, col);
        }
    }

    pub fn down(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line + 1 < self.line_count() {
            self.cursor = self.position_of(line + 1, col);
        }
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    fn line_len(&self, line: usize) -> usize {
        self.text
            .split('\n')
            .nth(line)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    /// Char index of (line, col), clamping col to the line length.
    fn position_of(&self, line: usize, col: usize) -> usize {
        let before: usize = self
            .text
            .split('\n')
            .take(line)
            .map(|l| l.chars().count() + 1)
            .sum();
        before + col.min(self.line_len(line))
    }

    fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    fn remove_char_at(&mut self, byte_offset: usize) {
        if let Some(ch) = self.text[byte_offset..].chars().next() {
            self.text
                .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
        }
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }
}
