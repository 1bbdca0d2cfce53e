use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub struct PickerRow {
    pub label: String,
    pub detail: String,
    pub enabled: bool,
}

/// Bordered single-selection list used for companies, topics and problems.
pub struct Picker<'a> {
    title: &'a str,
    rows: Vec<PickerRow>,
    selected: usize,
    empty_text: &'a str,
    theme: &'a Theme,
}

impl<'a> Picker<'a> {
    pub fn new(title: &'a str, rows: Vec<PickerRow>, selected: usize, theme: &'a Theme) -> Self {
        Self {
            title,
            rows,
            selected,
            empty_text: "Nothing here yet.",
            theme,
        }
    }

    pub fn empty_text(mut self, text: &'a str) -> Self {
        self.empty_text = text;
        self
    }
}

impl Widget for Picker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.rows.is_empty() {
            Paragraph::new(Span::styled(self.empty_text, Style::default().fg(colors.muted())))
                .render(inner, buf);
            return;
        }

        // Two lines per row; keep the selection on screen.
        let visible = (inner.height as usize / 2).max(1);
        let first = self.selected.saturating_sub(visible - 1);

        let mut lines: Vec<Line> = Vec::new();
        for (i, row) in self.rows.iter().enumerate().skip(first).take(visible) {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let fg = if !row.enabled {
                colors.locked()
            } else if is_selected {
                colors.selected()
            } else {
                colors.fg()
            };
            let mut label_style = Style::default().fg(fg);
            if is_selected {
                label_style = label_style.add_modifier(Modifier::BOLD);
            }
            let lock = if row.enabled { "" } else { "  [locked]" };

            lines.push(Line::from(vec![
                Span::styled(format!(" {indicator} {:>2}. ", i + 1), label_style),
                Span::styled(row.label.clone(), label_style),
                Span::styled(lock, Style::default().fg(colors.locked())),
            ]));
            lines.push(Line::from(Span::styled(
                format!("       {}", row.detail),
                Style::default().fg(colors.muted()),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

/// Move a list selection by one, wrapping.
pub fn step(selected: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (selected + 1) % len
    } else if selected == 0 {
        len - 1
    } else {
        selected - 1
    }
}
