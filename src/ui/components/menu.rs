use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortalAction {
    Aptitude,
    Coding,
    PurgeCache,
    Quit,
}

impl PortalAction {
    /// Modes get a card; the rest share the utility row.
    fn is_mode(self) -> bool {
        matches!(self, PortalAction::Aptitude | PortalAction::Coding)
    }
}

pub struct MenuItem {
    pub key: char,
    pub label: &'static str,
    pub description: &'static str,
    pub action: PortalAction,
}

const PORTAL_ITEMS: [MenuItem; 4] = [
    MenuItem {
        key: '1',
        label: "Aptitude Assessment",
        description: "Company-themed multiple-choice rounds with scoring",
        action: PortalAction::Aptitude,
    },
    MenuItem {
        key: '2',
        label: "Coding Arena",
        description: "Topic roadmap, problem sets and a code runner",
        action: PortalAction::Coding,
    },
    MenuItem {
        key: 'p',
        label: "Purge Cache",
        description: "Forget every cached topic problem set",
        action: PortalAction::PurgeCache,
    },
    MenuItem {
        key: 'q',
        label: "Quit",
        description: "Leave preptime",
        action: PortalAction::Quit,
    },
];

/// The portal: mode switch between the aptitude and coding sub-apps.
pub struct Menu<'a> {
    pub items: &'static [MenuItem],
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: &PORTAL_ITEMS,
            selected: 0,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(self.items.len() - 1);
    }

    pub fn selected_action(&self) -> PortalAction {
        self.items[self.selected].action
    }

    pub fn action_for_key(&self, key: char) -> Option<PortalAction> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.action)
    }

    fn render_card(&self, idx: usize, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let item = &self.items[idx];
        let focused = idx == self.selected;

        let block = Block::bordered()
            .title(format!(" [{}] ", item.key))
            .border_style(Style::default().fg(if focused {
                colors.border_focused()
            } else {
                colors.border()
            }));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut label_style = Style::default().fg(colors.fg());
        if focused {
            label_style = label_style.fg(colors.accent()).add_modifier(Modifier::BOLD);
        }
        Paragraph::new(vec![
            Line::from(Span::styled(item.label, label_style)),
            Line::from(Span::styled(item.description, Style::default().fg(colors.muted()))),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(inner, buf);
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let outer = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = outer.inner(area);
        outer.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(4),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "PREP TIME",
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Interview preparation in your terminal",
                Style::default().fg(colors.fg()),
            )),
        ])
        .alignment(Alignment::Center)
        .render(rows[0], buf);

        let modes: Vec<usize> = (0..self.items.len())
            .filter(|&i| self.items[i].action.is_mode())
            .collect();
        // Cards sit side by side when there is room, stacked otherwise.
        let direction = if rows[1].width >= 60 {
            Direction::Horizontal
        } else {
            Direction::Vertical
        };
        let cards = Layout::default()
            .direction(direction)
            .constraints(modes.iter().map(|_| Constraint::Ratio(1, modes.len() as u32)))
            .split(rows[1]);
        for (slot, &idx) in modes.iter().enumerate() {
            self.render_card(idx, cards[slot], buf);
        }

        let mut utility: Vec<Span> = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            if item.action.is_mode() {
                continue;
            }
            let style = if i == self.selected {
                Style::default()
                    .fg(colors.selected())
                    .bg(colors.selected_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.muted())
            };
            utility.push(Span::styled(format!(" [{}] {} ", item.key, item.label), style));
            utility.push(Span::raw("  "));
        }
        Paragraph::new(Line::from(utility))
            .alignment(Alignment::Center)
            .render(rows[2], buf);
    }
}
