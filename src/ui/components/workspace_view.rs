use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use serde_json::Value;

use crate::model::CodingProblem;
use crate::session::gate::{GateState, LogicGate};
use crate::session::workspace::{RunOutcome, Workspace};
use crate::ui::theme::Theme;

/// Examples are arbitrary JSON; strings are shown bare.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub struct ProblemPanel<'a> {
    problem: &'a CodingProblem,
    theme: &'a Theme,
}

impl<'a> ProblemPanel<'a> {
    pub fn new(problem: &'a CodingProblem, theme: &'a Theme) -> Self {
        Self { problem, theme }
    }
}

impl Widget for ProblemPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Problem ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                self.problem.name.clone(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        if !self.problem.difficulty.is_empty() {
            lines.push(Line::from(Span::styled(
                self.problem.difficulty.clone(),
                Style::default().fg(colors.muted()),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            self.problem.description.clone(),
            Style::default().fg(colors.fg()),
        )));

        if !self.problem.examples.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "// Test scenarios",
                Style::default().fg(colors.muted()),
            )));
            for ex in &self.problem.examples {
                lines.push(Line::from(vec![
                    Span::styled("INPUT:  ", Style::default().fg(colors.muted())),
                    Span::styled(display_value(&ex.input), Style::default().fg(colors.accent())),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("EXPECT: ", Style::default().fg(colors.muted())),
                    Span::styled(display_value(&ex.output), Style::default().fg(colors.accent())),
                ]));
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

/// Gate bar (when gated), source editor and run output.
pub struct EditorPanel<'a> {
    workspace: &'a Workspace,
    theme: &'a Theme,
}

impl<'a> EditorPanel<'a> {
    pub fn new(workspace: &'a Workspace, theme: &'a Theme) -> Self {
        Self { workspace, theme }
    }
}

impl Widget for EditorPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let gate_height = if self.workspace.gate().is_some() { 3 } else { 0 };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(gate_height),
                Constraint::Min(6),
                Constraint::Percentage(35),
            ])
            .split(area);

        if let Some(gate) = self.workspace.gate() {
            GateBar { gate, theme: self.theme }.render(layout[0], buf);
        }
        SourceView {
            workspace: self.workspace,
            theme: self.theme,
        }
        .render(layout[1], buf);
        RunOutput {
            workspace: self.workspace,
            theme: self.theme,
        }
        .render(layout[2], buf);
    }
}

struct GateBar<'a> {
    gate: &'a LogicGate,
    theme: &'a Theme,
}

impl Widget for GateBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (label, fg) = match self.gate.state() {
            GateState::Locked => ("LOCKED", colors.locked()),
            GateState::Unlocked => ("UNLOCKED", colors.success()),
        };
        let block = Block::bordered()
            .title(format!(" Logic gate: {label} "))
            .border_style(Style::default().fg(fg));
        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.gate.is_locked() {
            Line::from(vec![
                Span::styled(" Data structure: ", Style::default().fg(colors.muted())),
                Span::styled(
                    self.gate.ds_choice().unwrap_or("Select"),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                ),
                Span::styled("   Complexity: ", Style::default().fg(colors.muted())),
                Span::styled(
                    self.gate.tc_choice().unwrap_or("Select"),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                ),
            ])
        } else {
            Line::from(Span::styled(
                " Strategy verified. Editor unlocked.",
                Style::default().fg(colors.success()),
            ))
        };
        Paragraph::new(line).render(inner, buf);
    }
}

struct SourceView<'a> {
    workspace: &'a Workspace,
    theme: &'a Theme,
}

impl Widget for SourceView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let read_only = self.workspace.is_read_only();
        let title = format!(
            " {}{} ",
            self.workspace.language().label(),
            if read_only { " [read-only]" } else { "" }
        );
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(if read_only {
                colors.locked()
            } else {
                colors.border_focused()
            }));
        let inner = block.inner(area);
        block.render(area, buf);

        let source = self.workspace.source();
        let (cursor_line, cursor_col) = source.cursor_line_col();
        let height = inner.height as usize;
        let first = if height == 0 {
            0
        } else {
            cursor_line.saturating_sub(height - 1)
        };

        let text_style = Style::default().fg(if read_only { colors.muted() } else { colors.fg() });
        let cursor_style = Style::default().fg(colors.bg()).bg(colors.selected());

        let lines: Vec<Line> = source
            .text()
            .split('\n')
            .enumerate()
            .skip(first)
            .take(height)
            .map(|(n, line)| {
                let gutter = Span::styled(format!("{:>3} ", n + 1), Style::default().fg(colors.accent_dim()));
                if n != cursor_line || read_only {
                    return Line::from(vec![gutter, Span::styled(line.to_string(), text_style)]);
                }
                let before: String = line.chars().take(cursor_col).collect();
                let at: String = line.chars().nth(cursor_col).map(String::from).unwrap_or_else(|| " ".to_string());
                let after: String = line.chars().skip(cursor_col + 1).collect();
                Line::from(vec![
                    gutter,
                    Span::styled(before, text_style),
                    Span::styled(at, cursor_style),
                    Span::styled(after, text_style),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

struct RunOutput<'a> {
    workspace: &'a Workspace,
    theme: &'a Theme,
}

impl Widget for RunOutput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Output ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        if self.workspace.is_running() {
            lines.push(Line::from(Span::styled(
                "Running...",
                Style::default().fg(colors.accent()),
            )));
        }

        match self.workspace.outcome() {
            None if !self.workspace.is_running() => {
                lines.push(Line::from(Span::styled(
                    "Press Ctrl-R to run against the examples.",
                    Style::default().fg(colors.muted()),
                )));
            }
            None => {}
            Some(RunOutcome::LinkFailed(err)) => {
                lines.push(Line::from(Span::styled(
                    err.user_message(),
                    Style::default().fg(colors.error()),
                )));
            }
            Some(RunOutcome::Completed(report)) => {
                if let Some(compile_error) = &report.compile_error {
                    for l in compile_error.lines() {
                        lines.push(Line::from(Span::styled(
                            l.to_string(),
                            Style::default().fg(colors.error()),
                        )));
                    }
                }
                if !report.results.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("{}/{} passed", report.passed_count(), report.results.len()),
                        Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                    )));
                }
                for (i, r) in report.results.iter().enumerate() {
                    let (mark, fg) = if r.passed {
                        ("PASS", colors.success())
                    } else {
                        ("FAIL", colors.error())
                    };
                    let mut spans = vec![
                        Span::styled(format!("CASE {:02} ", i + 1), Style::default().fg(colors.muted())),
                        Span::styled(mark, Style::default().fg(fg).add_modifier(Modifier::BOLD)),
                    ];
                    if !r.passed {
                        spans.push(Span::styled(
                            format!(
                                "  expected {} got {}",
                                display_value(&r.expected),
                                display_value(&r.actual)
                            ),
                            Style::default().fg(colors.muted()),
                        ));
                    }
                    lines.push(Line::from(spans));
                }
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::model::{CaseResult, ExecutionReport, Language};
    use serde_json::json;

    fn workspace(gated: bool) -> Workspace {
        Workspace::new(
            CodingProblem {
                name: "Echo".into(),
                description: "Print the input.".into(),
                difficulty: "Easy".into(),
                examples: Vec::new(),
                ds: gated.then(|| "Array".to_string()),
                tc: gated.then(|| "O(n)".to_string()),
            },
            Language::Python3,
            true,
        )
    }

    fn render_text(widget: impl Widget, w: u16, h: u16) -> String {
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("abc")), "abc");
        assert_eq!(display_value(&json!([1, 2])), "[1,2]");
        assert_eq!(display_value(&Value::Null), "");
    }

    #[test]
    fn test_locked_editor_shows_gate() {
        let theme = Theme::default();
        let ws = workspace(true);
        let text = render_text(EditorPanel::new(&ws, &theme), 80, 24);
        assert!(text.contains("Logic gate: LOCKED"));
        assert!(text.contains("[read-only]"));
    }

    #[test]
    fn test_results_rendered() {
        let theme = Theme::default();
        let mut ws = workspace(false);
        ws.begin_run();
        ws.finish_run(Ok(ExecutionReport {
            results: vec![
                CaseResult {
                    passed: true,
                    expected: json!(1),
                    actual: json!(1),
                },
                CaseResult {
                    passed: false,
                    expected: json!("b"),
                    actual: json!("c"),
                },
            ],
            compile_error: None,
        }));
        let text = render_text(EditorPanel::new(&ws, &theme), 80, 30);
        assert!(text.contains("1/2 passed"));
        assert!(text.contains("expected b got c"));
    }

    #[test]
    fn test_link_failure_rendered() {
        let theme = Theme::default();
        let mut ws = workspace(false);
        ws.begin_run();
        ws.finish_run(Err(RemoteError::link("refused")));
        let text = render_text(EditorPanel::new(&ws, &theme), 80, 30);
        assert!(text.contains("Link failed"));
    }
}
