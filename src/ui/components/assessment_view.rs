use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::assessment::{AssessmentSession, OptionMark};
use crate::ui::theme::Theme;

/// Left column: one cell per question, marking current and answered ones.
pub struct QuestionMatrix<'a> {
    session: &'a AssessmentSession,
    theme: &'a Theme,
}

impl<'a> QuestionMatrix<'a> {
    pub fn new(session: &'a AssessmentSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

impl Widget for QuestionMatrix<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Questions ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let submitted = self.session.is_submitted();
        let current = self.session.current_index();
        let mut lines = Vec::with_capacity(self.session.len());

        for (i, q) in self.session.questions().iter().enumerate() {
            let answer = self.session.answer_for(i);
            let (marker, fg) = match (submitted, answer) {
                (true, Some(a)) if a == q.answer => ("+", colors.correct()),
                (true, _) => ("x", colors.incorrect()),
                (false, Some(_)) => ("*", colors.selected()),
                (false, None) => (" ", colors.muted()),
            };
            let mut style = Style::default().fg(fg);
            if i == current {
                style = style
                    .bg(colors.selected_bg())
                    .add_modifier(Modifier::BOLD);
            }
            lines.push(Line::from(Span::styled(format!(" {:02} {marker} ", i + 1), style)));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

/// The current question with its options, and the explanation once scored.
pub struct QuestionCard<'a> {
    session: &'a AssessmentSession,
    theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(session: &'a AssessmentSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let idx = self.session.current_index();
        let q = self.session.current_question();

        let title = if q.category.is_empty() {
            format!(" Question {:02} ", idx + 1)
        } else {
            format!(" Question {:02} | {} ", idx + 1, q.category)
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(
                q.question.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for (opt_idx, option) in q.options.iter().enumerate() {
            let mark = self.session.option_mark(idx, opt_idx);
            let (prefix, style) = match mark {
                OptionMark::Neutral => ("   ", Style::default().fg(colors.muted())),
                OptionMark::Selected => (
                    " > ",
                    Style::default()
                        .fg(colors.selected())
                        .bg(colors.selected_bg())
                        .add_modifier(Modifier::BOLD),
                ),
                OptionMark::Correct => (
                    " + ",
                    Style::default()
                        .fg(colors.correct())
                        .bg(colors.correct_bg())
                        .add_modifier(Modifier::BOLD),
                ),
                OptionMark::Incorrect => (
                    " x ",
                    Style::default()
                        .fg(colors.incorrect())
                        .bg(colors.incorrect_bg())
                        .add_modifier(Modifier::CROSSED_OUT),
                ),
            };
            lines.push(Line::from(Span::styled(
                format!("{prefix}[{}] {option}", opt_idx + 1),
                style,
            )));
        }

        if let Some(explanation) = self.session.explanation() {
            lines.push(Line::from(""));
            let verdict = match self.session.answer_for(idx) {
                Some(a) if a == q.answer => {
                    Span::styled("Correct", Style::default().fg(colors.correct()))
                }
                Some(_) => Span::styled("Incorrect", Style::default().fg(colors.incorrect())),
                None => Span::styled("Not answered", Style::default().fg(colors.warning())),
            };
            lines.push(Line::from(vec![
                verdict,
                Span::styled(
                    format!("  (answer: {})", q.answer),
                    Style::default().fg(colors.muted()),
                ),
            ]));
            if !explanation.is_empty() {
                lines.push(Line::from(Span::styled(
                    explanation.to_string(),
                    Style::default().fg(colors.fg()),
                )));
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
    use crate::model::Question;

    fn session() -> AssessmentSession {
        AssessmentSession::new(
            "TCS",
            vec![Question {
                question: "2+2?".into(),
                options: vec!["3".into(), "4".into(), "5".into()],
                answer: "4".into(),
                explanation: "Two plus two.".into(),
                category: "Quantitative".into(),
            }],
        )
        .unwrap()
    }

    fn render_text(widget: impl Widget, w: u16, h: u16) -> String {
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_card_hides_explanation_before_submit() {
        let theme = Theme::default();
        let mut s = session();
        s.select_option(0, "3");
        let text = render_text(QuestionCard::new(&s, &theme), 60, 12);
        assert!(text.contains(" > [1] 3"));
        assert!(!text.contains("Two plus two."));
    }

    #[test]
    fn test_card_shows_marks_after_submit() {
        let theme = Theme::default();
        let mut s = session();
        s.select_option(0, "3");
        s.submit();
        let text = render_text(QuestionCard::new(&s, &theme), 60, 12);
        assert!(text.contains(" x [1] 3"));
        assert!(text.contains(" + [2] 4"));
        assert!(text.contains("Two plus two."));
    }

    #[test]
    fn test_matrix_marks_answered() {
        let theme = Theme::default();
        let mut s = session();
        s.select_option(0, "4");
        let text = render_text(QuestionMatrix::new(&s, &theme), 14, 5);
        assert!(text.contains("01 *"));
    }
}
