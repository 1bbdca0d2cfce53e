use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use preptime::app::{App, AppScreen};
use preptime::catalog::{COMPANIES, TOPICS};
use preptime::config::Config;
use preptime::event::{AppEvent, EventHandler};
use preptime::logging;
use preptime::remote::HttpRemote;
use preptime::store::topic_cache::{JsonFileBackend, TopicCache};
use preptime::ui::components::assessment_view::{QuestionCard, QuestionMatrix};
use preptime::ui::components::menu::PortalAction;
use preptime::ui::components::picker::{self, Picker, PickerRow};
use preptime::ui::components::workspace_view::{EditorPanel, ProblemPanel};
use preptime::ui::layout::{self, AppLayout};
use preptime::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "preptime", version, about = "Terminal interview preparation: aptitude rounds and a coding arena")]
struct Cli {
    #[arg(short, long, help = "Base URL of the question and execution services")]
    base_url: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, value_parser = ["python3", "java", "cpp"], help = "Starting language in the workspace")]
    language: Option<String>,

    #[arg(long, help = "Keep the topic cache in memory for this run only")]
    no_cache: bool,

    #[arg(long, help = "Write the effective settings to the config file and exit")]
    save_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = logging::init() {
        eprintln!("warning: logging disabled: {err}");
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to load config, using defaults");
        Config::default()
    });
    if let Some(url) = cli.base_url {
        config.api_base_url = url;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(language) = cli.language {
        config.default_language = language;
    }
    config.normalize();

    if cli.save_config {
        config.save()?;
        println!("Saved settings to {}", Config::config_path().display());
        return Ok(());
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        tracing::warn!(
            theme = %config.theme,
            available = ?Theme::available_themes(),
            "unknown theme, using default"
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));
    let remote = HttpRemote::new(&config.api_base_url, config.request_timeout())?;
    tracing::info!(base_url = %config.api_base_url, "remote configured");

    let cache = if cli.no_cache {
        TopicCache::in_memory()
    } else {
        match JsonFileBackend::new(&config.cache_path()) {
            Ok(backend) => TopicCache::open(Box::new(backend)),
            Err(err) => {
                tracing::warn!(error = %err, "topic cache unavailable, using memory");
                TopicCache::in_memory()
            }
        }
    };

    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(config, theme, Arc::new(remote), cache, events.sender());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "exiting on error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Remote(reply) => app.handle_reply(reply),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Portal => handle_portal_key(app, key),
        AppScreen::Companies => handle_companies_key(app, key),
        AppScreen::Assessment => handle_assessment_key(app, key),
        AppScreen::Roadmap => handle_roadmap_key(app, key),
        AppScreen::Problems => handle_problems_key(app, key),
        AppScreen::Workspace => handle_workspace_key(app, key),
    }
}

fn run_portal_action(app: &mut App, action: PortalAction) {
    match action {
        PortalAction::Aptitude => app.go_to_companies(),
        PortalAction::Coding => app.go_to_roadmap(),
        PortalAction::PurgeCache => app.purge_cache(),
        PortalAction::Quit => app.should_quit = true,
    }
}

fn handle_portal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            let action = app.menu.selected_action();
            run_portal_action(app, action);
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                run_portal_action(app, action);
            }
        }
        _ => {}
    }
}

fn handle_companies_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_portal(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.company_selected = picker::step(app.company_selected, COMPANIES.len(), false);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.company_selected = picker::step(app.company_selected, COMPANIES.len(), true);
        }
        KeyCode::Enter => app.start_selected_assessment(),
        KeyCode::Char('r') => app.retry(),
        _ => {}
    }
}

fn handle_assessment_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('x')) {
        app.terminate_assessment();
        return;
    }
    let Some(session) = app.assessment.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char(ch @ '1'..='9') => {
            let idx = ch as usize - '1' as usize;
            session.select_current(idx);
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => session.next(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => session.prev(),
        KeyCode::Home => session.navigate(0),
        KeyCode::End => session.navigate(session.len() - 1),
        KeyCode::Char('s') => {
            session.submit();
        }
        _ => {}
    }
}

fn handle_roadmap_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_portal(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.topic_selected = picker::step(app.topic_selected, TOPICS.len(), false);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.topic_selected = picker::step(app.topic_selected, TOPICS.len(), true);
        }
        KeyCode::Enter => app.open_selected_topic(),
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('p') => app.purge_cache(),
        _ => {}
    }
}

fn handle_problems_key(app: &mut App, key: KeyEvent) {
    let len = app.topic_problems.len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_roadmap(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.problem_selected = picker::step(app.problem_selected, len, false);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.problem_selected = picker::step(app.problem_selected, len, true);
        }
        KeyCode::Enter => app.open_selected_problem(),
        _ => {}
    }
}

fn handle_workspace_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            app.leave_workspace();
            return;
        }
        KeyCode::F(5) => {
            app.run_code();
            return;
        }
        KeyCode::Char('r') if ctrl => {
            app.run_code();
            return;
        }
        _ => {}
    }

    let Some(ws) = app.workspace.as_mut() else {
        return;
    };

    if matches!(key.code, KeyCode::F(6)) || (ctrl && key.code == KeyCode::Char('l')) {
        ws.cycle_language();
        return;
    }

    if ws.is_read_only() {
        if let Some(gate) = ws.gate_mut() {
            match key.code {
                KeyCode::Left => gate.cycle_ds(false),
                KeyCode::Right => gate.cycle_ds(true),
                KeyCode::Up => gate.cycle_tc(false),
                KeyCode::Down => gate.cycle_tc(true),
                KeyCode::Enter => {
                    gate.check_selection();
                }
                _ => {}
            }
        }
        return;
    }

    match key.code {
        KeyCode::Char(ch) if !ctrl => ws.edit(|b| b.insert_char(ch)),
        KeyCode::Enter => ws.edit(|b| b.newline()),
        KeyCode::Tab => ws.edit(|b| b.tab()),
        KeyCode::Backspace => ws.edit(|b| b.backspace()),
        KeyCode::Delete => ws.edit(|b| b.delete()),
        KeyCode::Left => ws.edit(|b| b.left()),
        KeyCode::Right => ws.edit(|b| b.right()),
        KeyCode::Up => ws.edit(|b| b.up()),
        KeyCode::Down => ws.edit(|b| b.down()),
        KeyCode::Home => ws.edit(|b| b.home()),
        KeyCode::End => ws.edit(|b| b.end()),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Portal => render_portal(frame, app),
        AppScreen::Companies => render_companies(frame, app),
        AppScreen::Assessment => render_assessment(frame, app),
        AppScreen::Roadmap => render_roadmap(frame, app),
        AppScreen::Problems => render_problems(frame, app),
        AppScreen::Workspace => render_workspace(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, info: &str) {
    let colors = &app.theme.colors;
    let mut spans = vec![
        Span::styled(
            " PREP TIME ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {info}"),
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ];
    if app.is_loading() {
        spans.push(Span::styled(
            "  | generating...",
            Style::default().fg(colors.accent()).bg(colors.header_bg()),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let colors = &app.theme.colors;
    let mut lines = Vec::new();
    if let Some(notice) = &app.notice {
        let fg = if notice.is_error {
            colors.error()
        } else {
            colors.success()
        };
        lines.push(Line::from(Span::styled(
            format!("  {}", notice.text),
            Style::default().fg(fg),
        )));
    }
    for hint in layout::pack_hint_lines(hints, area.width as usize) {
        lines.push(Line::from(Span::styled(hint, Style::default().fg(colors.muted()))));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_portal(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let app_layout = AppLayout::new(area, 0);

    let info = format!("{} cached topic(s)", app.cache().len());
    render_header(frame, app, app_layout.header, &info);

    let menu_area = layout::centered_rect(50, 80, app_layout.main);
    frame.render_widget(&app.menu, menu_area);

    render_footer(frame, app, app_layout.footer, &["[1-2] Enter", "[p] Purge cache", "[q] Quit"]);
}

fn render_companies(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let app_layout = AppLayout::new(area, 0);
    render_header(frame, app, app_layout.header, "Aptitude | choose a company");

    let rows = COMPANIES
        .iter()
        .map(|c| PickerRow {
            label: c.name.to_string(),
            detail: c.category.to_string(),
            enabled: true,
        })
        .collect();
    let list_area = layout::centered_rect(60, 90, app_layout.main);
    frame.render_widget(
        Picker::new("Companies", rows, app.company_selected, app.theme),
        list_area,
    );

    render_footer(
        frame,
        app,
        app_layout.footer,
        &["[j/k] Move", "[Enter] Start", "[r] Retry", "[Esc] Back"],
    );
}

fn render_assessment(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(session) = app.assessment.as_ref() else {
        return;
    };
    let app_layout = AppLayout::new(area, 15);

    let info = if session.is_submitted() {
        let summary = session.summary();
        format!(
            "{} | Score {}/{} ({:.0}%) in {}m{:02}s | review",
            session.company,
            summary.score,
            summary.total,
            summary.percent(),
            summary.elapsed_secs / 60,
            summary.elapsed_secs % 60
        )
    } else {
        format!(
            "{} | Question {}/{} | {} answered",
            session.company,
            session.current_index() + 1,
            session.len(),
            session.answers().len()
        )
    };
    render_header(frame, app, app_layout.header, &info);

    if let Some(side) = app_layout.side {
        frame.render_widget(QuestionMatrix::new(session, app.theme), side);
    }
    frame.render_widget(QuestionCard::new(session, app.theme), app_layout.main);

    let hints: &[&str] = if session.is_submitted() {
        &["[h/l] Review", "[x] Close"]
    } else {
        &["[1-9] Answer", "[h/l] Prev/Next", "[s] Submit", "[x] Terminate"]
    };
    render_footer(frame, app, app_layout.footer, hints);
}

fn render_roadmap(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let app_layout = AppLayout::new(area, 0);
    render_header(frame, app, app_layout.header, "Coding arena | roadmap");

    let rows = TOPICS
        .iter()
        .map(|t| {
            let cached = if app.cache().contains(t.name) { " | cached" } else { "" };
            PickerRow {
                label: t.name.to_string(),
                detail: format!("{} | {} problems{cached}", t.difficulty, t.problems),
                enabled: t.unlocked,
            }
        })
        .collect();
    let list_area = layout::centered_rect(60, 90, app_layout.main);
    frame.render_widget(
        Picker::new("Topics", rows, app.topic_selected, app.theme),
        list_area,
    );

    render_footer(
        frame,
        app,
        app_layout.footer,
        &["[j/k] Move", "[Enter] Open", "[r] Retry", "[p] Purge cache", "[Esc] Back"],
    );
}

fn render_problems(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let app_layout = AppLayout::new(area, 0);
    let topic = app.active_topic.as_deref().unwrap_or("");
    render_header(frame, app, app_layout.header, &format!("Coding arena | {topic}"));

    let rows = app
        .topic_problems
        .iter()
        .map(|p| PickerRow {
            label: p.name.clone(),
            detail: if p.difficulty.is_empty() {
                format!("{} example(s)", p.examples.len())
            } else {
                format!("{} | {} example(s)", p.difficulty, p.examples.len())
            },
            enabled: true,
        })
        .collect();
    let list_area = layout::centered_rect(70, 90, app_layout.main);
    frame.render_widget(
        Picker::new("Problems", rows, app.problem_selected, app.theme)
            .empty_text("The service returned no problems for this topic."),
        list_area,
    );

    render_footer(
        frame,
        app,
        app_layout.footer,
        &["[j/k] Move", "[Enter] Workspace", "[Esc] Roadmap"],
    );
}

fn render_workspace(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(ws) = app.workspace.as_ref() else {
        return;
    };
    let app_layout = AppLayout::new(area, 35);

    let status = if ws.is_running() { " | running" } else { "" };
    let info = format!("{} | {}{status}", ws.problem.name, ws.language().label());
    render_header(frame, app, app_layout.header, &info);

    match app_layout.side {
        Some(side) => {
            frame.render_widget(ProblemPanel::new(&ws.problem, app.theme), side);
            frame.render_widget(EditorPanel::new(ws, app.theme), app_layout.main);
        }
        None => frame.render_widget(EditorPanel::new(ws, app.theme), app_layout.main),
    }

    let hints: &[&str] = if ws.is_read_only() {
        &["[Left/Right] Structure", "[Up/Down] Complexity", "[Enter] Verify", "[F5] Run", "[Esc] Back"]
    } else {
        &["[Ctrl-R/F5] Run", "[Ctrl-L/F6] Language", "[Esc] Back"]
    };
    render_footer(frame, app, app_layout.footer, hints);
}
