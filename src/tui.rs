use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::path::PathBuf;

use crate::auth::Session;
use crate::dashboard::{CandidateView, InvestorView, RecruiterDashboard};
use crate::filters::{CandidateQuery, InvestorQuery, PostingQuery};
use crate::models::{ApplicationStatus, Decision, Posting};
use crate::notice::{Level, Notice};
use crate::review::{self, ApplicantKind};
use crate::store::DocumentStore;
use crate::theme::{Palette, Theme};
use crate::truncate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One full-screen list/detail view.
pub trait Screen {
    fn len(&self) -> usize;
    fn selected(&self) -> usize;
    fn draw(&self, frame: &mut Frame, list_state: &mut ListState, palette: Palette);
    fn on_key(&mut self, code: KeyCode, store: &dyn DocumentStore) -> Flow;
}

#[derive(Debug, Default)]
struct Cursor {
    selected: usize,
    scroll_offset: u16,
}

impl Cursor {
    fn next(&mut self, len: usize) {
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
            self.scroll_offset = 0;
        }
    }

    fn reset(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }
}

/// Feeds a key to the search box while it has focus. Returns whether the key
/// was consumed.
fn edit_search(editing: &mut bool, search: &mut String, code: KeyCode) -> bool {
    if !*editing {
        return false;
    }
    match code {
        KeyCode::Enter | KeyCode::Esc => *editing = false,
        KeyCode::Backspace => {
            search.pop();
        }
        KeyCode::Char(c) => search.push(c),
        _ => {}
    }
    true
}

fn decision_key(decision: Decision) -> char {
    match decision {
        Decision::Accept => 'a',
        Decision::Reject => 'x',
    }
}

fn status_style(status: ApplicationStatus) -> Style {
    match status {
        ApplicationStatus::Pending => Style::default().fg(Color::Yellow),
        ApplicationStatus::Accepted => Style::default().fg(Color::Green),
        ApplicationStatus::Rejected => Style::default().fg(Color::Red),
    }
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn field(label: &str, value: &str) -> Option<Line<'static>> {
    if value.trim().is_empty() {
        None
    } else {
        Some(Line::from(format!("{}: {}", label, value)))
    }
}

fn paragraph(lines: &mut Vec<Line<'static>>, title: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }
    lines.push(Line::from(""));
    lines.push(heading(title.to_uppercase()));
    for line in textwrap::fill(body, 70).lines() {
        lines.push(Line::from(format!("  {}", line)));
    }
}

struct Areas {
    list: Rect,
    detail: Rect,
    help: Rect,
    notice: Rect,
}

fn split(area: Rect) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);
    Areas {
        list: cols[0],
        detail: cols[1],
        help: rows[1],
        notice: rows[2],
    }
}

#[allow(clippy::too_many_arguments)]
fn render(
    frame: &mut Frame,
    list_state: &mut ListState,
    palette: Palette,
    title: String,
    items: Vec<ListItem<'static>>,
    detail: Text<'static>,
    scroll_offset: u16,
    help: String,
    notice: Option<&Notice>,
) {
    let areas = split(frame.area());

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(palette.text))
        .highlight_style(
            Style::default()
                .bg(palette.highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, areas.list, list_state);

    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .style(Style::default().fg(palette.text))
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0));
    frame.render_widget(detail_widget, areas.detail);

    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(palette.muted)),
        areas.help,
    );

    if let Some(notice) = notice {
        let color = match notice.level {
            Level::Info => palette.accent,
            Level::Error => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(format!(" {}", notice)).style(Style::default().fg(color)),
            areas.notice,
        );
    }
}

fn search_label(search: &str, editing: bool) -> String {
    if editing {
        format!("  search: {}_", search)
    } else if search.is_empty() {
        String::new()
    } else {
        format!("  search: {}", search)
    }
}

// --- Idea browsing (developers and investors) ---

pub struct BrowseScreen {
    heading: String,
    ideas: Vec<Posting>,
    query: PostingQuery,
    session: Session,
    session_path: PathBuf,
    cursor: Cursor,
    editing: bool,
    notice: Option<Notice>,
}

impl BrowseScreen {
    pub fn new(
        heading: String,
        ideas: Vec<Posting>,
        mut query: PostingQuery,
        session: Session,
        session_path: PathBuf,
    ) -> Self {
        query.saved = session.saved_ideas.iter().cloned().collect();
        Self {
            heading,
            ideas,
            query,
            session,
            session_path,
            cursor: Cursor::default(),
            editing: false,
            notice: None,
        }
    }

    fn visible(&self) -> Vec<&Posting> {
        self.query.apply(&self.ideas)
    }

    fn current(&self) -> Option<&Posting> {
        self.visible().get(self.cursor.selected).copied()
    }

    fn toggle_saved(&mut self) {
        let Some(id) = self.current().map(|p| p.id.clone()) else {
            return;
        };
        let saved = self.session.toggle_saved(&id);
        self.query.saved = self.session.saved_ideas.iter().cloned().collect();
        self.notice = Some(match self.session.save(&self.session_path) {
            Ok(()) if saved => Notice::info("Saved", "Idea added to saved ideas"),
            Ok(()) => Notice::info("Saved", "Idea removed from saved ideas"),
            Err(e) => Notice::from(&e),
        });
    }

    fn help_line(&self) -> String {
        format!(
            " j/k:navigate  J/K:scroll  /:search  t:tab({})  e:experience({})  s:sort({})  b:save  q:quit{}",
            self.query.tab.label(),
            self.query.experience.label(),
            self.query.sort.label(),
            search_label(&self.query.search, self.editing),
        )
    }

    fn detail(&self) -> Text<'static> {
        let Some(p) = self.current() else {
            return Text::raw("No ideas match the current filters");
        };
        let mut lines = vec![heading(p.cofounder_role.clone())];
        lines.push(Line::from(format!("at {}", p.company_name)));
        if self.session.saved_ideas.contains(&p.id) {
            lines.push(Line::from("(saved)"));
        }
        lines.push(Line::from(""));
        lines.extend(
            [
                field("Experience required", &p.experience_required),
                field("Salary", &p.salary_range),
                field("Equity", &p.equity_range),
                field("Funding stage", &p.funding_stage),
                field("Company size", &p.company_size),
                field("Tech stack", &p.tech_stack),
                field("Website", &p.company_website),
                field("Contact", &p.email),
                field("Posted", &p.created_at),
            ]
            .into_iter()
            .flatten(),
        );
        paragraph(&mut lines, "Idea", &p.idea_description);
        paragraph(&mut lines, "Responsibilities", &p.responsibilities);
        paragraph(&mut lines, "Ideal candidate", &p.ideal_candidate);
        lines.push(Line::from(""));
        lines.push(Line::from(format!("id: {}", p.id)));
        Text::from(lines)
    }
}

impl Screen for BrowseScreen {
    fn len(&self) -> usize {
        self.visible().len()
    }

    fn selected(&self) -> usize {
        self.cursor.selected
    }

    fn draw(&self, frame: &mut Frame, list_state: &mut ListState, palette: Palette) {
        let items: Vec<ListItem<'static>> = self
            .visible()
            .iter()
            .map(|p| {
                let mark = if self.session.saved_ideas.contains(&p.id) { "*" } else { " " };
                ListItem::new(format!(
                    "{} {} | {}",
                    mark,
                    truncate(&p.cofounder_role, 24),
                    truncate(&p.company_name, 18)
                ))
            })
            .collect();
        let title = format!(" {} - Ideas ({}) ", self.heading, items.len());
        render(
            frame,
            list_state,
            palette,
            title,
            items,
            self.detail(),
            self.cursor.scroll_offset,
            self.help_line(),
            self.notice.as_ref(),
        );
    }

    fn on_key(&mut self, code: KeyCode, _store: &dyn DocumentStore) -> Flow {
        if edit_search(&mut self.editing, &mut self.query.search, code) {
            self.cursor.clamp(self.len());
            return Flow::Continue;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Down | KeyCode::Char('j') => self.cursor.next(self.len()),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.prev(),
            KeyCode::Char('J') | KeyCode::PageDown => self.cursor.scroll_down(),
            KeyCode::Char('K') | KeyCode::PageUp => self.cursor.scroll_up(),
            KeyCode::Char('/') => self.editing = true,
            KeyCode::Char('t') => {
                self.query.tab = self.query.tab.next();
                self.cursor.reset();
            }
            KeyCode::Char('e') => self.query.experience = self.query.experience.next(),
            KeyCode::Char('s') => self.query.sort = self.query.sort.toggled(),
            KeyCode::Char('b') => self.toggle_saved(),
            _ => {}
        }
        self.cursor.clamp(self.len());
        Flow::Continue
    }
}

// --- Founder review ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Developers,
    Investors,
}

pub struct ReviewScreen {
    dashboard: RecruiterDashboard,
    pane: Pane,
    candidates: CandidateQuery,
    investors: InvestorQuery,
    cursor: Cursor,
    editing: bool,
    notice: Option<Notice>,
}

impl ReviewScreen {
    pub fn new(dashboard: RecruiterDashboard, candidates: CandidateQuery, investors: InvestorQuery) -> Self {
        Self {
            dashboard,
            pane: Pane::Developers,
            candidates,
            investors,
            cursor: Cursor::default(),
            editing: false,
            notice: None,
        }
    }

    fn visible_candidates(&self) -> Vec<&CandidateView> {
        self.candidates.apply(&self.dashboard.candidates)
    }

    fn visible_investors(&self) -> Vec<&InvestorView> {
        self.investors.apply(&self.dashboard.investors)
    }

    /// Id and status of the highlighted application.
    fn current(&self) -> Option<(String, ApplicationStatus)> {
        match self.pane {
            Pane::Developers => self
                .visible_candidates()
                .get(self.cursor.selected)
                .map(|c| (c.id.clone(), c.status)),
            Pane::Investors => self
                .visible_investors()
                .get(self.cursor.selected)
                .map(|i| (i.id.clone(), i.status)),
        }
    }

    fn review(&mut self, store: &dyn DocumentStore, decision: Decision) {
        let Some((id, status)) = self.current() else {
            return;
        };
        // keys only act when the current status offers the decision
        if !status.decisions().contains(&decision) {
            return;
        }
        let kind = match self.pane {
            Pane::Developers => ApplicantKind::Developer,
            Pane::Investors => ApplicantKind::Investor,
        };
        self.notice = Some(match review::decide(store, &mut self.dashboard, kind, &id, decision) {
            Ok(next) => Notice::reviewed(next),
            Err(e) => Notice::from(&e),
        });
    }

    fn help_line(&self) -> String {
        let mut keys: Vec<String> = vec![
            "j/k:navigate".into(),
            "tab:switch".into(),
            "/:search".into(),
        ];
        match self.pane {
            Pane::Developers => {
                keys.push(format!("t:status({})", self.candidates.status.label()));
                keys.push(format!("e:experience({})", self.candidates.experience.label()));
                keys.push(format!("s:sort({})", self.candidates.sort.label()));
            }
            Pane::Investors => {
                keys.push(format!("t:status({})", self.investors.status.label()));
                keys.push(format!("w:net worth({})", self.investors.net_worth.label()));
                keys.push(format!("s:sort({})", self.investors.sort.label()));
            }
        }
        let decisions = self.current().map(|(_, s)| s.decisions()).unwrap_or(&[]);
        for decision in decisions {
            keys.push(format!("{}:{}", decision_key(*decision), decision));
        }
        keys.push("q:quit".into());
        let search = match self.pane {
            Pane::Developers => &self.candidates.search,
            Pane::Investors => &self.investors.search,
        };
        format!(" {}{}", keys.join("  "), search_label(search, self.editing))
    }

    fn candidate_detail(c: &CandidateView) -> Text<'static> {
        let mut lines = vec![heading(c.name.clone())];
        lines.push(Line::from(Span::styled(
            format!("Status: {}", c.status),
            status_style(c.status),
        )));
        lines.push(Line::from(""));
        let education = match (c.degree.is_empty(), c.university.is_empty()) {
            (false, false) => format!("{}, {}", c.degree, c.university),
            (false, true) => c.degree.clone(),
            (true, false) => c.university.clone(),
            (true, true) => String::new(),
        };
        lines.extend(
            [
                field("Email", &c.email),
                field("GitHub", &c.github),
                field("Experience", &c.experience),
                field("Skills", &c.skills.join(", ")),
                field("Education", &education),
                field("Graduation", &c.graduation_year),
                field("Resume", &c.resume),
                field("WhatsApp", &c.whatsapp_number),
                field("Applied", &c.applied_date),
                field("Idea", &c.idea_id),
            ]
            .into_iter()
            .flatten(),
        );
        paragraph(&mut lines, "Cover letter", &c.cover_letter);
        Text::from(lines)
    }

    fn investor_detail(i: &InvestorView) -> Text<'static> {
        let mut lines = vec![heading(i.name.clone())];
        lines.push(Line::from(Span::styled(
            format!("Status: {}", i.status),
            status_style(i.status),
        )));
        lines.push(Line::from(""));
        let portfolio = if i.portfolio_value > 0.0 {
            format!("${:.0}", i.portfolio_value)
        } else {
            String::new()
        };
        lines.extend(
            [
                field("Email", &i.email),
                field("Net worth", &i.net_worth),
                field("Interests", &i.investment_interests),
                field("Portfolio value", &portfolio),
                field("WhatsApp", &i.whatsapp_number),
                field("Applied", &i.applied_date),
                field("Idea", &i.idea_id),
            ]
            .into_iter()
            .flatten(),
        );
        paragraph(&mut lines, "Past investments", &i.past_investments);
        if !i.investment_history.is_empty() {
            lines.push(Line::from(""));
            lines.push(heading("HISTORY"));
            for entry in &i.investment_history {
                lines.push(Line::from(format!("  - {}", entry)));
            }
        }
        paragraph(&mut lines, "Cover letter", &i.cover_letter);
        Text::from(lines)
    }
}

impl Screen for ReviewScreen {
    fn len(&self) -> usize {
        match self.pane {
            Pane::Developers => self.visible_candidates().len(),
            Pane::Investors => self.visible_investors().len(),
        }
    }

    fn selected(&self) -> usize {
        self.cursor.selected
    }

    fn draw(&self, frame: &mut Frame, list_state: &mut ListState, palette: Palette) {
        let (title, items, detail) = match self.pane {
            Pane::Developers => {
                let visible = self.visible_candidates();
                let items = visible
                    .iter()
                    .map(|c| {
                        ListItem::new(Line::from(vec![
                            Span::styled(format!("{:<9}", c.status.as_str()), status_style(c.status)),
                            Span::raw(format!("{} | {}", truncate(&c.name, 22), c.applied_date)),
                        ]))
                    })
                    .collect::<Vec<_>>();
                let detail = visible
                    .get(self.cursor.selected)
                    .map(|c| Self::candidate_detail(c))
                    .unwrap_or_else(|| Text::raw("No developer applications match"));
                (format!(" {} - Developers ({}) ", self.dashboard.headline(), visible.len()), items, detail)
            }
            Pane::Investors => {
                let visible = self.visible_investors();
                let items = visible
                    .iter()
                    .map(|i| {
                        ListItem::new(Line::from(vec![
                            Span::styled(format!("{:<9}", i.status.as_str()), status_style(i.status)),
                            Span::raw(format!("{} | {}", truncate(&i.name, 22), truncate(&i.net_worth, 12))),
                        ]))
                    })
                    .collect::<Vec<_>>();
                let detail = visible
                    .get(self.cursor.selected)
                    .map(|i| Self::investor_detail(i))
                    .unwrap_or_else(|| Text::raw("No investor applications match"));
                (format!(" {} - Investors ({}) ", self.dashboard.headline(), visible.len()), items, detail)
            }
        };
        render(
            frame,
            list_state,
            palette,
            title,
            items,
            detail,
            self.cursor.scroll_offset,
            self.help_line(),
            self.notice.as_ref(),
        );
    }

    fn on_key(&mut self, code: KeyCode, store: &dyn DocumentStore) -> Flow {
        let search = match self.pane {
            Pane::Developers => &mut self.candidates.search,
            Pane::Investors => &mut self.investors.search,
        };
        if edit_search(&mut self.editing, search, code) {
            self.cursor.clamp(self.len());
            return Flow::Continue;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Down | KeyCode::Char('j') => self.cursor.next(self.len()),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.prev(),
            KeyCode::Char('J') | KeyCode::PageDown => self.cursor.scroll_down(),
            KeyCode::Char('K') | KeyCode::PageUp => self.cursor.scroll_up(),
            KeyCode::Tab => {
                self.pane = match self.pane {
                    Pane::Developers => Pane::Investors,
                    Pane::Investors => Pane::Developers,
                };
                self.cursor.reset();
            }
            KeyCode::Char('/') => self.editing = true,
            KeyCode::Char('t') => match self.pane {
                Pane::Developers => self.candidates.status = self.candidates.status.next(),
                Pane::Investors => self.investors.status = self.investors.status.next(),
            },
            KeyCode::Char('s') => match self.pane {
                Pane::Developers => self.candidates.sort = self.candidates.sort.toggled(),
                Pane::Investors => self.investors.sort = self.investors.sort.toggled(),
            },
            KeyCode::Char('e') if self.pane == Pane::Developers => {
                self.candidates.experience = self.candidates.experience.next();
            }
            KeyCode::Char('w') if self.pane == Pane::Investors => {
                self.investors.net_worth = self.investors.net_worth.next();
            }
            KeyCode::Char(c) => {
                if let Some(decision) = [Decision::Accept, Decision::Reject]
                    .into_iter()
                    .find(|d| decision_key(*d) == c)
                {
                    self.review(store, decision);
                }
            }
            _ => {}
        }
        self.cursor.clamp(self.len());
        Flow::Continue
    }
}

/// Runs a screen until the user quits, restoring the terminal afterwards.
pub fn run<S: Screen>(store: &dyn DocumentStore, screen: &mut S, theme: Theme) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, screen, store, theme.palette());

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop<S: Screen>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    screen: &mut S,
    store: &dyn DocumentStore,
    palette: Palette,
) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        list_state.select(if screen.len() == 0 { None } else { Some(screen.selected()) });
        terminal.draw(|frame| screen.draw(frame, &mut list_state, palette))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if screen.on_key(key.code, store) == Flow::Quit {
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::IdentityAssertion;
    use crate::filters::{PostingTab, StatusTab};
    use crate::models::{Application, DeveloperProfile, Role};
    use crate::repo::{ApplicationStore, ProfileStore};
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn press(screen: &mut impl Screen, store: &dyn DocumentStore, keys: &str) {
        for c in keys.chars() {
            screen.on_key(KeyCode::Char(c), store);
        }
    }

    fn idea(id: &str, role: &str, stack: &str, created_at: &str) -> Posting {
        Posting {
            id: id.into(),
            cofounder_role: role.into(),
            company_name: "Acme".into(),
            tech_stack: stack.into(),
            created_at: created_at.into(),
            ..Default::default()
        }
    }

    fn browse_screen(session_path: PathBuf) -> BrowseScreen {
        let session = Session::new(
            Role::Developer,
            IdentityAssertion {
                uid: "d1".into(),
                ..Default::default()
            },
        );
        BrowseScreen::new(
            "Dev".into(),
            vec![
                idea("i1", "CTO", "Rust", "2024-01-01T00:00:00Z"),
                idea("i2", "CMO", "Marketing", "2024-02-01T00:00:00Z"),
            ],
            PostingQuery::default(),
            session,
            session_path,
        )
    }

    #[test]
    fn test_browse_search_box_filters_live() {
        let dir = tempdir().unwrap();
        let store = MemoryStore::new();
        let mut screen = browse_screen(dir.path().join("session.json"));
        assert_eq!(screen.len(), 2);

        press(&mut screen, &store, "/rust");
        assert!(screen.editing);
        assert_eq!(screen.len(), 1);
        screen.on_key(KeyCode::Enter, &store);
        assert!(!screen.editing);
        assert_eq!(screen.current().map(|p| p.id.as_str()), Some("i1"));

        // 'q' typed into the search box does not quit
        press(&mut screen, &store, "/");
        assert_eq!(screen.on_key(KeyCode::Char('q'), &store), Flow::Continue);
        assert_eq!(screen.len(), 0);
    }

    #[test]
    fn test_browse_save_toggle_persists_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = MemoryStore::new();
        let mut screen = browse_screen(path.clone());

        // newest first: i2 is highlighted
        press(&mut screen, &store, "b");
        assert!(screen.session.saved_ideas.contains("i2"));
        let stored = Session::load(&path).unwrap().unwrap();
        assert!(stored.saved_ideas.contains("i2"));

        press(&mut screen, &store, "t");
        assert_eq!(screen.query.tab, PostingTab::Saved);
        assert_eq!(screen.len(), 1);

        press(&mut screen, &store, "b");
        assert_eq!(screen.len(), 0);
        assert!(Session::load(&path).unwrap().unwrap().saved_ideas.is_empty());
    }

    fn review_screen() -> (MemoryStore, ReviewScreen) {
        let store = MemoryStore::new();
        ProfileStore::new(&store)
            .create(&DeveloperProfile {
                uid: "d1".into(),
                first_name: "Dana".into(),
                last_name: "Dev".into(),
                experience: "2".into(),
                skills: "Rust".into(),
                ..Default::default()
            })
            .unwrap();
        ApplicationStore::new(&store)
            .create(&Application {
                idea_id: "i1".into(),
                developer_id: "d1".into(),
                recruiter_id: "r1".into(),
                created_at: "2024-03-01T10:00:00Z".into(),
                ..Default::default()
            })
            .unwrap();
        let dashboard = RecruiterDashboard::load(&store, "r1").unwrap();
        let screen = ReviewScreen::new(dashboard, CandidateQuery::default(), InvestorQuery::default());
        (store, screen)
    }

    #[test]
    fn test_pending_application_offers_both_decisions() {
        let (_store, screen) = review_screen();
        let help = screen.help_line();
        assert!(help.contains("a:accept"));
        assert!(help.contains("x:reject"));
    }

    #[test]
    fn test_accept_updates_store_and_view() {
        let (store, mut screen) = review_screen();
        press(&mut screen, &store, "a");

        assert_eq!(screen.dashboard.candidates[0].status, ApplicationStatus::Accepted);
        assert_eq!(
            screen.notice.as_ref().map(|n| n.message.as_str()),
            Some("Application accepted successfully")
        );
        let id = screen.dashboard.candidates[0].id.clone();
        let stored: Application = ApplicationStore::new(&store).get(&id).unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::Accepted);
        assert!(stored.updated_at.is_some());
    }

    #[test]
    fn test_decided_application_has_no_controls() {
        let (store, mut screen) = review_screen();
        press(&mut screen, &store, "a");
        screen.notice = None;

        assert!(!screen.help_line().contains("x:reject"));
        assert!(!screen.help_line().contains("a:accept"));

        press(&mut screen, &store, "x");
        assert_eq!(screen.dashboard.candidates[0].status, ApplicationStatus::Accepted);
        assert!(screen.notice.is_none());
    }

    #[test]
    fn test_status_tab_hides_decided_applications() {
        let (store, mut screen) = review_screen();
        press(&mut screen, &store, "a");
        press(&mut screen, &store, "t");
        assert_eq!(screen.candidates.status, StatusTab::Pending);
        assert_eq!(screen.len(), 0);
        assert!(screen.current().is_none());
    }

    #[test]
    fn test_tab_switches_to_empty_investor_pane() {
        let (store, mut screen) = review_screen();
        screen.on_key(KeyCode::Tab, &store);
        assert_eq!(screen.pane, Pane::Investors);
        assert_eq!(screen.len(), 0);
        assert!(screen.help_line().contains("w:net worth(all)"));
    }
}
