use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::{Phase, ViewState};
use crate::models::Property;

pub const PLACEHOLDER_OPTION: &str = "Select Project";
pub const LOADING_TEXT: &str = "Loading properties...";
pub const EMPTY_TEXT: &str = "Select a project to view properties.";
const BANNER: &str = "Note :- Added properties of project will be listed below the properties table.";
const TABLE_TITLE: &str = "Select Project Properties to add";
const INPUT_POLL: Duration = Duration::from_millis(100);

/// What the property area shows, in priority order
#[derive(Debug, PartialEq)]
pub enum Body<'a> {
    Loading,
    Error(&'a str),
    Placeholder,
    Table(&'a [Property]),
}

pub fn body_for(view: &ViewState) -> Body<'_> {
    match view.phase() {
        Phase::Loading => Body::Loading,
        Phase::Error => Body::Error(view.error().unwrap_or_default()),
        Phase::Idle | Phase::Loaded if view.properties().is_empty() => Body::Placeholder,
        Phase::Idle | Phase::Loaded => Body::Table(view.properties()),
    }
}

/// Dropdown entries: the placeholder followed by every known project
pub fn dropdown_options(view: &ViewState) -> Vec<String> {
    std::iter::once(PLACEHOLDER_OPTION.to_string())
        .chain(view.projects().iter().map(|p| p.label()))
        .collect()
}

/// Value submitted when the dropdown option at `index` is chosen.
/// The placeholder submits an empty value.
fn option_value(view: &ViewState, index: usize) -> String {
    index
        .checked_sub(1)
        .and_then(|i| view.projects().get(i))
        .map(|p| p.id.to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Dropdown,
    Table,
}

pub enum PickerAction {
    Quit,
    Choose(String),
    Add(Property),
}

// Represents the cursor state of the picker screen.
// Everything else comes from the view state.
pub struct PickerState {
    focus: Focus,
    dropdown: ListState,
    table: TableState,
    row_key: Option<String>,
}

impl PickerState {
    pub fn new() -> Self {
        let mut dropdown = ListState::default();
        dropdown.select(Some(0));

        Self {
            focus: Focus::Dropdown,
            dropdown,
            table: TableState::default(),
            row_key: None,
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Dropdown => Focus::Table,
            Focus::Table => Focus::Dropdown,
        };
    }

    /// Clamp the cursors to the current lists. The table cursor follows
    /// the highlighted row's `_id` when the list is replaced.
    pub fn sync(&mut self, view: &ViewState) {
        // Dropdown: the project list only grows from empty, so a clamp is enough
        let options = view.projects().len() + 1;
        let current = self.dropdown.selected().unwrap_or(0).min(options - 1);
        self.dropdown.select(Some(current));

        let rows = view.properties();
        if rows.is_empty() {
            self.table.select(None);
            self.row_key = None;
            return;
        }

        // Table: stay put if the row under the cursor is unchanged,
        // otherwise chase its _id, otherwise clamp
        let same_row = self
            .table
            .selected()
            .filter(|&i| rows.get(i).map(|p| &p.id) == self.row_key.as_ref());
        let by_key = || {
            self.row_key
                .as_ref()
                .and_then(|key| rows.iter().position(|p| &p.id == key))
        };
        let index = same_row
            .or_else(by_key)
            .unwrap_or_else(|| self.table.selected().unwrap_or(0).min(rows.len() - 1));

        self.table.select(Some(index));
        self.row_key = Some(rows[index].id.clone());
    }

    fn next(&mut self, view: &ViewState) {
        match self.focus {
            Focus::Dropdown => {
                let len = view.projects().len() + 1;
                let i = self.dropdown.selected().map_or(0, |i| (i + 1) % len);
                self.dropdown.select(Some(i));
            }
            Focus::Table => {
                let rows = view.properties();
                if rows.is_empty() {
                    return;
                }
                let i = self.table.selected().map_or(0, |i| (i + 1) % rows.len());
                self.table.select(Some(i));
                self.row_key = Some(rows[i].id.clone());
            }
        }
    }

    fn previous(&mut self, view: &ViewState) {
        match self.focus {
            Focus::Dropdown => {
                let len = view.projects().len() + 1;
                let i = match self.dropdown.selected() {
                    Some(0) | None => len - 1,
                    Some(i) => i - 1,
                };
                self.dropdown.select(Some(i));
            }
            Focus::Table => {
                let rows = view.properties();
                if rows.is_empty() {
                    return;
                }
                let i = match self.table.selected() {
                    Some(0) | None => rows.len() - 1,
                    Some(i) => i - 1,
                };
                self.table.select(Some(i));
                self.row_key = Some(rows[i].id.clone());
            }
        }
    }

    fn highlighted_property<'a>(&self, view: &'a ViewState) -> Option<&'a Property> {
        match body_for(view) {
            Body::Table(rows) => self.table.selected().and_then(|i| rows.get(i)),
            _ => None,
        }
    }
}

impl Default for PickerState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_picker<B: Backend>(frame: &mut Frame<B>, view: &ViewState, state: &mut PickerState) {
    let size = frame.size();
    let options = dropdown_options(view);
    // Borders plus one line per option, capped so the table keeps its room
    let dropdown_height = options.len().saturating_add(2).min(10) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(dropdown_height),
            Constraint::Min(1),
            Constraint::Length(3),
        ].as_ref())
        .split(size);

    let banner = Paragraph::new(Spans::from(vec![
        Span::styled("Note ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(BANNER.trim_start_matches("Note ")),
    ]))
    .wrap(Wrap { trim: true });
    frame.render_widget(banner, chunks[0]);

    render_dropdown(frame, chunks[1], view, &options, state);
    render_body(frame, chunks[2], view, state);

    let buttons = Paragraph::new(
        "<Up/Down> Move | <Tab> Switch pane | <Enter> Choose project / Add property | <Q> Quit",
    )
    .block(Block::default().borders(Borders::TOP))
    .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[3]);
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Yellow } else { Color::White };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn render_dropdown<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    view: &ViewState,
    options: &[String],
    state: &mut PickerState,
) {
    let chosen = view
        .selected()
        .and_then(|key| view.projects().iter().position(|p| &p.id == key))
        .map_or(0, |i| i + 1);

    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let marker = if i == chosen { "* " } else { "  " };
            ListItem::new(Spans::from(vec![Span::raw(marker), Span::raw(label.as_str())]))
        })
        .collect();

    let focused = state.focus() == Focus::Dropdown;
    let mut list = List::new(items).block(pane_block("Project", focused));
    if focused {
        list = list.highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    }

    frame.render_stateful_widget(list, area, &mut state.dropdown);
}

fn render_body<B: Backend>(frame: &mut Frame<B>, area: Rect, view: &ViewState, state: &mut PickerState) {
    let rows = match body_for(view) {
        Body::Loading => {
            frame.render_widget(Paragraph::new(LOADING_TEXT), area);
            return;
        }
        Body::Error(message) => {
            let text = Paragraph::new(message).style(Style::default().fg(Color::Red));
            frame.render_widget(text, area);
            return;
        }
        Body::Placeholder => {
            frame.render_widget(Paragraph::new(EMPTY_TEXT), area);
            return;
        }
        Body::Table(rows) => rows,
    };

    let header_cells = ["Post Title", "Type", "Address", "Price", "Area", "Action"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells)
        .style(Style::default())
        .height(1)
        .bottom_margin(1);

    let rows = rows.iter().map(|property| {
        Row::new(vec![
            Cell::from(property.post_title.as_str()),
            Cell::from(property.type_name.as_str()),
            Cell::from(property.address.as_str()),
            Cell::from(property.price_text()),
            Cell::from(property.area_text()),
            Cell::from("[Add]"),
        ])
        .height(1)
    });

    let focused = state.focus() == Focus::Table;
    let mut table = Table::new(rows)
        .header(header)
        .block(pane_block(TABLE_TITLE, focused))
        .widths(&[
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Percentage(25),
            Constraint::Percentage(12),
            Constraint::Percentage(10),
            Constraint::Percentage(13),
        ]);
    if focused {
        table = table.highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    }

    frame.render_stateful_widget(table, area, &mut state.table);
}

/// Map one key press to an action, updating cursors along the way.
pub fn handle_key(state: &mut PickerState, view: &ViewState, code: KeyCode) -> Option<PickerAction> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(PickerAction::Quit),
        KeyCode::Tab => state.toggle_focus(),
        KeyCode::Down => state.next(view),
        KeyCode::Up => state.previous(view),
        KeyCode::Enter => match state.focus {
            Focus::Dropdown => {
                let index = state.dropdown.selected().unwrap_or(0);
                return Some(PickerAction::Choose(option_value(view, index)));
            }
            Focus::Table => {
                return state.highlighted_property(view).cloned().map(PickerAction::Add);
            }
        },
        KeyCode::Char('a') if state.focus == Focus::Table => {
            return state.highlighted_property(view).cloned().map(PickerAction::Add);
        }
        _ => {}
    }
    None
}

/// Wait briefly for a key press so request completions keep flowing
/// into the view between frames.
pub fn handle_input(state: &mut PickerState, view: &ViewState) -> Result<Option<PickerAction>> {
    if !event::poll(INPUT_POLL)? {
        return Ok(None);
    }
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, view, key.code));
    }
    Ok(None)
}
