//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use hafizly_core::Link;

use super::app::{App, FormField, InputMode, LinkForm, SettingsField, Tab};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App, links: &[Link]) {
    // Tab bar on top, status bar at the bottom
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_tab_bar(frame, app, links, outer_chunks[0]);

    match app.tab {
        Tab::Settings => draw_settings_screen(frame, app, outer_chunks[1]),
        Tab::Private if !app.gate.is_unlocked() => {
            draw_passcode_prompt(frame, app, outer_chunks[1])
        }
        _ => draw_links_screen(frame, app, links, outer_chunks[1]),
    }

    // Status bar or search input
    match app.input_mode {
        InputMode::Search => draw_search_input(frame, app, links, outer_chunks[2]),
        _ => draw_status_bar(frame, app, outer_chunks[2]),
    }

    // Overlays
    if let Some(form) = &app.form {
        draw_form_modal(frame, form);
    }
    if let Some(ref message) = app.error_message {
        draw_error_modal(frame, message);
    }
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the tab bar with per-category counts
fn draw_tab_bar(frame: &mut Frame, app: &App, links: &[Link], area: Rect) {
    let public = links.iter().filter(|l| l.is_public()).count();
    let private = links.len() - public;

    let titles = vec![
        Line::from(format!(" 1 Public ({}) ", public)),
        Line::from(format!(" 2 Private ({}) ", private)),
        Line::from(" 3 Settings ".to_string()),
    ];

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED),
        )
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Draw the link list with the selected link's details below
fn draw_links_screen(frame: &mut Frame, app: &App, links: &[Link], area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(8)])
        .split(area);

    let visible = app.visible_links(links);

    let title = if app.search_text.is_empty() {
        format!(" {} Links ({}) ", app.tab.title(), visible.len())
    } else {
        format!(
            " {} Links ({}) /{} ",
            app.tab.title(),
            visible.len(),
            app.search_text
        )
    };

    let block = Block::default().title(title).borders(Borders::ALL);

    if visible.is_empty() {
        let hint = if app.is_loading {
            "Loading...".to_string()
        } else if app.search_text.is_empty() {
            match app.tab {
                Tab::Public => "Add your first link with 'a'".to_string(),
                _ => format!("You don't have any {} links yet", app.tab.title().to_lowercase()),
            }
        } else {
            "No links match the search".to_string()
        };

        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No links found",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(hint, Style::default().add_modifier(Modifier::DIM))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });

        frame.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = visible
            .iter()
            .map(|link| {
                let max_len = chunks[0].width.saturating_sub(4) as usize;
                let name = truncate_chars(&link.name, max_len);
                let url = truncate_chars(&link.url, max_len.saturating_sub(2));

                let name_line = Line::from(vec![Span::styled(name, Style::default())]);
                let url_line = Line::from(vec![Span::styled(
                    url,
                    Style::default().add_modifier(Modifier::DIM),
                )]);

                ListItem::new(vec![name_line, url_line])
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED),
        );

        let mut state = ListState::default();
        state.select(Some(app.link_index));

        frame.render_stateful_widget(list, chunks[0], &mut state);
    }

    draw_detail(frame, app, links, chunks[1]);
}

/// Draw the selected link's details
fn draw_detail(frame: &mut Frame, app: &App, links: &[Link], area: Rect) {
    let block = Block::default().title(" Detail ").borders(Borders::ALL);

    let content = if let Some(link) = app.current_link(links) {
        vec![
            Line::from(vec![
                Span::styled("Name:        ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&link.name),
            ]),
            Line::from(vec![
                Span::styled("URL:         ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&link.url),
            ]),
            Line::from(vec![
                Span::styled("Description: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(link.description.as_deref().unwrap_or("-")),
            ]),
            Line::from(vec![
                Span::styled("Category:    ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(link.category.as_str()),
            ]),
            Line::from(vec![
                Span::styled("Created:     ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(link.created_at.format("%Y-%m-%d %H:%M").to_string()),
            ]),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Select a link to view details",
                Style::default().add_modifier(Modifier::DIM),
            )]),
        ]
    };

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Draw the passcode prompt that blocks the locked Private screen
fn draw_passcode_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Private Links ").borders(Borders::ALL);
    frame.render_widget(block, area);

    let popup = centered_rect(area, 40, 7);
    frame.render_widget(Clear, popup);

    let masked = "•".repeat(app.passcode_input.chars().count());
    let content = vec![
        Line::from(Span::styled(
            "Authentication Required",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::raw("Passcode: "), Span::raw(masked)]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: unlock   Esc: back",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let prompt = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(prompt, popup);
}

/// Draw the Settings screen
fn draw_settings_screen(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Settings;

    let field_line = |label: &str, value: &str, field: SettingsField| {
        let active = editing && app.passcode_form.field == field;
        let marker = if active { "> " } else { "  " };
        let style = if active {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{}{:<18}", marker, label), style),
            Span::styled("•".repeat(value.chars().count()), style),
        ])
    };

    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Private links password: "),
            Span::styled(
                if app.vault.is_set() { "Set" } else { "Not set" },
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        field_line("New password:", &app.passcode_form.passcode, SettingsField::Passcode),
        field_line("Confirm password:", &app.passcode_form.confirm, SettingsField::Confirm),
        Line::from(""),
    ];

    if editing {
        content.push(Line::from(Span::styled(
            "  Tab: switch field   Enter: apply   Esc: cancel",
            Style::default().add_modifier(Modifier::DIM),
        )));
    } else {
        content.push(Line::from(Span::styled(
            "  Press Enter to set or change the password",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled("  Table URL: ", Style::default().add_modifier(Modifier::DIM)),
        Span::styled(
            app.config.table_url.as_deref().unwrap_or("(not set)").to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]));

    let paragraph = Paragraph::new(content)
        .block(Block::default().title(" Settings ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if app.is_loading {
        "Loading...".to_string()
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        match app.tab {
            Tab::Settings => "1/2/3:tabs  Enter:change password  ?:help  q:quit".to_string(),
            _ => "a:add  e:edit  d:del  p:toggle  r:refresh  /:search  Enter:open  ?:help  q:quit"
                .to_string(),
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Draw search input at the bottom
fn draw_search_input(frame: &mut Frame, app: &App, links: &[Link], area: Rect) {
    let prefix = "/";
    let matches = app.visible_links(links).len();

    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Cyan)),
        Span::raw(app.search_text.as_str()),
        Span::styled(
            format!("  ({} matches)", matches),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    let paragraph = Paragraph::new(line);
    frame.render_widget(paragraph, area);

    // Position cursor after the typed text
    let cursor_x = area.x + prefix.len() as u16 + app.search_text.chars().count() as u16;
    frame.set_cursor_position((cursor_x, area.y));
}

/// Draw the add/edit modal
fn draw_form_modal(frame: &mut Frame, form: &LinkForm) {
    let popup = centered_rect(frame.area(), 60, 11);
    frame.render_widget(Clear, popup);

    let field_line = |label: &str, value: &str, field: FormField| {
        let active = form.field == field;
        let marker = if active { "> " } else { "  " };
        let style = if active {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{}{:<13}", marker, label), style),
            Span::styled(value.to_string(), style),
        ])
    };

    let visibility = if form.is_public { "Public" } else { "Private" };

    let content = vec![
        Line::from(""),
        field_line("Name:", &form.name, FormField::Name),
        field_line("Description:", &form.description, FormField::Description),
        field_line("URL:", &form.url, FormField::Url),
        field_line("Visibility:", visibility, FormField::Visibility),
        Line::from(""),
        Line::from(Span::styled(
            "Tab: next field   Space: toggle visibility",
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(Span::styled(
            "Enter: save   Esc: cancel",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(format!(" {} ", form.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

/// Draw the blocking error modal
fn draw_error_modal(frame: &mut Frame, message: &str) {
    let popup = centered_rect(frame.area(), 44, 7);
    frame.render_widget(Clear, popup);

    let content = vec![
        Line::from(""),
        Line::from(Span::raw(message.to_string())),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let popup = centered_rect(frame.area(), 50, 19);
    frame.render_widget(Clear, popup);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  g / G       Jump to first / last link"),
        Line::from("  1/2/3       Public / Private / Settings"),
        Line::from("  Tab         Next tab"),
        Line::from("  Enter       Open link in browser"),
        Line::from(""),
        Line::from("Commands:"),
        Line::from("  a           Add link"),
        Line::from("  e           Edit link"),
        Line::from("  d           Delete link"),
        Line::from("  p           Toggle Public/Private"),
        Line::from("  r           Refresh from the table"),
        Line::from("  /           Search current view"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup);
}

/// Compute a centered popup area of at most the given size
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(2));
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

/// Truncate a string to a number of characters, appending an ellipsis
fn truncate_chars(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
