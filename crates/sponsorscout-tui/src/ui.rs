// UI rendering logic
use crate::{App, InputMode, SidebarField};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};
use sponsorscout_core::{
    format::{compact_number, price_label},
    Listing, Placement,
};

const SIDEBAR_WIDTH: u16 = 34;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Search input
            Constraint::Length(1), // Name suggestions
            Constraint::Min(8),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_search_input(frame, app, chunks[1]);
    render_suggestions(frame, app, chunks[2]);

    // Narrow terminals lose the detail card before anything else
    let content_chunks = if chunks[3].width < 100 {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(chunks[3])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(SIDEBAR_WIDTH),
                Constraint::Percentage(40),
                Constraint::Min(30),
            ])
            .split(chunks[3])
    };

    render_sidebar(frame, app, content_chunks[0]);
    render_results_list(frame, app, content_chunks[1]);
    if let Some(area) = content_chunks.get(2) {
        render_card(frame, app, *area);
    }

    if app.input_mode == InputMode::PickingTopic {
        render_topic_picker(frame, app, frame.area());
    }

    render_status_bar(frame, app, chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "💸 SponsorScout",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.summary(), Style::default().fg(Color::White)),
        Span::styled(" sponsorable repositories", Style::default().fg(Color::DarkGray)),
    ];

    if !app.criteria.tags.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("tags: {}", app.criteria.tags.join(" + ")),
            Style::default().fg(Color::Magenta),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let style = match app.input_mode {
        InputMode::Searching => Style::default().fg(Color::Yellow),
        _ => Style::default(),
    };

    let text = if app.criteria.query.is_empty() && app.input_mode != InputMode::Searching {
        Span::styled("Search by name, topic or description...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.criteria.query.as_str())
    };

    let input = Paragraph::new(Line::from(text))
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Search "));
    frame.render_widget(input, area);

    if app.input_mode == InputMode::Searching {
        let cursor_x = area.x + 1 + app.criteria.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_suggestions(frame: &mut Frame, app: &App, area: Rect) {
    if app.input_mode != InputMode::Searching {
        return;
    }

    let suggestions = app.name_suggestions();
    if suggestions.is_empty() {
        return;
    }

    let mut spans = vec![Span::styled(" Tab ↹ ", Style::default().fg(Color::DarkGray))];
    for (i, name) in suggestions.iter().enumerate() {
        let style = if i == 0 {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(name.to_string(), style));
        spans.push(Span::raw("  "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.input_mode, InputMode::Filtering | InputMode::PickingTopic);
    let bar_width = area.width.saturating_sub(6) as usize;
    let mut lines = Vec::new();

    lines.push(section_title("Placement"));
    lines.push(field_line(
        app,
        focused,
        SidebarField::Readme,
        format!("{} README", checkbox(app.criteria.placement.readme)),
    ));
    lines.push(field_line(
        app,
        focused,
        SidebarField::Website,
        format!("{} Website", checkbox(app.criteria.placement.website)),
    ));
    lines.push(Line::from(""));

    let price = &app.bounds.price;
    lines.push(section_title("Max price / month"));
    lines.push(field_line(
        app,
        focused,
        SidebarField::MaxPrice,
        if price.is_empty() {
            "no prices".to_string()
        } else {
            price_label(app.criteria.max_price)
        },
    ));
    if let Some(marks) = price.marks() {
        lines.push(slider_line(
            slider_bar(fraction(app.criteria.max_price, price.min, price.max), bar_width),
        ));
        lines.push(marks_line(&marks, bar_width, price_label));
    }
    lines.push(Line::from(""));

    let stars = &app.bounds.stars;
    lines.push(section_title("Stars"));
    lines.push(field_line(
        app,
        focused,
        SidebarField::MinStars,
        format!("min {}", star_label(app.criteria.min_stars)),
    ));
    if !stars.is_empty() {
        lines.push(slider_line(slider_bar(
            fraction(app.criteria.min_stars as f64, stars.min as f64, stars.max as f64),
            bar_width,
        )));
    }
    lines.push(field_line(
        app,
        focused,
        SidebarField::MaxStars,
        format!("max {}", star_label(app.criteria.max_stars)),
    ));
    if let Some(marks) = stars.marks() {
        lines.push(slider_line(slider_bar(
            fraction(app.criteria.max_stars as f64, stars.min as f64, stars.max as f64),
            bar_width,
        )));
        lines.push(marks_line(&marks, bar_width, compact_number));
    }
    lines.push(Line::from(""));

    lines.push(section_title("Topics"));
    let tags = if app.criteria.tags.is_empty() {
        "any (Enter to pick)".to_string()
    } else {
        app.criteria.tags.join(", ")
    };
    lines.push(field_line(app, focused, SidebarField::Topics, tags));

    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let sidebar = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Filters "),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(sidebar, area);
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn field_line(app: &App, focused: bool, field: SidebarField, text: String) -> Line<'static> {
    let active = focused && app.sidebar_field == field;
    let (marker, style) = if active {
        ("▶ ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    } else {
        ("  ", Style::default())
    };
    Line::from(vec![Span::styled(marker, style), Span::styled(text, style)])
}

fn slider_line(bar: String) -> Line<'static> {
    Line::from(Span::styled(format!("  {}", bar), Style::default().fg(Color::Blue)))
}

/// Min, middle and max labels spread across the slider width
fn marks_line(marks: &[f64; 5], width: usize, label: fn(f64) -> String) -> Line<'static> {
    let left = label(marks[0]);
    let middle = label(marks[2]);
    let right = label(marks[4]);

    let used = left.chars().count() + middle.chars().count() + right.chars().count();
    let gap = width.saturating_sub(used) / 2;
    let text = format!(
        "  {}{}{}{}{}",
        left,
        " ".repeat(gap.max(1)),
        middle,
        " ".repeat(gap.max(1)),
        right
    );
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn star_label(stars: u64) -> String {
    if stars == u64::MAX {
        "any".to_string()
    } else {
        format!("⭐ {}", compact_number(stars as f64))
    }
}

/// Where `value` sits in `[min, max]`, as 0.0..=1.0
fn fraction(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 1.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Text slider like `├───●──────┤`, `width` counts the track only
pub fn slider_bar(fraction: f64, width: usize) -> String {
    let width = width.max(1);
    let knob = ((fraction.clamp(0.0, 1.0) * (width - 1) as f64).round()) as usize;

    let mut bar = String::with_capacity(width + 2);
    bar.push('├');
    for i in 0..width {
        bar.push(if i == knob { '●' } else { '─' });
    }
    bar.push('┤');
    bar
}

fn render_results_list(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.results.is_empty() {
        let message = if app.universe.is_empty() {
            "The sponsorship feed is empty"
        } else {
            "Nothing matches these filters (R to reset)"
        };
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Results "));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .result_listings()
        .map(|listing| {
            let repo = &listing.repository;
            let line1 = Line::from(vec![
                Span::styled(
                    repo.full_name.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("⭐ {}", compact_number(repo.stargazers_count as f64)),
                    Style::default().fg(Color::Yellow),
                ),
            ]);

            let mut line2 = vec![Span::styled(
                price_text(listing),
                Style::default().fg(Color::Green),
            )];
            line2.push(Span::raw(" "));
            line2.extend(badge_spans(&listing.entry.placement));

            ListItem::new(vec![line1, Line::from(line2), Line::from("")])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Results ({}) ", app.results.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn price_text(listing: &Listing) -> String {
    listing
        .entry
        .ad_price
        .map(|p| format!("{} / month", price_label(p)))
        .unwrap_or_else(|| "no price".to_string())
}

fn badge_spans(placement: &Placement) -> Vec<Span<'static>> {
    placement
        .badges()
        .iter()
        .flat_map(|badge| {
            let bg = match *badge {
                "website" => Color::Blue,
                _ => Color::Magenta,
            };
            [
                Span::styled(
                    format!(" {} ", badge),
                    Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]
        })
        .collect()
}

fn render_card(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");

    let Some(listing) = app.selected_listing() else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let repo = &listing.repository;
    let entry = &listing.entry;
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(Span::styled(
            repo.full_name.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(badge_spans(&entry.placement)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Stars:    ", label),
            Span::styled(
                format!("⭐ {}", compact_number(repo.stargazers_count as f64)),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(vec![
            Span::styled("Price:    ", label),
            Span::styled(price_text(listing), Style::default().fg(Color::Green)),
        ]),
    ];

    if let Some(homepage) = &repo.homepage {
        lines.push(Line::from(vec![
            Span::styled("Homepage: ", label),
            Span::styled(homepage.clone(), Style::default().fg(Color::Blue)),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("GitHub:   ", label),
        Span::raw(repo.html_url.clone()),
    ]));
    lines.push(Line::from(""));

    if let Some(desc) = repo.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(desc.to_string()));
        lines.push(Line::from(""));
    }

    if !repo.topics.is_empty() {
        let mut spans = vec![Span::styled("Topics:   ", label)];
        for topic in &repo.topics {
            let style = if app.criteria.has_tag(topic) {
                Style::default().fg(Color::Black).bg(Color::Magenta)
            } else {
                Style::default().fg(Color::Magenta)
            };
            spans.push(Span::styled(format!("#{}", topic), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        entry.pitch(),
        Style::default().fg(Color::White).add_modifier(Modifier::ITALIC),
    )));
    lines.push(Line::from(vec![
        Span::styled("Sponsor:  ", label),
        Span::styled(
            entry.sponsor_url.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::UNDERLINED),
        ),
    ]));

    let card = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(card, area);
}

fn render_topic_picker(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(50, 60, area);
    frame.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(popup);

    let input = Paragraph::new(app.topic_input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(" Topic "));
    frame.render_widget(input, chunks[0]);
    frame.set_cursor_position((
        chunks[0].x + 1 + app.topic_input.chars().count() as u16,
        chunks[0].y + 1,
    ));

    let suggestions = app.topic_suggestions();
    let items: Vec<ListItem> = if suggestions.is_empty() {
        vec![ListItem::new(Span::styled(
            "No topics found",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        suggestions
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let mut style = if s.selected {
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                if i == app.topic_cursor {
                    style = style.bg(Color::DarkGray);
                }
                let check = if s.selected { "✓ " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{}{}", check, s.topic), style),
                    Span::styled(format!(" ({})", s.count), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} selected ", app.criteria.tags.len())),
    );
    frame.render_widget(list, chunks[1]);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(message) = &app.status_message {
        Span::styled(message.clone(), Style::default().fg(Color::Red))
    } else {
        match app.input_mode {
            InputMode::Searching => Span::styled(
                "SEARCH | type to filter | TAB: complete | ENTER/ESC: done",
                Style::default().fg(Color::Yellow),
            ),
            InputMode::Filtering => Span::styled(
                "FILTERS | j/k: move | h/l: slide | SPACE: toggle | ENTER: topics | R: reset | ESC: close",
                Style::default().fg(Color::Yellow),
            ),
            InputMode::PickingTopic => Span::styled(
                "TOPICS | type to narrow | ↑/↓: move | ENTER: toggle | BACKSPACE on empty: drop last | ESC: close",
                Style::default().fg(Color::Magenta),
            ),
            InputMode::Normal => Span::raw(
                "j/k: navigate | /: search | f: filters | t: topic | R: reset | ENTER: sponsor | o: repo | q: quit",
            ),
        }
    };

    frame.render_widget(Paragraph::new(Line::from(status)), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
