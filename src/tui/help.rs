use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn keybind(key: &'static str, pad: usize, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(format!("{}{}", " ".repeat(pad), what)),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit"),
        ]),
        keybind("c", 11, "Cook (from idle)"),
        keybind("s", 11, "Stop the fire (while cooking)"),
        keybind("r", 11, "Resume (while paused)"),
        keybind("x", 11, "Reset the pot (paused or cooked)"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("←/→", Style::default().fg(Color::Magenta)),
            Span::raw(" or "),
            Span::styled("-/+", Style::default().fg(Color::Magenta)),
            Span::raw("  Fire down / up"),
        ]),
        keybind("e", 11, "Export session summary as JSON"),
        keybind("tab", 9, "Switch tabs"),
        keybind("?", 11, "Show this help"),
        Line::from(""),
        Line::from("Cooking:"),
        Line::from("  A hotter fire cooks faster: 0.5x with the fire off, 2.0x at full."),
        Line::from("  While paused the fire control is off; moves are kept for resume."),
        Line::from("  Once cooked the fire dies down and the pot keeps a light simmer."),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
