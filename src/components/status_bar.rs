use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::Screen;
use crate::theme::Theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        screen: Screen,
        message: Option<&str>,
        open_tickets: usize,
        theme: &Theme,
    ) {
        let w = area.width as usize;

        let mode_str = match screen {
            Screen::Schedule => "[1]Schedule",
            Screen::Rota => "[2]Rota",
            Screen::Staff => "[3]Staff",
        };
        let tickets = if open_tickets > 0 {
            format!(" {} open ticket{}", open_tickets, if open_tickets == 1 { "" } else { "s" })
        } else {
            String::new()
        };

        let right_text = match message {
            Some(msg) => format!(" {} ", msg),
            None if w >= 80 => match screen {
                Screen::Staff => " drag staff onto shifts  h/l:Week t:Today ?:Help q:Quit ".to_string(),
                _ => " drag:Move edges:Resize click:Detail  h/l:Week j/k:Scroll ?:Help q:Quit "
                    .to_string(),
            },
            None if w >= 50 => " h/l:Week t:Today ?:Help q:Quit ".to_string(),
            None => " ?:Help q:Quit ".to_string(),
        };

        let left = format!(" {}{} ", mode_str, tickets);
        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right_text.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, theme.status),
            Span::styled(padding, theme.status),
            Span::styled(right_text, theme.status),
        ]);
        frame.render_widget(Paragraph::new(line).style(theme.status), area);
    }
}
