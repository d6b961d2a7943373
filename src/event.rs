use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

/// Terminal input the UI reacts to.
#[derive(Debug, Clone, Copy)]
pub enum Input {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
}

/// Wait up to `timeout` for input. Focus and paste events are skipped
/// without restarting the wait.
pub fn next_input(timeout: Duration) -> color_eyre::Result<Option<Input>> {
    while event::poll(timeout)? {
        match event::read()? {
            // ignore key releases on terminals that report them
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(Some(Input::Key(key))),
            Event::Mouse(mouse) => return Ok(Some(Input::Mouse(mouse))),
            Event::Resize(..) => return Ok(Some(Input::Resize)),
            _ => {}
        }
    }
    Ok(None)
}
