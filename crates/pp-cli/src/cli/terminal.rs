//! Hidden terminal input.
//!
//! Passwords are read with raw mode on, so typed characters are never
//! echoed. Raw mode is restored by a drop guard on every exit path.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::warn;

/// Effect of one key press on the line being typed.
#[derive(Debug, PartialEq, Eq)]
enum KeyStep {
    Continue,
    Submit,
    Abort,
}

fn apply_key(line: &mut String, key: KeyEvent) -> KeyStep {
    // Windows reports releases too.
    if key.kind == KeyEventKind::Release {
        return KeyStep::Continue;
    }

    match key.code {
        KeyCode::Enter => KeyStep::Submit,
        KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyStep::Abort
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            line.clear();
            KeyStep::Continue
        }
        KeyCode::Backspace => {
            line.pop();
            KeyStep::Continue
        }
        KeyCode::Char(c) => {
            line.push(c);
            KeyStep::Continue
        }
        _ => KeyStep::Continue,
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

/// Read one line from the terminal without echo.
///
/// Blocks the calling thread. `None` when the user aborts with Ctrl-C or
/// Ctrl-D.
pub(crate) fn read_hidden_line() -> Result<Option<String>> {
    let _raw = RawModeGuard::enable()?;
    let mut line = String::new();

    loop {
        let Event::Key(key) = event::read().context("Failed to read terminal event")? else {
            continue;
        };
        match apply_key(&mut line, key) {
            KeyStep::Continue => {}
            KeyStep::Submit => return Ok(Some(line)),
            KeyStep::Abort => return Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_keys(keys: impl IntoIterator<Item = KeyEvent>) -> (String, KeyStep) {
        let mut line = String::new();
        let mut last = KeyStep::Continue;
        for key in keys {
            last = apply_key(&mut line, key);
            if last != KeyStep::Continue {
                break;
            }
        }
        (line, last)
    }

    #[test]
    fn typed_characters_build_the_line() {
        let keys = "pässwörd".chars().map(|c| key(KeyCode::Char(c)));
        let (line, step) = type_keys(keys.chain([key(KeyCode::Enter)]));

        assert_eq!(line, "pässwörd");
        assert_eq!(step, KeyStep::Submit);
    }

    #[test]
    fn backspace_and_ctrl_u_edit_the_line() {
        let (line, step) = type_keys([
            key(KeyCode::Char('x')),
            ctrl('u'),
            key(KeyCode::Char('a')),
            key(KeyCode::Char('b')),
            key(KeyCode::Backspace),
            key(KeyCode::Backspace),
            key(KeyCode::Backspace),
            key(KeyCode::Char('1')),
            key(KeyCode::Enter),
        ]);

        assert_eq!(line, "1");
        assert_eq!(step, KeyStep::Submit);
    }

    #[test]
    fn ctrl_c_and_ctrl_d_abort() {
        assert_eq!(type_keys([key(KeyCode::Char('a')), ctrl('c')]).1, KeyStep::Abort);
        assert_eq!(type_keys([ctrl('d')]).1, KeyStep::Abort);
    }

    #[test]
    fn releases_and_navigation_keys_are_ignored() {
        let mut release = key(KeyCode::Char('a'));
        release.kind = KeyEventKind::Release;

        let (line, step) = type_keys([
            release,
            key(KeyCode::Left),
            key(KeyCode::Tab),
            key(KeyCode::Char('z')),
            key(KeyCode::Enter),
        ]);

        assert_eq!(line, "z");
        assert_eq!(step, KeyStep::Submit);
    }
}
