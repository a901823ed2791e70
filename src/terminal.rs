use crate::domain::RowStyle;
use crate::ui::{self, Display};
use anyhow::{Context, Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::style::available_color_count;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::{Backend, ClearType, CrosstermBackend};
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use std::io::{self, BufRead};
use std::panic;

const MIN_COLORS: u16 = 8;

pub(crate) fn setup_terminal() -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("failed to enter alternate screen")?;
    Ok(())
}

pub(crate) fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show)
        .context("failed to leave alternate screen")?;
    Ok(())
}

/// Restores the terminal before the default hook prints the panic.
pub(crate) fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Whether a terminal named `term` reporting `count` colors can show the
/// listing. crossterm reports 8 colors even for `dumb` or missing terminals.
pub(crate) fn has_colors(term: Option<&str>, count: u16) -> bool {
    match term {
        None | Some("" | "dumb") => false,
        Some(_) => count >= MIN_COLORS,
    }
}

/// [`Display`] over a ratatui backend, reading input through crossterm.
pub struct TerminalDisplay<B: Backend> {
    backend: B,
    width: u16,
    height: u16,
}

impl TerminalDisplay<CrosstermBackend<io::Stdout>> {
    /// Takes over the terminal. Fails, leaving the terminal restored, when
    /// setup fails or the terminal has no color support.
    pub fn init() -> Result<Self> {
        let term = std::env::var("TERM").ok();
        if !has_colors(term.as_deref(), available_color_count()) {
            bail!("your terminal has to support colors in order to run the application");
        }

        setup_terminal()?;
        let display = TerminalDisplay::new(CrosstermBackend::new(io::stdout()))
            .and_then(|mut display| {
                display.backend.hide_cursor().map_err(io::Error::other)?;
                display.backend.clear().map_err(io::Error::other)?;
                Ok(display)
            })
            .context("failed to create terminal");

        match display {
            Ok(display) => Ok(display),
            Err(err) => {
                restore_terminal()?;
                Err(err)
            }
        }
    }

    pub fn restore(&mut self) -> Result<()> {
        restore_terminal()
    }
}

impl<B> TerminalDisplay<B>
where
    B: Backend,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    pub fn new(backend: B) -> io::Result<Self> {
        let size = backend.size().map_err(io::Error::other)?;
        Ok(Self {
            backend,
            width: size.width,
            height: size.height,
        })
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn row(&self, row: usize) -> Option<u16> {
        u16::try_from(row).ok().filter(|y| *y < self.height)
    }
}

impl<B> Display for TerminalDisplay<B>
where
    B: Backend,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    fn draw_line(&mut self, row: usize, text: &str, style: RowStyle) -> io::Result<()> {
        let Some(y) = self.row(row) else {
            return Ok(());
        };
        let blank = Buffer::empty(Rect::new(0, y, self.width, 1));
        let line = ui::render_row(self.width, y, text, style);
        let updates = blank.diff(&line);
        self.backend
            .draw(updates.into_iter())
            .map_err(io::Error::other)
    }

    fn clear_line(&mut self, row: usize) -> io::Result<()> {
        let Some(y) = self.row(row) else {
            return Ok(());
        };
        self.backend
            .set_cursor_position(Position::new(0, y))
            .map_err(io::Error::other)?;
        self.backend
            .clear_region(ClearType::UntilNewLine)
            .map_err(io::Error::other)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.backend.clear().map_err(io::Error::other)
    }

    fn move_cursor(&mut self, row: usize, col: usize) -> io::Result<()> {
        let y = u16::try_from(row).unwrap_or(u16::MAX);
        let x = u16::try_from(col).unwrap_or(u16::MAX);
        self.backend
            .set_cursor_position(Position::new(x, y))
            .map_err(io::Error::other)
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        let result = if visible {
            self.backend.show_cursor()
        } else {
            self.backend.hide_cursor()
        };
        result.map_err(io::Error::other)
    }

    /// Echo is the tty's cooked mode; raw mode turns it off.
    fn set_echo(&mut self, echo: bool) -> io::Result<()> {
        if echo {
            disable_raw_mode()
        } else {
            enable_raw_mode()
        }
    }

    fn height(&self) -> usize {
        usize::from(self.height)
    }

    fn flush(&mut self) -> io::Result<()> {
        Backend::flush(&mut self.backend).map_err(io::Error::other)
    }

    fn read_key(&mut self) -> io::Result<String> {
        loop {
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && let Some(label) = key_label(key)
            {
                return Ok(label);
            }
        }
    }

    fn read_line(&mut self, max_len: usize) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let trimmed = line.trim_end_matches(['\n', '\r']);
        Ok(trimmed.chars().take(max_len).collect())
    }
}

/// Label used in key bindings for `key`, or `None` for keys that cannot be
/// bound (bare modifiers, media keys).
pub fn key_label(key: KeyEvent) -> Option<String> {
    let label = match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            format!("ctrl+{}", c.to_ascii_lowercase())
        }
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "backtab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };
    Some(label)
}
