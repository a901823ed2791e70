use crate::domain::{Entry, Listing, RowStyle};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use std::io;

/// Screen the explorer draws its listing on and reads input from.
///
/// Rows are numbered from the top of the screen. `redraw_row` and
/// `redraw_all` are the only ways the explorer paints the listing: the first
/// touches a single row, the second clears the screen and draws every entry.
pub trait Display {
    fn draw_line(&mut self, row: usize, text: &str, style: RowStyle) -> io::Result<()>;
    fn clear_line(&mut self, row: usize) -> io::Result<()>;
    fn clear(&mut self) -> io::Result<()>;
    fn move_cursor(&mut self, row: usize, col: usize) -> io::Result<()>;
    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()>;
    fn set_echo(&mut self, echo: bool) -> io::Result<()>;
    fn height(&self) -> usize;
    fn flush(&mut self) -> io::Result<()>;

    /// Blocks until a key is pressed and returns its label.
    fn read_key(&mut self) -> io::Result<String>;

    /// Blocks until a line is entered; keeps at most `max_len` characters.
    fn read_line(&mut self, max_len: usize) -> io::Result<String>;

    fn redraw_row(&mut self, row: usize, entry: &Entry, highlighted: bool) -> io::Result<()> {
        self.clear_line(row)?;
        self.draw_line(row, &entry.label(), RowStyle::for_entry(entry, highlighted))
    }

    fn redraw_all(&mut self, listing: &Listing, selected: usize) -> io::Result<()> {
        self.clear()?;
        for (row, entry) in listing.iter().enumerate() {
            self.draw_line(row, &entry.label(), RowStyle::for_entry(entry, row == selected))?;
        }
        Ok(())
    }
}

pub fn row_style(style: RowStyle) -> Style {
    let mut out = Style::default();
    if style.directory {
        out = out.fg(Color::Green).bg(Color::Black);
    }
    if style.highlighted {
        out = out.add_modifier(Modifier::REVERSED);
    }
    out
}

/// Lays `text` out on screen row `y`, cut to `width` columns.
pub fn render_row(width: u16, y: u16, text: &str, style: RowStyle) -> Buffer {
    let area = Rect::new(0, y, width, 1);
    let mut buffer = Buffer::empty(area);
    buffer.set_stringn(0, y, text, usize::from(width), row_style(style));
    buffer
}
