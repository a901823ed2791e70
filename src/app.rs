use crate::config::AppConfig;
use crate::domain::{Event, Listing};
use crate::error::ExplorerError;
use crate::infra::{CommandRunner, DirectorySource};
use crate::ui::Display;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How the event loop ended when it did not halt on an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Quit,
    /// Command mode ran; holds the text to print once the screen is gone.
    Command(Vec<u8>),
}

pub struct Explorer<S: DirectorySource> {
    source: S,
    current_path: PathBuf,
    listing: Listing,
    selected: usize,
    last_error: Option<ExplorerError>,
}

impl<S: DirectorySource> Explorer<S> {
    /// Reads `start` and paints the first listing.
    ///
    /// Failures are kept as the last error, so the first loop iteration halts.
    pub fn open<D: Display>(source: S, start: PathBuf, display: &mut D) -> Self {
        let mut explorer = Self {
            source,
            current_path: start,
            listing: Listing::default(),
            selected: 0,
            last_error: None,
        };
        explorer.refresh_listing();
        explorer.repaint(display);
        explorer.flush(display);
        explorer
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    #[cfg(test)]
    pub fn last_error(&self) -> Option<&ExplorerError> {
        self.last_error.as_ref()
    }

    pub fn move_down<D: Display>(&mut self, display: &mut D) -> bool {
        if self.selected >= self.listing.last_index() {
            return false;
        }
        self.selected += 1;
        self.redraw_selection_change(display, self.selected - 1);
        true
    }

    pub fn move_up<D: Display>(&mut self, display: &mut D) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        self.redraw_selection_change(display, self.selected + 1);
        true
    }

    /// Changes into the selected entry if it is a directory.
    ///
    /// Returns whether the directory changed. A failed change leaves the
    /// listing and selection as they were.
    pub fn enter_dir<D: Display>(&mut self, display: &mut D) -> bool {
        let entry = &self.listing[self.selected];
        if !entry.is_dir() {
            return false;
        }

        match self.source.change_dir(&self.current_path, entry.name()) {
            Ok(path) => {
                debug!(
                    from = %self.current_path.display(),
                    to = %path.display(),
                    "entering directory"
                );
                self.current_path = path;
            }
            Err(err) => {
                self.record(err);
                return false;
            }
        }

        self.selected = 0;
        self.refresh_listing();
        self.repaint(display);
        true
    }

    pub fn run<D, R>(
        &mut self,
        display: &mut D,
        runner: &R,
        config: &AppConfig,
    ) -> Result<Exit, ExplorerError>
    where
        D: Display,
        R: CommandRunner,
    {
        loop {
            if let Some(err) = self.last_error.take() {
                return Err(err);
            }

            let key = display
                .read_key()
                .map_err(|source| ExplorerError::ReadKey { source })?;
            let Some(event) = config.keys.resolve(&key) else {
                continue;
            };

            match event {
                Event::Quit => {
                    info!(path = %self.current_path.display(), "quit");
                    return Ok(Exit::Quit);
                }
                Event::EnterDir => {
                    self.enter_dir(display);
                }
                Event::MoveUp => {
                    self.move_up(display);
                }
                Event::MoveDown => {
                    self.move_down(display);
                }
                Event::CmdMode => {
                    let output = self.command_mode(display, runner, config.line_input_max)?;
                    return Ok(Exit::Command(output));
                }
                Event::Touch
                | Event::MkDir
                | Event::Remove
                | Event::Move
                | Event::Copy
                | Event::Rename
                | Event::Editor
                | Event::SupEditor => {
                    debug!(event = event.label(), "reserved event ignored");
                }
            }

            self.flush(display);
        }
    }

    fn command_mode<D, R>(
        &self,
        display: &mut D,
        runner: &R,
        max_len: usize,
    ) -> Result<Vec<u8>, ExplorerError>
    where
        D: Display,
        R: CommandRunner,
    {
        let bottom = display.height().saturating_sub(1);
        display
            .set_echo(true)
            .and_then(|()| display.move_cursor(bottom, 0))
            .and_then(|()| display.set_cursor_visible(true))
            .and_then(|()| display.flush())
            .map_err(ExplorerError::display("command mode: preparing input"))?;

        let line = display
            .read_line(max_len)
            .map_err(|source| ExplorerError::ReadLine { source })?;

        let output = run_command_line(runner, &self.current_path, &line);

        display
            .set_echo(false)
            .and_then(|()| display.set_cursor_visible(false))
            .map_err(ExplorerError::display("command mode: restoring input"))?;

        Ok(output)
    }

    fn refresh_listing(&mut self) {
        match self.source.list(&self.current_path) {
            Ok(contents) => self.listing = Listing::from_contents(contents),
            Err(err) => self.record(err),
        }
    }

    fn repaint<D: Display>(&mut self, display: &mut D) {
        if let Err(source) = display.redraw_all(&self.listing, self.selected) {
            self.record(ExplorerError::display("render: full repaint")(source));
        }
    }

    fn redraw_selection_change<D: Display>(&mut self, display: &mut D, previous: usize) {
        let result = display
            .redraw_row(previous, &self.listing[previous], false)
            .and_then(|()| display.redraw_row(self.selected, &self.listing[self.selected], true));
        if let Err(source) = result {
            self.record(ExplorerError::display("render: selection change")(source));
        }
    }

    fn flush<D: Display>(&mut self, display: &mut D) {
        if let Err(source) = display.flush() {
            self.record(ExplorerError::display("render: flush")(source));
        }
    }

    fn record(&mut self, err: ExplorerError) {
        warn!(location = err.location(), error = %err, "explorer error");
        if self.last_error.is_none() {
            self.last_error = Some(err);
        }
    }
}

/// Splits `line` on whitespace and runs it in `dir`.
///
/// Any failure, including an empty line or a non-zero exit, turns into the
/// `Invalid Command: <line>` message.
pub fn run_command_line<R: CommandRunner + ?Sized>(runner: &R, dir: &Path, line: &str) -> Vec<u8> {
    let mut words = line.split_whitespace();
    let result = match words.next() {
        Some(program) => {
            let args: Vec<&str> = words.collect();
            runner.run(dir, program, &args)
        }
        None => Err(anyhow::anyhow!("empty command line")),
    };

    result.unwrap_or_else(|err| {
        warn!(line, error = %format!("{err:#}"), "command failed");
        format!("Invalid Command: {line}").into_bytes()
    })
}
