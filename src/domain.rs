use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::ops::Index;

/// Name of the synthetic entry that leads to the parent directory.
pub const PARENT_ENTRY: &str = "..";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: OsString,
    is_dir: bool,
}

impl Entry {
    pub fn new(name: impl Into<OsString>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }

    pub fn parent() -> Self {
        Self::new(PARENT_ENTRY, true)
    }

    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub fn label(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// Entries of one directory, always led by the parent entry.
///
/// The remaining entries keep the order the directory source produced them
/// in; nothing is sorted or filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    entries: Vec<Entry>,
}

impl Listing {
    pub fn from_contents(contents: impl IntoIterator<Item = Entry>) -> Self {
        let entries = std::iter::once(Entry::parent()).chain(contents).collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn last_index(&self) -> usize {
        self.entries.len() - 1
    }
}

impl Default for Listing {
    fn default() -> Self {
        Self::from_contents(Vec::new())
    }
}

impl Index<usize> for Listing {
    type Output = Entry;

    fn index(&self, index: usize) -> &Entry {
        &self.entries[index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Quit,
    EnterDir,
    MoveUp,
    MoveDown,
    CmdMode,
    Touch,
    MkDir,
    Remove,
    Move,
    Copy,
    Rename,
    Editor,
    SupEditor,
}

impl Event {
    pub const ALL: [Event; 13] = [
        Event::Quit,
        Event::EnterDir,
        Event::MoveUp,
        Event::MoveDown,
        Event::CmdMode,
        Event::Touch,
        Event::MkDir,
        Event::Remove,
        Event::Move,
        Event::Copy,
        Event::Rename,
        Event::Editor,
        Event::SupEditor,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Event::Quit => "quit",
            Event::EnterDir => "enter-dir",
            Event::MoveUp => "move-up",
            Event::MoveDown => "move-down",
            Event::CmdMode => "cmd-mode",
            Event::Touch => "touch",
            Event::MkDir => "mk-dir",
            Event::Remove => "remove",
            Event::Move => "move",
            Event::Copy => "copy",
            Event::Rename => "rename",
            Event::Editor => "editor",
            Event::SupEditor => "sup-editor",
        }
    }

    /// Bindable events without a handler yet. Their keys are swallowed.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            Event::Touch
                | Event::MkDir
                | Event::Remove
                | Event::Move
                | Event::Copy
                | Event::Rename
                | Event::Editor
                | Event::SupEditor
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowStyle {
    pub highlighted: bool,
    pub directory: bool,
}

impl RowStyle {
    pub fn for_entry(entry: &Entry, highlighted: bool) -> Self {
        Self {
            highlighted,
            directory: entry.is_dir(),
        }
    }
}
