use super::client::Transport;
use super::conversation::Conversation;
use crate::ai::gateway::{ChatTurn, Role};

/// Display names for both sides of the conversation.
#[derive(Clone, Debug)]
pub struct Names {
    pub user: String,
    pub assistant: String,
}

impl Names {
    pub fn new(user: Option<&str>, assistant: &str) -> Self {
        Self {
            user: user.unwrap_or("Guest").to_string(),
            assistant: assistant.to_string(),
        }
    }
}

/// Something shown in the message list. Loading and error entries
/// come after the transcript and are mutually exclusive.
#[derive(Debug, PartialEq)]
pub enum Entry<'a> {
    Turn(&'a ChatTurn),
    Loading,
    Error(&'a str),
}

pub fn entries<T: Transport>(conversation: &Conversation<T>) -> Vec<Entry<'_>> {
    let mut entries: Vec<Entry> = conversation.transcript().iter().map(Entry::Turn).collect();
    if conversation.is_loading() {
        entries.push(Entry::Loading);
    } else if let Some(error) = conversation.error() {
        entries.push(Entry::Error(error));
    }
    entries
}

/// Render the entries as plain text lines. Each entry is a header
/// with the author followed by the indented content and a blank
/// separator line. Errors are attributed to the assistant.
pub fn render_lines(entries: &[Entry], names: &Names) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in entries {
        match entry {
            Entry::Turn(turn) => {
                let author = match turn.role {
                    Role::User => &names.user,
                    Role::Assistant => &names.assistant,
                };
                lines.push(format!("{}:", author));
                lines.extend(turn.content.lines().map(|l| format!("  {}", l)));
            }
            Entry::Loading => {
                lines.push(format!("{}:", names.assistant));
                lines.push(String::from("  ..."));
            }
            Entry::Error(error) => {
                lines.push(format!("{}:", names.assistant));
                lines.push(format!("  [!] {}", error));
            }
        }
        lines.push(String::new());
    }
    lines
}

/// A fixed height window over the rendered lines. While pinned the
/// window follows the last line.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    height: usize,
    offset: usize,
    pinned: bool,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            height: height.max(1),
            offset: 0,
            pinned: true,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn scroll_to_bottom(&mut self) {
        self.pinned = true;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.pinned = false;
        self.offset = self.offset.saturating_sub(lines);
    }

    /// The slice of `lines` currently in view.
    pub fn visible<'a>(&mut self, lines: &'a [String]) -> &'a [String] {
        let max_offset = lines.len().saturating_sub(self.height);
        if self.pinned {
            self.offset = max_offset;
        }
        self.offset = self.offset.min(max_offset);
        let end = (self.offset + self.height).min(lines.len());
        &lines[self.offset..end]
    }
}
