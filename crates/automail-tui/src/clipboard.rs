use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub trait Clipboard {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

/// Sets the system clipboard through the terminal with an OSC 52 sequence.
/// Works over SSH as long as the terminal emulator allows it.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl Osc52Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        self.out.flush()
    }
}

/// Keeps every copied string. Cloning shares the history.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    copies: Arc<Mutex<Vec<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copies(&self) -> Vec<String> {
        self.copies
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.copies().pop()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        self.copies
            .lock()
            .map_err(|_| io::Error::other("clipboard history poisoned"))?
            .push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_sequence() {
        let mut clip = Osc52Clipboard::new(Vec::new());
        clip.copy("olá").unwrap();
        let out = String::from_utf8(clip.into_inner()).unwrap();
        assert_eq!(out, format!("\x1b]52;c;{}\x07", STANDARD.encode("olá")));
    }

    #[test]
    fn memory_clipboard_shares_history() {
        let clip = MemoryClipboard::new();
        let mut handle = clip.clone();
        handle.copy("a").unwrap();
        handle.copy("b").unwrap();
        assert_eq!(clip.copies(), vec!["a", "b"]);
        assert_eq!(clip.last().as_deref(), Some("b"));
    }
}
