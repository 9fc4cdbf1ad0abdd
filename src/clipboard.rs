use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::{self, Write};

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("system clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),
}

pub trait ClipboardBackend {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Anything that can take a best-effort copy request.
pub trait CopyText {
    fn copy(&mut self, text: &str);
}

/// Platform clipboard. The handle is kept open so X11 selections outlive the call.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardBackend for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        match self.inner.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_owned())
                .map_err(|e| ClipboardError::Write(e.to_string())),
            None => Err(ClipboardError::Unavailable("no clipboard handle".to_string())),
        }
    }
}

/// Legacy path: asks the terminal emulator to set its selection (OSC 52).
pub struct TerminalClipboard<W: Write> {
    out: W,
}

impl<W: Write> TerminalClipboard<W> {
    pub fn new(out: W) -> Self {
        TerminalClipboard { out }
    }
}

impl<W: Write> ClipboardBackend for TerminalClipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        write!(self.out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        self.out.flush()?;
        Ok(())
    }
}

pub struct Clipboard<P = SystemClipboard, F = TerminalClipboard<io::Stdout>> {
    primary: P,
    fallback: F,
    mirror: bool,
}

impl Clipboard {
    /// For a process that stays alive, such as the TUI, which keeps owning the selection.
    pub fn system() -> Self {
        Clipboard::new(SystemClipboard::default(), TerminalClipboard::new(io::stdout()))
    }

    /// For a command that exits right after copying. X11 and Wayland drop the
    /// selection with its owner, so the terminal copy is always sent as well.
    pub fn one_shot() -> Self {
        Clipboard::system().mirrored()
    }
}

impl<P: ClipboardBackend, F: ClipboardBackend> Clipboard<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Clipboard {
            primary,
            fallback,
            mirror: false,
        }
    }

    /// Writes through the fallback even when the primary accepted the text.
    pub fn mirrored(mut self) -> Self {
        self.mirror = true;
        self
    }
}

impl<P: ClipboardBackend, F: ClipboardBackend> CopyText for Clipboard<P, F> {
    fn copy(&mut self, text: &str) {
        let use_fallback = match self.primary.write_text(text) {
            Ok(()) => {
                log::debug!("copied {} bytes to the system clipboard", text.len());
                self.mirror
            }
            Err(err) => {
                log::debug!("{}; falling back to terminal copy", err);
                true
            }
        };
        if use_fallback {
            if let Err(err) = self.fallback.write_text(text) {
                log::warn!("copy failed: {}", err);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Scripted {
        fail: bool,
        writes: Rc<RefCell<Vec<String>>>,
    }

    impl ClipboardBackend for Scripted {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable("denied".to_string()));
            }
            self.writes.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn scripted(fail: bool) -> (Scripted, Rc<RefCell<Vec<String>>>) {
        let writes = Rc::new(RefCell::new(Vec::new()));
        (Scripted { fail, writes: Rc::clone(&writes) }, writes)
    }

    #[test]
    fn primary_success_skips_fallback() {
        let (primary, primary_writes) = scripted(false);
        let (fallback, fallback_writes) = scripted(false);
        Clipboard::new(primary, fallback).copy("hello");

        assert_eq!(*primary_writes.borrow(), ["hello"]);
        assert!(fallback_writes.borrow().is_empty());
    }

    #[test]
    fn primary_failure_uses_fallback() {
        let (primary, _) = scripted(true);
        let (fallback, fallback_writes) = scripted(false);
        Clipboard::new(primary, fallback).copy("hello");

        assert_eq!(*fallback_writes.borrow(), ["hello"]);
    }

    #[test]
    fn mirrored_copy_reaches_both_backends() {
        let (primary, primary_writes) = scripted(false);
        let (fallback, fallback_writes) = scripted(false);
        Clipboard::new(primary, fallback).mirrored().copy("hello");

        assert_eq!(*primary_writes.borrow(), ["hello"]);
        assert_eq!(*fallback_writes.borrow(), ["hello"]);
    }

    #[test]
    fn double_failure_is_swallowed() {
        let (primary, _) = scripted(true);
        let (fallback, _) = scripted(true);
        Clipboard::new(primary, fallback).copy("hello");
    }

    #[test]
    fn terminal_fallback_emits_osc52() {
        let mut out = Vec::new();
        TerminalClipboard::new(&mut out).write_text("hi").unwrap();
        assert_eq!(out, b"\x1b]52;c;aGk=\x07");
    }
}
