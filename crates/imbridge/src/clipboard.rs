//! System clipboard for the windowed runner.
//!
//! [`InputState`] only buffers clipboard text. [`SystemClipboard`] fills the
//! buffer when a paste shortcut arrives and writes back what the GUI copied.

use imbridge_core::{HostInput, HostKey, InputState, Modifiers};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

use crate::winit_host::host_key;

/// The platform clipboard, or nothing when it cannot be opened.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("available", &self.inner.is_some())
            .finish()
    }
}

impl SystemClipboard {
    /// Opens the platform clipboard. Failure is logged and leaves it unavailable.
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                log::warn!("clipboard unavailable: {err}");
                None
            }
        };
        Self { inner }
    }

    /// A clipboard that never holds text.
    pub fn unavailable() -> Self {
        Self { inner: None }
    }

    /// Whether the platform clipboard was opened.
    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    /// Reads the clipboard text.
    pub fn text(&mut self) -> Option<String> {
        let clipboard = self.inner.as_mut()?;
        match clipboard.get_text() {
            Ok(text) => Some(text),
            Err(err) => {
                log::debug!("clipboard read failed: {err}");
                None
            }
        }
    }

    /// Replaces the clipboard text.
    pub fn set_text(&mut self, text: &str) {
        let Some(clipboard) = self.inner.as_mut() else {
            return;
        };
        if let Err(err) = clipboard.set_text(text) {
            log::warn!("clipboard write failed: {err}");
        }
    }

    /// Loads the clipboard into `state` when `event` is a paste shortcut.
    /// Without a platform clipboard the buffer is left alone.
    ///
    /// Call before the event is recorded so the modifiers reflect the press.
    pub fn observe(&mut self, state: &mut InputState, event: &WindowEvent) {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return;
        };
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        if event.state != ElementState::Pressed || !self.is_available() {
            return;
        }
        if let Some(key) = host_key(code) {
            if wants_paste(&*state, key) {
                let text = self.text();
                state.set_clipboard_contents(text);
            }
        }
    }

    /// Writes text the bridge copied since the last call.
    pub fn flush(&mut self, state: &mut InputState) {
        if let Some(text) = state.take_clipboard_request() {
            log::trace!("copying {} bytes to the clipboard", text.len());
            self.set_text(&text);
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

fn wants_paste(state: &dyn HostInput, key: HostKey) -> bool {
    Modifiers::from_host(state).is_paste(key)
}
