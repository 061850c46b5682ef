//! Where recommendlet output ends up.
//!
//! A [`Container`] stands in for the page element a recommendlet is rendered
//! into; callers pick the implementation instead of the request looking an
//! element up by id.

pub mod show;

use std::io::{self, Write};

pub use show::{show, RenderMode};

pub const LOADING: &str = "Loading recommendations...";

pub trait Container {
    fn set_content(&mut self, content: &str);

    /// Placeholder shown while the request is in flight.
    fn set_loading(&mut self) {
        self.set_content(LOADING);
    }
}

/// Keeps the last content written, plus a count of writes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextContainer {
    pub content: String,
    pub writes: usize,
}

impl Container for TextContainer {
    fn set_content(&mut self, content: &str) {
        self.content.clear();
        self.content.push_str(content);
        self.writes += 1;
    }
}

/// Writes every update to a stream, one per line.
pub struct WriterContainer<W: Write> {
    out: W,
    mode: RenderMode,
}

impl<W: Write> WriterContainer<W> {
    pub fn new(out: W, mode: RenderMode) -> Self {
        Self { out, mode }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl WriterContainer<io::Stdout> {
    pub fn stdout(mode: RenderMode) -> Self {
        Self::new(io::stdout(), mode)
    }
}

impl<W: Write> Container for WriterContainer<W> {
    fn set_content(&mut self, content: &str) {
        let rendered = show(content, self.mode);
        if let Err(e) = writeln!(self.out, "{}", rendered).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write container content: {e}");
        }
    }

    fn set_loading(&mut self) {
        tracing::info!("{LOADING}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_container_replaces_content() {
        let mut container = TextContainer::default();
        container.set_loading();
        assert_eq!(container.content, LOADING);
        container.set_content("<div>done</div>");
        assert_eq!(container.content, "<div>done</div>");
        assert_eq!(container.writes, 2);
    }

    #[test]
    fn writer_container_renders_plain_text() {
        let mut container = WriterContainer::new(Vec::new(), RenderMode::PlainText);
        container.set_loading();
        container.set_content("<div><b>Item</b></div>");
        let out = String::from_utf8(container.into_inner()).unwrap();
        assert_eq!(out, "Item\n");
    }
}
