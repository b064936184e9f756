use cmdeck::log::{LogSink, RenderedLine};

/// A sink that keeps every rendered line in memory and lets tests play the
/// part of a user scrolling the view.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    pub lines: Vec<RenderedLine>,
    pub at_bottom: bool,
    pub clears: usize,
    pub scrolls_to_bottom: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            at_bottom: true,
            clears: 0,
            scrolls_to_bottom: 0,
        }
    }

    /// Visible text of each line, without the time label.
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.plain_text()).collect()
    }

    /// Simulate the user scrolling up (`false`) or back down (`true`).
    pub fn set_at_bottom(&mut self, at_bottom: bool) {
        self.at_bottom = at_bottom;
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for RecordingSink {
    fn append(&mut self, lines: &[RenderedLine]) {
        self.lines.extend_from_slice(lines);
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.clears += 1;
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn trim_front(&mut self, count: usize) {
        let count = count.min(self.lines.len());
        self.lines.drain(..count);
    }

    fn is_at_bottom(&self) -> bool {
        self.at_bottom
    }

    fn scroll_to_bottom(&mut self) {
        self.at_bottom = true;
        self.scrolls_to_bottom += 1;
    }
}
