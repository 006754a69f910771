use crate::model::{Caret, Section, TocEntry};

/// Height oracle for a section at a fixed available width. Must reflect the
/// same layout rules the final rendering surface uses; any divergence here
/// shows up directly as wrong page breaks.
pub trait Measurer {
    fn measure(&mut self, section: &Section, available_width: f32) -> f32;
}

/// Host-side mutation accumulator. The engine polls this once per event-loop
/// turn; the host's adapter (e.g. a DOM mutation observer) records text and
/// node-level edits in between. Delivery need not be synchronous with the
/// edit.
pub trait ChangeWatcher {
    /// Drain pending change signals. Returns true if any content mutation
    /// happened since the last call.
    fn take_changes(&mut self) -> bool;
}

/// Caret read/write and visibility on the rendering surface.
pub trait CursorHost {
    /// Current collapsed caret, if the selection is inside the page set.
    fn caret(&self) -> Option<Caret>;
    fn set_caret(&mut self, caret: Caret);
    /// Bring the node at `path` on the given page into view. Smoothness is
    /// the host's choice; the engine only resolves the target.
    fn scroll_to(&mut self, page: usize, path: &[usize]);
}

/// Pagination lifecycle notifications. All methods default to no-ops so
/// observers implement only what they need.
pub trait FlowObserver {
    fn page_created(&mut self, _number: usize) {}
    fn section_placed(&mut self, _section: &Section, _page_number: usize) {}
    fn pagination_complete(&mut self, _page_count: usize, _toc: &[TocEntry]) {}
    fn reflow_complete(&mut self, _page_count: usize) {}
}

/// Observer that ignores everything; the default when none is installed.
pub struct NullObserver;

impl FlowObserver for NullObserver {}
