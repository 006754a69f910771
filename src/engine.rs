use std::time::Instant;

use crate::cursor;
use crate::error::Error;
use crate::flow::{self, toc};
use crate::host::{ChangeWatcher, CursorHost, FlowObserver, Measurer, NullObserver};
use crate::model::{Page, PageOptions, Section, TocEntry};

/// Overflow tolerance: a page must exceed its budget by more than this
/// before it counts as overflowing. Absorbs sub-pixel measurement noise.
const OVERFLOW_SLACK: f32 = 10.0;
/// Extra slack required before the whole last page is pulled into the
/// second-to-last one.
const CONSOLIDATE_SLACK: f32 = 20.0;

/// The pagination engine. Owns the page set, the TOC and the anchor-id
/// registry; talks to the host through the `Measurer` / `ChangeWatcher` /
/// `CursorHost` capabilities implemented on `H`.
///
/// Static use is a single `paginate` pass. Editable hosts additionally
/// drive `poll` from their event loop: change signals are debounced, and an
/// actual reflow tears every page down and rebuilds from the flattened
/// section sequence, carrying the caret across as a global text offset.
pub struct PageFlow<H> {
    options: PageOptions,
    host: H,
    observer: Box<dyn FlowObserver>,
    pages: Vec<Page>,
    toc: Vec<TocEntry>,
    registry: toc::IdRegistry,
    /// Non-reentrancy guard: change signals arriving while a reflow runs
    /// are dropped; the rebuilt state is re-evaluated on the next poll.
    reflowing: bool,
    /// Pending debounce deadline; reset by every qualifying change signal.
    deadline: Option<Instant>,
}

impl<H> PageFlow<H> {
    pub fn new(options: PageOptions, host: H) -> Result<Self, Error> {
        options.validate()?;
        Ok(Self {
            options,
            host,
            observer: Box::new(NullObserver),
            pages: Vec::new(),
            toc: Vec::new(),
            registry: toc::IdRegistry::default(),
            reflowing: false,
            deadline: None,
        })
    }

    pub fn with_observer(mut self, observer: Box<dyn FlowObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn options(&self) -> &PageOptions {
        &self.options
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// The live content region. Editable hosts apply text and node edits
    /// here, then report them through their `ChangeWatcher`.
    pub fn pages_mut(&mut self) -> &mut Vec<Page> {
        &mut self.pages
    }

    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The rendered TOC as a placeable section, once pagination has run.
    /// None when the TOC is disabled.
    pub fn toc_section(&self) -> Option<Section> {
        self.options.toc.then(|| toc::render_toc(&self.toc))
    }
}

impl<H: Measurer> PageFlow<H> {
    /// Full forward pass: group, pack, build the TOC. Replaces any previous
    /// page set; the source sections are cloned on placement and never
    /// mutated.
    pub fn paginate(&mut self, sections: &[Section]) {
        let t0 = Instant::now();
        let (pages, entries) = flow::pack(
            sections,
            &self.options,
            &mut self.host,
            &mut self.registry,
            self.observer.as_mut(),
            true,
        );
        self.pages = pages;
        self.toc = entries;
        self.observer
            .pagination_complete(self.pages.len(), &self.toc);
        log::info!(
            "paginated {} sections into {} pages in {:.1}ms",
            sections.len(),
            self.pages.len(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );
    }

    /// Scan pages in order for a layout defect a repagination would fix:
    /// overflow past the content box, room to pull the next page's first
    /// section forward, or a last page that fits wholesale into the one
    /// before it. Comparisons are strict; the slack constants absorb
    /// measurement noise only.
    pub fn needs_reflow(&mut self) -> bool {
        let budget = self.options.content_height();
        let width = self.options.content_width();

        let mut heights = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let mut h = 0.0_f32;
            for section in &page.sections {
                h += self.host.measure(section, width);
            }
            heights.push(h);
        }

        for (i, &h) in heights.iter().enumerate() {
            if h > budget + OVERFLOW_SLACK {
                log::debug!("page {} overflows: {:.1} > {:.1}", i + 1, h, budget);
                return true;
            }
            if let Some(first) = self.pages.get(i + 1).and_then(|p| p.sections.first()) {
                let first_h = self.host.measure(first, width);
                if first_h < budget - h - OVERFLOW_SLACK {
                    log::debug!(
                        "page {} underflows: {:.1} of spare {:.1} pullable",
                        i + 1,
                        first_h,
                        budget - h,
                    );
                    return true;
                }
            }
        }

        if self.pages.len() >= 2 {
            let last = heights[heights.len() - 1];
            let second_last = heights[heights.len() - 2];
            if last < budget - second_last - CONSOLIDATE_SLACK {
                log::debug!(
                    "last page ({:.1}) fits into previous page's spare {:.1}",
                    last,
                    budget - second_last,
                );
                return true;
            }
        }
        false
    }
}

impl<H: Measurer + CursorHost> PageFlow<H> {
    /// A content mutation signal. Ignored while a reflow is in progress or
    /// when the engine is not editable; otherwise arms (or re-arms) the
    /// debounce deadline if the current layout actually needs repair.
    pub fn content_changed(&mut self, now: Instant) {
        if self.reflowing || !self.options.editable {
            return;
        }
        if self.needs_reflow() {
            self.deadline = Some(now + self.options.reflow_delay);
        }
    }

    /// One event-loop turn: drain the host's change signals, and run the
    /// debounced reflow once its deadline has passed. Returns true if a
    /// reflow ran.
    pub fn poll(&mut self, now: Instant) -> bool
    where
        H: ChangeWatcher,
    {
        if self.host.take_changes() {
            self.content_changed(now);
        }
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.reflow();
                true
            }
            _ => false,
        }
    }

    /// Immediate repagination, bypassing the debounce. Saves the caret as a
    /// global text offset, flattens every page back into one section
    /// sequence, discards all pages, re-packs from the configured start
    /// number (header/body grouping is not re-applied: groups are size 1 on
    /// re-pack), and restores the caret.
    pub fn reflow_now(&mut self) {
        self.reflow();
    }

    fn reflow(&mut self) {
        self.reflowing = true;
        let t0 = Instant::now();

        let snapshot = self
            .host
            .caret()
            .and_then(|caret| cursor::save(&self.pages, &caret));

        let flat: Vec<Section> = self
            .pages
            .iter()
            .flat_map(|page| page.sections.iter().cloned())
            .collect();
        self.pages.clear();
        self.toc.clear();

        let (pages, entries) = flow::pack(
            &flat,
            &self.options,
            &mut self.host,
            &mut self.registry,
            self.observer.as_mut(),
            false,
        );
        self.pages = pages;
        self.toc = entries;

        if let Some(snapshot) = snapshot {
            if let Some(caret) = cursor::restore(&self.pages, snapshot) {
                self.host.set_caret(caret);
            }
        }

        self.observer.reflow_complete(self.pages.len());
        log::debug!(
            "reflowed {} sections into {} pages in {:.1}ms",
            flat.len(),
            self.pages.len(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );
        self.reflowing = false;
    }

    /// Backspace pressed with a collapsed caret. Returns true when the key
    /// must be suppressed: the caret sits at the start of a non-first
    /// page's content (nothing but whitespace before it on that page), so
    /// instead of deleting, the caret jumps to the end of the previous page
    /// and a full reflow rebalances content across the boundary. Ordinary
    /// backspace anywhere else returns false; overflow/underflow detection
    /// picks up the edit on its own.
    pub fn backspace_at_page_start(&mut self) -> bool {
        if !self.options.editable {
            return false;
        }
        let Some(caret) = self.host.caret() else {
            return false;
        };
        if caret.page == 0 || caret.page >= self.pages.len() {
            return false;
        }
        let Some(prefix) = cursor::page_prefix_text(&self.pages[caret.page], &caret) else {
            return false;
        };
        if !prefix.trim().is_empty() {
            return false;
        }
        if let Some(end) = cursor::end_of_page(&self.pages, caret.page - 1) {
            self.host.set_caret(end);
        }
        self.reflow();
        true
    }

    /// Resolve a TOC entry's anchor in the current page set and ask the
    /// host to bring it into view. False if the anchor no longer exists.
    pub fn scroll_to_entry(&mut self, entry: &TocEntry) -> bool {
        match toc::find_anchor(&self.pages, &entry.id) {
            Some((page, path)) => {
                self.host.scroll_to(page, &path);
                true
            }
            None => false,
        }
    }
}
