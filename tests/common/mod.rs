#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use pageflow::{
    Caret, ChangeWatcher, CursorHost, Element, FlowObserver, Measurer, Node, PageOptions, Section,
    TocEntry,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// In-memory host: scripted heights keyed on section id, a stored caret,
/// and a change flag the engine drains on poll.
pub struct FakeHost {
    pub heights: HashMap<String, f32>,
    pub default_height: f32,
    pub caret: Option<Caret>,
    pub pending_changes: bool,
    pub scrolled: Vec<(usize, Vec<usize>)>,
    pub measure_calls: usize,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            heights: HashMap::new(),
            default_height: 50.0,
            caret: None,
            pending_changes: false,
            scrolled: Vec::new(),
            measure_calls: 0,
        }
    }

    pub fn with_heights(pairs: &[(&str, f32)]) -> Self {
        let mut host = Self::new();
        for (id, height) in pairs {
            host.heights.insert((*id).to_string(), *height);
        }
        host
    }

    pub fn set_height(&mut self, id: &str, height: f32) {
        self.heights.insert(id.to_string(), height);
    }
}

impl Measurer for FakeHost {
    fn measure(&mut self, section: &Section, _available_width: f32) -> f32 {
        self.measure_calls += 1;
        section
            .id
            .as_deref()
            .and_then(|id| self.heights.get(id).copied())
            .unwrap_or(self.default_height)
    }
}

impl ChangeWatcher for FakeHost {
    fn take_changes(&mut self) -> bool {
        std::mem::take(&mut self.pending_changes)
    }
}

impl CursorHost for FakeHost {
    fn caret(&self) -> Option<Caret> {
        self.caret.clone()
    }

    fn set_caret(&mut self, caret: Caret) {
        self.caret = Some(caret);
    }

    fn scroll_to(&mut self, page: usize, path: &[usize]) {
        self.scrolled.push((page, path.to_vec()));
    }
}

/// Page options with zero padding, so the content budget equals the page
/// height exactly.
pub fn opts(budget: f32) -> PageOptions {
    PageOptions {
        page_width: 800.0,
        page_height: budget,
        padding_top: 0.0,
        padding_right: 0.0,
        padding_bottom: 0.0,
        padding_left: 0.0,
        ..PageOptions::default()
    }
}

pub fn editable_opts(budget: f32) -> PageOptions {
    PageOptions {
        editable: true,
        ..opts(budget)
    }
}

/// Plain paragraph section with an explicit id (used as the height key).
pub fn para(id: &str, text: &str) -> Section {
    let mut section = Section::new(vec![Node::Element(Element::with_text("p", text))]);
    section.id = Some(id.to_string());
    section
}

/// Section with a primary header plus body text.
pub fn headed(id: &str, title: &str, body: &str) -> Section {
    let mut section = Section::new(vec![
        Node::Element(Element::with_text("h2", title)),
        Node::Element(Element::with_text("p", body)),
    ]);
    section.id = Some(id.to_string());
    section
}

/// Section containing nothing but a primary header.
pub fn header_only(id: &str, title: &str) -> Section {
    let mut section = Section::new(vec![Node::Element(Element::with_text("h2", title))]);
    section.id = Some(id.to_string());
    section
}

/// Section with only a sub-header plus body text.
pub fn sub_headed(id: &str, title: &str, body: &str) -> Section {
    let mut section = Section::new(vec![
        Node::Element(Element::with_text("h3", title)),
        Node::Element(Element::with_text("p", body)),
    ]);
    section.id = Some(id.to_string());
    section
}

pub fn section_ids(page: &pageflow::Page) -> Vec<&str> {
    page.sections
        .iter()
        .filter_map(|s| s.id.as_deref())
        .collect()
}

#[derive(Default)]
pub struct Events {
    pub pages_created: Vec<usize>,
    pub sections_placed: Vec<(Option<String>, usize)>,
    pub pagination_complete: Option<(usize, Vec<TocEntry>)>,
    pub reflows: Vec<usize>,
}

/// Observer writing into a shared cell so tests can inspect notifications
/// after the engine has consumed the observer box.
pub struct Recorder(pub Rc<RefCell<Events>>);

impl Recorder {
    pub fn new() -> (Self, Rc<RefCell<Events>>) {
        let events = Rc::new(RefCell::new(Events::default()));
        (Self(events.clone()), events)
    }
}

impl FlowObserver for Recorder {
    fn page_created(&mut self, number: usize) {
        self.0.borrow_mut().pages_created.push(number);
    }

    fn section_placed(&mut self, section: &Section, page_number: usize) {
        self.0
            .borrow_mut()
            .sections_placed
            .push((section.id.clone(), page_number));
    }

    fn pagination_complete(&mut self, page_count: usize, toc: &[TocEntry]) {
        self.0.borrow_mut().pagination_complete = Some((page_count, toc.to_vec()));
    }

    fn reflow_complete(&mut self, page_count: usize) {
        self.0.borrow_mut().reflows.push(page_count);
    }
}
