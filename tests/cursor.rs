mod common;

use common::{FakeHost, editable_opts, para};
use pageflow::cursor::{restore, save};
use pageflow::{Caret, PageFlow};

/// Two pages of two short paragraphs each. Every paragraph's text is five
/// characters, so global offsets are easy to read.
fn two_page_flow() -> PageFlow<FakeHost> {
    let host = FakeHost::with_heights(&[
        ("a", 300.0),
        ("b", 300.0),
        ("c", 300.0),
        ("d", 300.0),
    ]);
    let mut flow = PageFlow::new(editable_opts(600.0), host).unwrap();
    flow.paginate(&[
        para("a", "alpha"),
        para("b", "bravo"),
        para("c", "charl"),
        para("d", "delta"),
    ]);
    assert_eq!(flow.pages().len(), 2);
    flow
}

#[test]
fn save_computes_the_global_offset() {
    let flow = two_page_flow();

    // Third char of "bravo": 5 (alpha) + 2.
    let caret = Caret {
        page: 0,
        path: vec![1, 0, 0],
        offset: 2,
    };
    let snapshot = save(flow.pages(), &caret).unwrap();
    assert_eq!(snapshot.offset, 7);
    assert!(!snapshot.at_end);

    // Start of "charl" on page 2: both page-1 paragraphs precede it.
    let caret = Caret {
        page: 1,
        path: vec![0, 0, 0],
        offset: 0,
    };
    assert_eq!(save(flow.pages(), &caret).unwrap().offset, 10);

    // End of "delta" is the absolute end of the document.
    let caret = Caret {
        page: 1,
        path: vec![1, 0, 0],
        offset: 5,
    };
    let snapshot = save(flow.pages(), &caret).unwrap();
    assert_eq!(snapshot.offset, 20);
    assert!(snapshot.at_end);
}

#[test]
fn save_and_restore_round_trip() {
    let flow = two_page_flow();
    let caret = Caret {
        page: 1,
        path: vec![0, 0, 0],
        offset: 3,
    };
    let snapshot = save(flow.pages(), &caret).unwrap();
    assert_eq!(restore(flow.pages(), snapshot), Some(caret));
}

/// An offset on a page boundary belongs to the next page: the global offset
/// is identical either way, and restore always picks the later position.
#[test]
fn boundary_offset_restores_to_the_next_page_start() {
    let flow = two_page_flow();
    let end_of_first = Caret {
        page: 0,
        path: vec![1, 0, 0],
        offset: 5,
    };
    let snapshot = save(flow.pages(), &end_of_first).unwrap();
    assert_eq!(snapshot.offset, 10);

    let restored = restore(flow.pages(), snapshot).unwrap();
    assert_eq!(restored.page, 1);
    assert_eq!(restored.path, [0, 0, 0]);
    assert_eq!(restored.offset, 0);

    // Same global offset before and after.
    assert_eq!(save(flow.pages(), &restored).unwrap().offset, 10);
}

#[test]
fn oversized_offset_falls_back_to_the_end() {
    let flow = two_page_flow();
    let snapshot = pageflow::CursorSnapshot {
        offset: 10_000,
        at_end: false,
    };
    let restored = restore(flow.pages(), snapshot).unwrap();
    assert_eq!(restored.page, 1);
    assert_eq!(restored.path, [1, 0, 0]);
    assert_eq!(restored.offset, 5);
}

#[test]
fn empty_path_caret_means_end_of_page() {
    let flow = two_page_flow();
    let caret = Caret {
        page: 0,
        path: Vec::new(),
        offset: 0,
    };
    assert_eq!(save(flow.pages(), &caret).unwrap().offset, 10);
}

/// The edit grows section b so it no longer shares page 1 with a; the caret
/// sits in c and must come out of the reflow at the same global offset.
#[test]
fn caret_survives_a_reflow() {
    let mut flow = two_page_flow();
    flow.host_mut().caret = Some(Caret {
        page: 1,
        path: vec![0, 0, 0],
        offset: 4,
    });
    flow.host_mut().set_height("b", 500.0);
    flow.reflow_now();

    // New layout: [a], [b], [c, d].
    assert_eq!(flow.pages().len(), 3);
    let caret = flow.host().caret.clone().unwrap();
    assert_eq!(caret.page, 2);
    assert_eq!(caret.path, [0, 0, 0]);
    assert_eq!(caret.offset, 4);
    assert_eq!(save(flow.pages(), &caret).unwrap().offset, 14);
}

#[test]
fn backspace_merges_across_the_page_boundary() {
    let mut flow = two_page_flow();
    flow.host_mut().caret = Some(Caret {
        page: 1,
        path: vec![0, 0, 0],
        offset: 0,
    });
    assert!(flow.backspace_at_page_start());

    // The caret jumped to the end of the previous page's text before the
    // rebuild, then rode the reflow as a global offset.
    let caret = flow.host().caret.clone().unwrap();
    assert_eq!(save(flow.pages(), &caret).unwrap().offset, 10);
}

#[test]
fn backspace_mid_page_is_an_ordinary_deletion() {
    let mut flow = two_page_flow();

    // Not at the start of the page's text.
    flow.host_mut().caret = Some(Caret {
        page: 1,
        path: vec![0, 0, 0],
        offset: 3,
    });
    assert!(!flow.backspace_at_page_start());

    // Start of the first page has nothing before it to merge into.
    flow.host_mut().caret = Some(Caret {
        page: 0,
        path: vec![0, 0, 0],
        offset: 0,
    });
    assert!(!flow.backspace_at_page_start());
}

#[test]
fn backspace_does_nothing_when_not_editable() {
    let host = FakeHost::with_heights(&[("a", 300.0), ("b", 300.0), ("c", 300.0)]);
    let mut flow = PageFlow::new(common::opts(600.0), host).unwrap();
    flow.paginate(&[para("a", "alpha"), para("b", "bravo"), para("c", "charl")]);
    flow.host_mut().caret = Some(Caret {
        page: 1,
        path: vec![0, 0, 0],
        offset: 0,
    });
    assert!(!flow.backspace_at_page_start());
}
