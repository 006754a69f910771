//! Cursor codec: converts a caret into a page-independent global text
//! offset before a reflow, and reconstructs a caret from that offset after
//! the pages have been torn down and rebuilt. Node paths cannot survive a
//! rebuild; character offsets over the concatenated page text can.

use crate::model::{Caret, CursorSnapshot, Node, Page};

struct TextRun<'a> {
    path: Vec<usize>,
    text: &'a str,
}

fn collect_runs<'a>(nodes: &'a [Node], path: &mut Vec<usize>, out: &mut Vec<TextRun<'a>>) {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        match node {
            Node::Text(text) => out.push(TextRun {
                path: path.clone(),
                text,
            }),
            Node::Element(el) => collect_runs(&el.children, path, out),
        }
        path.pop();
    }
}

/// All text runs of a page in depth-first order. Path starts with the
/// section index within the page.
fn text_runs(page: &Page) -> Vec<TextRun<'_>> {
    let mut out = Vec::new();
    for (section_index, section) in page.sections.iter().enumerate() {
        let mut path = vec![section_index];
        collect_runs(&section.nodes, &mut path, &mut out);
    }
    out
}

/// Character offset of the caret within its own page: the summed length of
/// every text run preceding the caret's run, plus the caret's offset into
/// it. A caret with an empty path stands for "end of page content".
fn offset_within_page(page: &Page, caret: &Caret) -> Option<usize> {
    if caret.path.is_empty() {
        return Some(page.text_len());
    }
    let mut acc = 0usize;
    for run in text_runs(page) {
        let len = run.text.chars().count();
        if run.path == caret.path {
            return Some(acc + caret.offset.min(len));
        }
        acc += len;
    }
    None
}

/// Snapshot the caret as a global character offset over all pages in order.
/// Returns None if the caret does not resolve into the page set.
pub fn save(pages: &[Page], caret: &Caret) -> Option<CursorSnapshot> {
    let page = pages.get(caret.page)?;
    let within = offset_within_page(page, caret)?;
    let before: usize = pages[..caret.page].iter().map(Page::text_len).sum();
    let offset = before + within;
    let total: usize = pages.iter().map(Page::text_len).sum();
    Some(CursorSnapshot {
        offset,
        at_end: offset == total,
    })
}

/// Rebuild a caret from a snapshot against a (possibly freshly rebuilt)
/// page set. A snapshot taken at the absolute end, or one whose offset
/// exceeds the new total (content shrank during the triggering edit), lands
/// at the end of the last page.
pub fn restore(pages: &[Page], snapshot: CursorSnapshot) -> Option<Caret> {
    if pages.is_empty() {
        return None;
    }
    if snapshot.at_end {
        return end_of_page(pages, pages.len() - 1);
    }
    let mut remaining = snapshot.offset;
    for (page_index, page) in pages.iter().enumerate() {
        let len = page.text_len();
        if remaining < len {
            return caret_in_page(page, page_index, remaining);
        }
        remaining -= len;
    }
    end_of_page(pages, pages.len() - 1)
}

/// Caret at the very end of the given page's text. Falls back to the bare
/// page when it holds no text at all.
pub fn end_of_page(pages: &[Page], page_index: usize) -> Option<Caret> {
    let page = pages.get(page_index)?;
    match text_runs(page).last() {
        Some(run) => Some(Caret {
            page: page_index,
            path: run.path.clone(),
            offset: run.text.chars().count(),
        }),
        None => Some(Caret {
            page: page_index,
            path: Vec::new(),
            offset: 0,
        }),
    }
}

fn caret_in_page(page: &Page, page_index: usize, mut remaining: usize) -> Option<Caret> {
    for run in text_runs(page) {
        let len = run.text.chars().count();
        if remaining < len {
            return Some(Caret {
                page: page_index,
                path: run.path,
                offset: remaining,
            });
        }
        remaining -= len;
    }
    None
}

/// Text of the page strictly before the caret. None if the caret's path
/// does not resolve. Used to recognise a "start of page" caret: a prefix
/// that is empty or all-whitespace.
pub(crate) fn page_prefix_text(page: &Page, caret: &Caret) -> Option<String> {
    let mut prefix = String::new();
    for run in text_runs(page) {
        if run.path == caret.path {
            let head: String = run.text.chars().take(caret.offset).collect();
            prefix.push_str(&head);
            return Some(prefix);
        }
        prefix.push_str(run.text);
    }
    None
}
