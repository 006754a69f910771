pub(crate) mod grouper;
pub(crate) mod toc;

use crate::host::{FlowObserver, Measurer};
use crate::model::{Page, PageOptions, Section, TocEntry};

/// Pack the section sequence into pages. Single forward pass, no lookahead
/// beyond the group currently being evaluated; pages are numbered
/// sequentially from `opts.start_page_number`.
///
/// Postcondition: the concatenation of all pages' sections equals the input
/// sequence (stable partition; nothing dropped, duplicated or reordered).
pub(crate) fn pack(
    source: &[Section],
    opts: &PageOptions,
    measurer: &mut dyn Measurer,
    registry: &mut toc::IdRegistry,
    observer: &mut dyn FlowObserver,
    merge_header_only: bool,
) -> (Vec<Page>, Vec<TocEntry>) {
    let budget = opts.content_height();
    let mut pages: Vec<Page> = Vec::new();
    let mut entries: Vec<TocEntry> = Vec::new();
    let mut fill = 0.0_f32;
    let mut next_number = opts.start_page_number;

    let mut index = 0;
    while index < source.len() {
        let group = grouper::next_group(
            source,
            index,
            fill,
            !pages.is_empty(),
            merge_header_only,
            opts,
            measurer,
        );
        let advance = group.len();

        let force_break = group.break_before && pages.last().is_some_and(|p| !p.sections.is_empty());
        if pages.is_empty() || fill + group.height > budget || force_break {
            let page = Page::new(next_number);
            next_number += 1;
            fill = 0.0;
            observer.page_created(page.number);
            pages.push(page);
        }

        // The branch above guarantees at least one page exists.
        let last = pages.len() - 1;
        let page = &mut pages[last];
        for mut section in group.sections {
            if opts.toc {
                if let Some(entry) = toc::resolve_entry(&mut section, page.number, opts, registry) {
                    entries.push(entry);
                }
            }
            observer.section_placed(&section, page.number);
            page.sections.push(section);
        }
        fill += group.height;
        page.fill = fill;

        index += advance;
    }

    (pages, entries)
}
