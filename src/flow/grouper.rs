use smallvec::SmallVec;

use crate::host::Measurer;
use crate::model::{PageOptions, Section};

/// Share of a header section's own height that must remain free below it
/// before it may start near the bottom of a page.
const WIDOW_RATIO: f32 = 0.3;

/// A run of 1-2 sections that must land on the same page atomically. The
/// summed height may exceed the page budget; oversized groups are placed
/// anyway and overflow visibly.
pub(crate) struct Group {
    pub sections: SmallVec<[Section; 2]>,
    pub height: f32,
    /// Start a fresh page before placing, even though the group would fit.
    pub break_before: bool,
}

impl Group {
    pub fn len(&self) -> usize {
        self.sections.len()
    }
}

/// Build the next group starting at `index`, given the fill of the page
/// currently being packed. `merge_header_only` is disabled on re-pack:
/// header/body pairs were already resolved on the first pass.
pub(crate) fn next_group(
    source: &[Section],
    index: usize,
    fill: f32,
    page_open: bool,
    merge_header_only: bool,
    opts: &PageOptions,
    measurer: &mut dyn Measurer,
) -> Group {
    let section = &source[index];
    let width = opts.content_width();
    let budget = opts.content_height();
    let height = measurer.measure(section, width);

    // A short section that is essentially just a header is orphan-prone:
    // keep it with whatever follows.
    if merge_header_only
        && section.header(&opts.header_tag).is_some()
        && height < opts.header_only_threshold
    {
        if let Some(next) = source.get(index + 1) {
            let next_height = measurer.measure(next, width);
            let mut sections = SmallVec::new();
            sections.push(section.clone());
            sections.push(next.clone());
            return Group {
                sections,
                height: height + next_height,
                break_before: false,
            };
        }
    }

    // Widow-header guard: a header that fits but leaves almost no room for
    // its body below it gets pushed to the next page instead. Both joint
    // conditions are load-bearing; do not collapse them into one.
    let mut break_before = false;
    if page_open
        && (section.header(&opts.header_tag).is_some()
            || section.header(&opts.subheader_tag).is_some())
    {
        let remaining = budget - fill - height;
        if remaining < opts.min_content_after_header && remaining < WIDOW_RATIO * height {
            break_before = true;
        }
    }

    let mut sections = SmallVec::new();
    sections.push(section.clone());
    Group {
        sections,
        height,
        break_before,
    }
}
