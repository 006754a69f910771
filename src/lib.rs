pub mod cursor;
mod engine;
mod error;
mod flow;
mod host;
mod input;
mod measure;
mod model;

pub use engine::PageFlow;
pub use error::Error;
pub use host::{ChangeWatcher, CursorHost, FlowObserver, Measurer, NullObserver};
pub use input::{load_document, parse_document};
pub use measure::TextMeasurer;
pub use model::{
    Caret, CursorSnapshot, Element, Node, Page, PageOptions, Section, TocEntry, find_tag,
    plain_text, text_len,
};

use std::path::Path;
use std::time::Instant;

/// Load a JSON document from disk and paginate it in one pass. Returns the
/// engine holding the finished page set and TOC.
pub fn paginate_file<M: Measurer>(
    input: &Path,
    options: PageOptions,
    measurer: M,
) -> Result<PageFlow<M>, Error> {
    let t0 = Instant::now();

    let sections = input::load_document(input)?;
    let t_parse = t0.elapsed();

    let mut flow = PageFlow::new(options, measurer)?;
    flow.paginate(&sections);
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, paginate={:.1}ms, total={:.1}ms ({} pages, {} TOC entries)",
        t_parse.as_secs_f64() * 1000.0,
        (t_total - t_parse).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        flow.pages().len(),
        flow.toc().len(),
    );

    Ok(flow)
}
