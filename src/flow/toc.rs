use std::collections::HashSet;

use crate::model::{Element, Node, Page, PageOptions, Section, TocEntry};

/// Anchor ids assigned over one engine's lifetime. Never shrinks, so a
/// generated id can never collide with anything seen before — including
/// across reflows.
#[derive(Debug, Default)]
pub(crate) struct IdRegistry {
    assigned: HashSet<String>,
}

impl IdRegistry {
    pub fn register(&mut self, id: &str) {
        self.assigned.insert(id.to_string());
    }

    /// Claim a unique id derived from `slug`, appending "-1", "-2", ... if
    /// the bare slug is taken.
    pub fn claim(&mut self, slug: &str) -> String {
        if !self.assigned.contains(slug) {
            self.assigned.insert(slug.to_string());
            return slug.to_string();
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{slug}-{n}");
            if !self.assigned.contains(&candidate) {
                self.assigned.insert(candidate.clone());
                return candidate;
            }
            n += 1;
        }
    }
}

/// Lowercase, collapse runs of non-alphanumerics to single hyphens, trim
/// hyphens at both ends.
pub(crate) fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for ch in title.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Resolve the TOC record for a freshly placed section. Returns None for
/// sections with no usable title. Writes a derived anchor id back onto the
/// placed clone so later reflows see it as explicit.
pub(crate) fn resolve_entry(
    section: &mut Section,
    page_number: usize,
    opts: &PageOptions,
    registry: &mut IdRegistry,
) -> Option<TocEntry> {
    let title = section
        .toc_title
        .clone()
        .or_else(|| section.header_text(&opts.header_tag))
        .or_else(|| section.header_text(&opts.subheader_tag))
        .filter(|t| !t.is_empty())?;

    let indent = section.toc_indent.unwrap_or_else(|| {
        section.header(&opts.subheader_tag).is_some() && section.header(&opts.header_tag).is_none()
    });

    let id = match &section.id {
        Some(id) => {
            registry.register(id);
            id.clone()
        }
        None => {
            let slug = slugify(&title);
            let slug = if slug.is_empty() { "section" } else { &slug };
            let id = registry.claim(slug);
            section.id = Some(id.clone());
            id
        }
    };

    Some(TocEntry {
        title,
        id,
        page: page_number,
        indent,
    })
}

/// Render the finished entry list as a navigable section: a nav > ol tree
/// with one link per entry and the page number as trailing text. Indented
/// entries nest in a sub-list under the previous top-level item.
pub(crate) fn render_toc(entries: &[TocEntry]) -> Section {
    let mut root = Element::new("ol");
    for entry in entries {
        let mut link = Element::with_text("a", entry.title.clone());
        link.href = Some(format!("#{}", entry.id));
        let mut item = Element::new("li");
        item.children.push(Node::Element(link));
        item.children.push(Node::text(format!(" {}", entry.page)));

        if entry.indent {
            if let Some(Node::Element(prev)) = root.children.last_mut() {
                match prev.children.last_mut() {
                    Some(Node::Element(sub)) if sub.tag == "ol" => {
                        sub.children.push(Node::Element(item));
                    }
                    _ => {
                        let mut sub = Element::new("ol");
                        sub.children.push(Node::Element(item));
                        prev.children.push(Node::Element(sub));
                    }
                }
                continue;
            }
        }
        root.children.push(Node::Element(item));
    }

    let mut nav = Element::new("nav");
    nav.id = Some("toc".to_string());
    nav.children.push(Node::Element(root));

    let mut section = Section::new(vec![Node::Element(nav)]);
    section.id = Some("toc".to_string());
    section
}

/// Locate the page and node path of an anchor id in the current page set.
/// Matches either a section's own id or an element id inside it.
pub(crate) fn find_anchor(pages: &[Page], id: &str) -> Option<(usize, Vec<usize>)> {
    for (page_index, page) in pages.iter().enumerate() {
        for (section_index, section) in page.sections.iter().enumerate() {
            if section.id.as_deref() == Some(id) {
                return Some((page_index, vec![section_index]));
            }
            let mut path = vec![section_index];
            if find_element(&section.nodes, id, &mut path) {
                return Some((page_index, path));
            }
        }
    }
    None
}

fn find_element(nodes: &[Node], id: &str, path: &mut Vec<usize>) -> bool {
    for (i, node) in nodes.iter().enumerate() {
        if let Node::Element(el) = node {
            path.push(i);
            if el.id.as_deref() == Some(id) {
                return true;
            }
            if find_element(&el.children, id, path) {
                return true;
            }
            path.pop();
        }
    }
    false
}
