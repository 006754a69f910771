use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::Section;

/// On-disk document: a flat ordered list of sections.
///
/// ```json
/// {
///   "sections": [
///     { "nodes": [ { "tag": "h2", "children": ["Intro"] }, "Body text." ] }
///   ]
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
struct DocumentFile {
    sections: Vec<Section>,
}

pub fn parse_document(json: &str) -> Result<Vec<Section>, Error> {
    let doc: DocumentFile =
        serde_json::from_str(json).map_err(|e| Error::Input(e.to_string()))?;
    Ok(doc.sections)
}

pub fn load_document(path: &Path) -> Result<Vec<Section>, Error> {
    let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    parse_document(&json)
}
