//! Structured JSON encoding of the tree.
//!
//! A stricter alternative to the indented text format: every node carries
//! an explicit `kind` tag, so empty entries survive and whitespace is kept
//! verbatim. Only selected through its own file magic.

use serde::{Deserialize, Serialize};

use crate::error::{AlockError, Result};
use crate::model::{Folder, Node};

#[derive(Serialize, Deserialize)]
struct Document {
    version: u32,
    children: Vec<Node>,
}

const DOCUMENT_VERSION: u32 = 1;

pub fn encode(root: &Folder) -> Result<Vec<u8>> {
    let document = Document {
        version: DOCUMENT_VERSION,
        children: root.children.clone(),
    };
    serde_json::to_vec_pretty(&document)
        .map_err(|e| AlockError::InvalidInput(format!("Cannot serialize tree: {}", e)))
}

pub fn decode(bytes: &[u8]) -> Result<Folder> {
    let document: Document =
        serde_json::from_slice(bytes).map_err(|e| AlockError::parse(e.line(), e.to_string()))?;
    if document.version != DOCUMENT_VERSION {
        return Err(AlockError::parse(
            0,
            format!("unsupported document version {}", document.version),
        ));
    }
    Ok(Folder {
        children: document.children,
        ..Folder::root()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entry;

    #[test]
    fn test_round_trip_keeps_empty_entries_and_whitespace() {
        let tree = Folder::root()
            .with_child(Folder::new("Work").with_child(Entry::default()))
            .with_child(Entry {
                name: "  padded  ".to_string(),
                notes: "  indented\n".to_string(),
                ..Entry::default()
            });
        let decoded = decode(&encode(&tree).unwrap()).unwrap();
        assert_eq!(decoded, tree);
    }

    #[test]
    fn test_nodes_are_tagged() {
        let tree = Folder::root().with_child(Entry::new("GitHub"));
        let text = String::from_utf8(encode(&tree).unwrap()).unwrap();
        assert!(text.contains("\"kind\": \"entry\""));
        assert!(text.contains("\"password\""));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = decode(b"{\"version\": 1, \"children\": [").unwrap_err();
        assert!(matches!(err, AlockError::Parse { .. }));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let err = decode(b"{\"version\": 9, \"children\": []}").unwrap_err();
        assert!(matches!(err, AlockError::Parse { .. }));
    }
}
