//! Parse pageaudit-ignore comment directives from a document

use crate::document::DocumentTree;
use crate::Check;
use std::collections::HashSet;
use tracing::debug;

const DIRECTIVE: &str = "pageaudit-ignore";

/// Checks switched off by `<!-- pageaudit-ignore check-a, check-b -->` comments.
///
/// A directive without a check list is ignored; it never disables every check.
pub fn ignored_checks(doc: &dyn DocumentTree) -> HashSet<Check> {
    let mut out = HashSet::new();
    for comment in doc.comments() {
        let Some(idx) = comment.find(DIRECTIVE) else {
            continue;
        };
        let rest = &comment[idx + DIRECTIVE.len()..];
        for id in rest
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
        {
            match id.parse::<Check>() {
                Ok(check) => {
                    out.insert(check);
                }
                Err(_) => debug!(id, "unknown check in pageaudit-ignore directive"),
            }
        }
    }
    out
}
