//! Indented text rendering of the content tree.

use crate::content::ContentData;
use crate::error::DirectoryError;
use crate::tree::ContactTree;

/// Render the subtree rooted at `id`.
pub fn format_outline(tree: &ContactTree, id: &str) -> Result<String, DirectoryError> {
    tree.node(id)?;
    Ok(format_outline_inner(tree, id, 0, false))
}

/// Render every top-level subtree.
pub fn format_forest(tree: &ContactTree) -> String {
    tree.top_level()
        .iter()
        .map(|n| format_outline_inner(tree, &n.id, 0, false))
        .collect()
}

fn format_outline_inner(tree: &ContactTree, id: &str, indent: usize, is_last: bool) -> String {
    let mut output = String::new();
    let Some(node) = tree.get(id) else {
        return output;
    };
    let label = match &node.data {
        ContentData::HeldPosition(held) => {
            let title = tree.title(id).unwrap_or_default();
            format!("{} [{}: {} -> {}]", title, node.kind(), node.id, held.position)
        }
        _ => format!("{} [{}: {}]", node.title(), node.kind(), node.id),
    };

    let prefix = "  ".repeat(indent);

    if indent == 0 {
        output.push_str(&format!("{}\n", label));
    } else {
        let connector = if is_last { "└──" } else { "├──" };
        output.push_str(&format!("{}{} {}\n", prefix, connector, label));
    }

    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        output.push_str(&format_outline_inner(
            tree,
            child,
            indent + 1,
            i + 1 == child_count,
        ));
    }

    output
}
