use crate::error::LoadError;

/// Pick the node a run starts from.
///
/// The first node, in definition order, whose lowercased name starts with
/// `"start"` or with the lowercased display name wins. Without a match the
/// first-defined node is used.
pub fn select_start_node<'a>(nodes: &'a [String], display_name: &str) -> Result<&'a str, LoadError> {
    let display = display_name.to_lowercase();
    nodes
        .iter()
        .find(|name| {
            let lower = name.to_lowercase();
            lower.starts_with("start") || (!display.is_empty() && lower.starts_with(&display))
        })
        .or_else(|| nodes.first())
        .map(String::as_str)
        .ok_or(LoadError::EmptyScript)
}
