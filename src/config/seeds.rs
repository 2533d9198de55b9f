use crate::url::sanitize_line;
use crate::InputError;
use std::io::ErrorKind;
use std::path::Path;

/// Reads the newline-delimited seed list at `path`
///
/// Lines are sanitized (trimmed, commas and double quotes removed) and blank
/// lines are dropped. Lines are not parsed as URLs here; invalid entries are
/// reported and skipped when the crawl schedules them.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Sanitized seed lines in file order
/// * `Err(InputError)` - The file is missing, unreadable, or has no entries
pub fn load_seed_urls(path: &Path) -> Result<Vec<String>, InputError> {
    let path_label = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => InputError::Missing {
            path: path_label.clone(),
        },
        _ => InputError::Unreadable {
            path: path_label.clone(),
            source,
        },
    })?;

    let seeds = parse_seed_list(&content);
    if seeds.is_empty() {
        return Err(InputError::Empty { path: path_label });
    }

    tracing::debug!("Loaded {} seed URLs from {}", seeds.len(), path_label);
    Ok(seeds)
}

/// Splits seed file content into sanitized, non-blank lines
pub fn parse_seed_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(sanitize_line)
        .filter(|line| !line.is_empty())
        .collect()
}
