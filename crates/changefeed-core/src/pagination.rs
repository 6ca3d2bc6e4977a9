use crate::error::{ChangesError, Result};
use crate::models::{ChangedIssuesResult, DateWindow};
use crate::traits::ChangeSource;

/// Walk every page of changed issues, handing each one to `on_page`.
///
/// Pages are requested strictly in sequence because each offset derives from
/// the previous result. The sweep stops on the last page (see
/// [`ChangedIssuesResult::is_last_page`]) or when `on_page` returns `false`.
/// A page whose next offset does not move past the requested one fails with
/// [`ChangesError::MalformedResponse`]. Returns the number of pages fetched.
pub fn for_each_changed_page<F>(
    source: &dyn ChangeSource,
    project_key: &str,
    window: &DateWindow,
    mut on_page: F,
) -> Result<usize>
where
    F: FnMut(&ChangedIssuesResult) -> bool,
{
    let mut start_at = 0;
    let mut pages = 0;

    loop {
        let page = source.get_changed_issues(project_key, start_at, window)?;
        pages += 1;

        if !on_page(&page) || page.is_last_page() {
            break;
        }

        let next_start_at = page.next_start_at();
        if next_start_at <= start_at {
            return Err(ChangesError::MalformedResponse(format!(
                "page requested at offset {} reported startAt {} with {} issues, offset does not advance",
                start_at,
                page.start_at,
                page.issues_count()
            )));
        }
        start_at = next_start_at;
    }

    Ok(pages)
}

/// Collect changed issues across all pages, up to `limit` issues if given
pub fn fetch_all_changed_issues(
    source: &dyn ChangeSource,
    project_key: &str,
    window: &DateWindow,
    limit: Option<usize>,
) -> Result<Vec<serde_json::Value>> {
    let mut all_issues = Vec::new();

    for_each_changed_page(source, project_key, window, |page| {
        let remaining = limit.map_or(usize::MAX, |l| l.saturating_sub(all_issues.len()));
        all_issues.extend(page.issues.iter().take(remaining).cloned());
        limit.map_or(true, |l| all_issues.len() < l)
    })?;

    Ok(all_issues)
}
