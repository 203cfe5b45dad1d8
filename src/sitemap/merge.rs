use super::{ChangeFreq, ChangeSet, UrlSet};

/// Reconcile `current` with history.
///
/// Each existing entry consumes the event for its location, if any: a
/// delete drops the entry, anything else replaces it. Entries without an
/// event are kept as daily. Events left over afterwards are new pages,
/// except deletes, which had nothing to remove. The result is sorted.
pub fn merge(current: UrlSet, mut changes: ChangeSet, base_url: &str) -> UrlSet {
    let UrlSet { xmlns, urls } = current;
    let mut merged = Vec::with_capacity(urls.len() + changes.len());

    for mut url in urls {
        match changes.remove(&url.loc) {
            None => {
                url.changefreq = Some(ChangeFreq::Daily);
                merged.push(url);
            }
            Some(event) if event.status.is_delete() => {}
            Some(event) => merged.push(event.to_entry(base_url)),
        }
    }

    merged.extend(
        changes
            .into_values()
            .filter(|event| !event.status.is_delete())
            .map(|event| event.to_entry(base_url)),
    );

    let mut set = UrlSet { xmlns, urls: merged };
    set.sort();
    set
}
