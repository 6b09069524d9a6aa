use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Release;

/// Season/sequel markers recognized in titles.
///
/// The Chinese ordinal form accepts ASCII digits, full-width digits, and
/// numerals up to the compound forms (第十一季, 第二十三季). The "SN" form
/// is word-bounded so a letter run containing an `s` does not match.
static SEASON_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"第[0-9０-９零一二三四五六七八九十百]+季").unwrap(),
        Regex::new(r"(?i)\bseason\s*[0-9]+\b").unwrap(),
        Regex::new(r"(?i)\bs[0-9]+\b").unwrap(),
    ]
});

static TRAILING_INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[0-9]+$").unwrap());

/// Reduces a display title to the key used for duplicate grouping.
///
/// A colon-joined title is assumed to be "series name: subtitle", and the
/// subtitle is the more specific half, so only the last colon segment is
/// kept. Season/sequel markers and a bare trailing sequel index are then
/// stripped, along with all whitespace. Matching on the result is
/// case-sensitive.
pub fn normalized_key(title: &str) -> String {
    let folded = title.replace('：', ":");
    let subject = match folded.rsplit_once(':') {
        Some((_, subtitle)) => subtitle,
        None => folded.as_str(),
    };

    let mut key = subject.to_string();
    for marker in SEASON_MARKERS.iter() {
        key = marker.replace_all(&key, "").into_owned();
    }
    let key = TRAILING_INDEX.replace(&key, "");

    key.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Tests the raw (un-normalized) title for a season/sequel marker.
///
/// Used to prefer the bare form of a title over its season variants: the
/// marker-free form is the one viewers search for.
pub fn has_season_marker(title: &str) -> bool {
    SEASON_MARKERS.iter().any(|marker| marker.is_match(title))
}

struct CanonicalEntry {
    key: String,
    release: Release,
}

/// Collapses duplicate announcements of the same work into one canonical
/// record per title.
///
/// Releases are processed in input order against an accumulator:
/// - an exact raw-title match keeps whichever record has the earlier
///   release date (no fall-through to key matching);
/// - a normalized-key match prefers the record without a season marker
///   regardless of date; when both or neither carry a marker, the earlier
///   release date wins;
/// - otherwise the release starts a new canonical entry.
///
/// Replacements happen in place, so surviving records keep the position
/// of their first appearance.
pub fn dedup_releases(releases: Vec<Release>) -> Vec<Release> {
    let mut canonical: Vec<CanonicalEntry> = Vec::new();

    for incoming in releases {
        if let Some(entry) = canonical
            .iter_mut()
            .find(|entry| entry.release.title == incoming.title)
        {
            if incoming.release_date < entry.release.release_date {
                entry.release = incoming;
            }
            continue;
        }

        let key = normalized_key(&incoming.title);
        if let Some(entry) = canonical.iter_mut().find(|entry| entry.key == key) {
            let incoming_marked = has_season_marker(&incoming.title);
            let kept_marked = has_season_marker(&entry.release.title);

            if incoming_marked != kept_marked {
                if !incoming_marked {
                    entry.release = incoming;
                }
            } else if incoming.release_date < entry.release.release_date {
                entry.release = incoming;
            }
            continue;
        }

        canonical.push(CanonicalEntry { key, release: incoming });
    }

    canonical.into_iter().map(|entry| entry.release).collect()
}
