use crate::item::Item;
use std::collections::{HashMap, HashSet};

pub const RELATED_LIMIT: usize = 5;

/// Tag ids are stored bare; accept `#go` on the command line as `go`.
pub fn normalize_tag(t: &str) -> String {
    let trimmed = t.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed).trim().to_string()
}

/// Count traces per tag, most common first. Ties keep the order in which
/// tags were first seen.
pub fn tag_counts(items: &[Item]) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in items {
        for tag in item.tags().filter(|t| !t.is_empty()) {
            let entry = counts.entry(tag.to_string()).or_insert_with(|| {
                order.push(tag.to_string());
                0
            });
            *entry += 1;
        }
    }
    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|tag| {
            let count = counts.get(&tag).copied().unwrap_or_default();
            (tag, count)
        })
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Other traces sharing at least one tag with `item`, most shared tags
/// first. Ties keep their order in `items`; at most `limit` are returned.
pub fn related<'a>(
    item: &Item,
    items: impl IntoIterator<Item = &'a Item>,
    limit: usize,
) -> Vec<&'a Item> {
    let mine: HashSet<&str> = item.tags().filter(|t| !t.is_empty()).collect();
    let mut scored: Vec<(usize, &Item)> = items
        .into_iter()
        .filter(|other| other.slug != item.slug)
        .filter_map(|other| {
            let theirs: HashSet<&str> = other.tags().collect();
            let overlap = theirs.iter().filter(|t| mine.contains(*t)).count();
            (overlap > 0).then_some((overlap, other))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, other)| other).collect()
}

/// Hash a tag for deterministic color selection
pub fn hash_tag(tag: &str) -> u64 {
    let mut h: u64 = 5381;
    for b in tag.bytes() {
        h = (h.wrapping_shl(5)).wrapping_add(h) ^ u64::from(b);
    }
    h
}

/// Get color for a tag based on hash
pub fn color_for_tag(tag: &str) -> (u8, u8, u8) {
    const PALETTE: &[(u8, u8, u8)] = &[
        (137, 180, 250),
        (166, 227, 161),
        (249, 226, 175),
        (245, 194, 231),
        (255, 169, 167),
        (148, 226, 213),
        (198, 160, 246),
        (240, 198, 198),
        (181, 232, 224),
        (183, 189, 248),
        (255, 214, 165),
        (179, 255, 171),
        (196, 181, 255),
        (186, 225, 255),
        (255, 241, 173),
        (168, 237, 255),
    ];
    let h = hash_tag(tag);
    PALETTE[(h as usize) % PALETTE.len()]
}
