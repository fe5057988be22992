use super::dataset::Dataset;
use super::tags::TagVocabulary;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagDistributionRow {
    pub tag: String,
    /// Contacts whose last call carries the tag.
    pub count: u64,
    /// `count` over the number of called contacts.
    pub rate: f64,
    /// Whether the tag belongs to the known call outcome vocabulary.
    pub known: bool,
}

/// Per-tag contact counts, most frequent first, ties by tag name.
///
/// Tags are gathered from every row, called or not, while rates are taken
/// over called contacts only. Without any call the table is empty.
pub fn compute_distribution(dataset: &Dataset) -> Vec<TagDistributionRow> {
    let calls_total = dataset.rows().iter().filter(|row| row.is_called()).count() as u64;
    if calls_total == 0 {
        return Vec::new();
    }

    let mut tag_counts: HashMap<String, u64> = HashMap::new();
    for row in dataset.rows() {
        for tag in row.tags().iter() {
            *tag_counts.entry(tag.to_string()).or_default() += 1;
        }
    }

    let mut distribution: Vec<TagDistributionRow> = tag_counts
        .into_iter()
        .map(|(tag, count)| TagDistributionRow {
            known: TagVocabulary::AllKnown.contains(&tag),
            rate: count as f64 / calls_total as f64,
            tag,
            count,
        })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    distribution
}
