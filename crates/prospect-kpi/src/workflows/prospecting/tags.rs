use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

const TAG_DELIMITERS: [char; 3] = [',', ';', '|'];

/// Distinct call outcome tags of one contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn intersects(&self, vocabulary: TagVocabulary) -> bool {
        let members = vocabulary.members();
        self.0.iter().any(|tag| members.contains(tag.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Splits a raw Aircall tag cell on `,` `;` `|`, trimming each piece.
/// Case is preserved; an absent cell yields an empty set.
pub fn parse_tags(raw: Option<&str>) -> TagSet {
    let Some(raw) = raw else {
        return TagSet::default();
    };

    TagSet(
        raw.split(TAG_DELIMITERS)
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Business classifications of call outcome tags. Matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagVocabulary {
    AllKnown,
    Connected,
    Pitched,
    RdvPhone,
}

impl TagVocabulary {
    pub const fn tags(self) -> &'static [&'static str] {
        match self {
            Self::AllKnown => &[
                "Meeting",
                "Pitch",
                "Sans Suite",
                "Standard",
                "No answer",
                "Numéro Faux",
            ],
            Self::Connected => &["Meeting", "Pitch", "Sans Suite", "Standard"],
            Self::Pitched => &["Meeting", "Pitch"],
            Self::RdvPhone => &["Meeting"],
        }
    }

    pub fn members(self) -> &'static HashSet<&'static str> {
        static ALL_KNOWN: OnceLock<HashSet<&'static str>> = OnceLock::new();
        static CONNECTED: OnceLock<HashSet<&'static str>> = OnceLock::new();
        static PITCHED: OnceLock<HashSet<&'static str>> = OnceLock::new();
        static RDV_PHONE: OnceLock<HashSet<&'static str>> = OnceLock::new();

        let cell = match self {
            Self::AllKnown => &ALL_KNOWN,
            Self::Connected => &CONNECTED,
            Self::Pitched => &PITCHED,
            Self::RdvPhone => &RDV_PHONE,
        };
        cell.get_or_init(|| self.tags().iter().copied().collect())
    }

    pub fn contains(self, tag: &str) -> bool {
        self.members().contains(tag)
    }
}
