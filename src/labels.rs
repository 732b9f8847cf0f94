//! Coarse attack categories and the raw-name lookup table.
//!
//! NSL-KDD records carry one of ~40 fine-grained attack names; classification
//! targets the five coarse categories. Class ids follow lexicographic order of
//! the category names (dos=0, normal=1, probe=2, r2l=3, u2r=4), matching the
//! usual label-encoding of the sorted distinct strings.

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Dos,
    Normal,
    Probe,
    R2l,
    U2r,
}

/// All categories in class-id order.
pub const CATEGORIES: [Category; 5] = [
    Category::Dos,
    Category::Normal,
    Category::Probe,
    Category::R2l,
    Category::U2r,
];

impl Category {
    pub fn id(self) -> usize {
        match self {
            Category::Dos => 0,
            Category::Normal => 1,
            Category::Probe => 2,
            Category::R2l => 3,
            Category::U2r => 4,
        }
    }

    /// Inverse mapping used when labelling report rows.
    pub fn from_id(id: usize) -> Result<Category> {
        CATEGORIES
            .get(id)
            .copied()
            .ok_or_else(|| Error::InvalidParam(format!("class id {} out of range 0..5", id)))
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Dos => "dos",
            Category::Normal => "normal",
            Category::Probe => "probe",
            Category::R2l => "r2l",
            Category::U2r => "u2r",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw attack name -> coarse category, covering the names that appear in both
/// the official NSL-KDD training and test partitions (the test partition
/// introduces names absent from training, so the table is curated by hand
/// rather than derived from the training labels alone).
const ATTACK_TABLE: [(&str, Category); 40] = [
    ("apache2", Category::Dos),
    ("back", Category::Dos),
    ("land", Category::Dos),
    ("mailbomb", Category::Dos),
    ("neptune", Category::Dos),
    ("pod", Category::Dos),
    ("processtable", Category::Dos),
    ("smurf", Category::Dos),
    ("teardrop", Category::Dos),
    ("udpstorm", Category::Dos),
    ("normal", Category::Normal),
    ("ipsweep", Category::Probe),
    ("mscan", Category::Probe),
    ("nmap", Category::Probe),
    ("portsweep", Category::Probe),
    ("saint", Category::Probe),
    ("satan", Category::Probe),
    ("ftp_write", Category::R2l),
    ("guess_passwd", Category::R2l),
    ("imap", Category::R2l),
    ("multihop", Category::R2l),
    ("named", Category::R2l),
    ("phf", Category::R2l),
    ("sendmail", Category::R2l),
    ("snmpgetattack", Category::R2l),
    ("snmpguess", Category::R2l),
    ("spy", Category::R2l),
    ("warezclient", Category::R2l),
    ("warezmaster", Category::R2l),
    ("worm", Category::R2l),
    ("xlock", Category::R2l),
    ("xsnoop", Category::R2l),
    ("buffer_overflow", Category::U2r),
    ("httptunnel", Category::U2r),
    ("loadmodule", Category::U2r),
    ("perl", Category::U2r),
    ("ps", Category::U2r),
    ("rootkit", Category::U2r),
    ("sqlattack", Category::U2r),
    ("xterm", Category::U2r),
];

/// Maps a raw attack name to its coarse category.
///
/// Unknown names are an error rather than a silent missing value: the table
/// must stay complete for whatever dataset snapshot is fed in.
pub fn coarse_category(raw: &str) -> Result<Category> {
    ATTACK_TABLE
        .iter()
        .find(|(name, _)| *name == raw)
        .map(|(_, cat)| *cat)
        .ok_or_else(|| Error::UnmappedLabel(raw.to_string()))
}

/// Encodes a sequence of raw attack names into class ids.
pub fn encode_labels<S: AsRef<str>>(raw: &[S]) -> Result<Vec<usize>> {
    raw.iter()
        .map(|name| coarse_category(name.as_ref()).map(Category::id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Names appearing only in the official test partition.
    const TEST_ONLY_NAMES: [&str; 17] = [
        "apache2",
        "mailbomb",
        "processtable",
        "udpstorm",
        "mscan",
        "saint",
        "named",
        "sendmail",
        "snmpgetattack",
        "snmpguess",
        "worm",
        "xlock",
        "xsnoop",
        "httptunnel",
        "ps",
        "sqlattack",
        "xterm",
    ];

    #[test]
    fn test_table_covers_both_partitions() {
        for (name, _) in ATTACK_TABLE {
            assert!(coarse_category(name).is_ok());
        }
        for name in TEST_ONLY_NAMES {
            assert!(coarse_category(name).is_ok(), "missing test-only name {}", name);
        }
        assert_eq!(ATTACK_TABLE.len(), 40);
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let err = coarse_category("slammer").unwrap_err();
        assert!(matches!(err, Error::UnmappedLabel(_)));
    }

    #[test]
    fn test_class_ids_follow_lexicographic_order() {
        let mut names: Vec<&str> = CATEGORIES.iter().map(|c| c.name()).collect();
        let sorted = {
            let mut s = names.clone();
            s.sort();
            s
        };
        assert_eq!(names, sorted);
        names.sort();
        for (id, name) in names.iter().enumerate() {
            assert_eq!(Category::from_id(id).unwrap().name(), *name);
        }
    }

    #[test]
    fn test_encode_labels() {
        let ids = encode_labels(&["normal", "neptune", "satan", "rootkit", "ftp_write"]).unwrap();
        assert_eq!(ids, vec![1, 0, 2, 4, 3]);
    }

    #[test]
    fn test_category_counts_per_class() {
        let count = |cat: Category| ATTACK_TABLE.iter().filter(|(_, c)| *c == cat).count();
        assert_eq!(count(Category::Dos), 10);
        assert_eq!(count(Category::Normal), 1);
        assert_eq!(count(Category::Probe), 6);
        assert_eq!(count(Category::R2l), 15);
        assert_eq!(count(Category::U2r), 8);
    }
}
