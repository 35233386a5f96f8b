//! Fixed table of unlocks and the gallery birds they grant.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of achievement identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnlockKey {
    FirstBirdLogged,
    FirstQuizDone,
    FiveInOneNest,
    #[serde(rename = "PERFECT_10_10")]
    Perfect10Of10,
    FiveCollectionsFilled,
    ThreeBirdsStarted,
    OnePhotoAdded,
    OneLocationPinned,
    TenTotalObs,
    TwentyfiveTotalObs,
    ThreeQuizSessions,
    EightOfTen,
}

impl UnlockKey {
    pub const ALL: [UnlockKey; 12] = [
        UnlockKey::FirstBirdLogged,
        UnlockKey::FirstQuizDone,
        UnlockKey::FiveInOneNest,
        UnlockKey::Perfect10Of10,
        UnlockKey::FiveCollectionsFilled,
        UnlockKey::ThreeBirdsStarted,
        UnlockKey::OnePhotoAdded,
        UnlockKey::OneLocationPinned,
        UnlockKey::TenTotalObs,
        UnlockKey::TwentyfiveTotalObs,
        UnlockKey::ThreeQuizSessions,
        UnlockKey::EightOfTen,
    ];

    /// Identifier as persisted and sent over FFI.
    pub fn as_str(self) -> &'static str {
        match self {
            UnlockKey::FirstBirdLogged => "FIRST_BIRD_LOGGED",
            UnlockKey::FirstQuizDone => "FIRST_QUIZ_DONE",
            UnlockKey::FiveInOneNest => "FIVE_IN_ONE_NEST",
            UnlockKey::Perfect10Of10 => "PERFECT_10_10",
            UnlockKey::FiveCollectionsFilled => "FIVE_COLLECTIONS_FILLED",
            UnlockKey::ThreeBirdsStarted => "THREE_BIRDS_STARTED",
            UnlockKey::OnePhotoAdded => "ONE_PHOTO_ADDED",
            UnlockKey::OneLocationPinned => "ONE_LOCATION_PINNED",
            UnlockKey::TenTotalObs => "TEN_TOTAL_OBS",
            UnlockKey::TwentyfiveTotalObs => "TWENTYFIVE_TOTAL_OBS",
            UnlockKey::ThreeQuizSessions => "THREE_QUIZ_SESSIONS",
            UnlockKey::EightOfTen => "EIGHT_OF_TEN",
        }
    }
}

impl Display for UnlockKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnlockKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnlockKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown unlock key: {s}"))
    }
}

/// Display metadata for one unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockEntry {
    pub title: &'static str,
    /// Granted in this order. Several unlocks may share a bird.
    pub cosmetic_ids: &'static [&'static str],
}

/// A gallery bird that can be unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmeticItem {
    pub id: String,
    pub title: String,
    /// Bundled asset name; `None` for unknown ids.
    pub image: Option<String>,
    #[serde(default)]
    pub rare: bool,
}

struct CosmeticDef {
    id: &'static str,
    title: &'static str,
    image: &'static str,
    rare: bool,
}

const COSMETICS: [CosmeticDef; 8] = [
    CosmeticDef { id: "bird_01", title: "Eagle", image: "bird_01.png", rare: false },
    CosmeticDef { id: "bird_02", title: "Blue Jay", image: "bird_02.png", rare: false },
    CosmeticDef { id: "bird_03", title: "Owl", image: "bird_03.png", rare: false },
    CosmeticDef { id: "bird_04", title: "Robin", image: "bird_04.png", rare: false },
    CosmeticDef { id: "bird_05", title: "Heron", image: "bird_05.png", rare: false },
    CosmeticDef { id: "bird_06", title: "Swallow", image: "bird_06.png", rare: false },
    CosmeticDef { id: "bird_07", title: "Kingfisher", image: "bird_07.png", rare: false },
    CosmeticDef { id: "bird_rare_01", title: "Golden Falcon", image: "bird_rare_01.png", rare: true },
];

pub fn lookup(key: UnlockKey) -> UnlockEntry {
    match key {
        UnlockKey::FirstBirdLogged => UnlockEntry {
            title: "First Bird Logged",
            cosmetic_ids: &["bird_01"],
        },
        UnlockKey::FirstQuizDone => UnlockEntry {
            title: "First Quiz Done",
            cosmetic_ids: &["bird_02"],
        },
        UnlockKey::FiveInOneNest => UnlockEntry {
            title: "5 in One Nest",
            cosmetic_ids: &["bird_03"],
        },
        UnlockKey::Perfect10Of10 => UnlockEntry {
            title: "10/10 Perfect Quiz",
            cosmetic_ids: &["bird_rare_01"],
        },
        UnlockKey::FiveCollectionsFilled => UnlockEntry {
            title: "5 Collections Filled",
            cosmetic_ids: &["bird_03"],
        },
        UnlockKey::ThreeBirdsStarted => UnlockEntry {
            title: "3 Birds Started",
            cosmetic_ids: &["bird_02"],
        },
        UnlockKey::OnePhotoAdded => UnlockEntry {
            title: "1 Photo Added",
            cosmetic_ids: &["bird_05"],
        },
        UnlockKey::OneLocationPinned => UnlockEntry {
            title: "1 Location Pinned",
            cosmetic_ids: &["bird_06"],
        },
        UnlockKey::TenTotalObs => UnlockEntry {
            title: "10 Total Observations",
            cosmetic_ids: &["bird_03"],
        },
        UnlockKey::TwentyfiveTotalObs => UnlockEntry {
            title: "25 Total Observations",
            cosmetic_ids: &["bird_04", "bird_02"],
        },
        UnlockKey::ThreeQuizSessions => UnlockEntry {
            title: "3 Quiz Sessions",
            cosmetic_ids: &["bird_07"],
        },
        UnlockKey::EightOfTen => UnlockEntry {
            title: "8/10 Quiz Score",
            cosmetic_ids: &["bird_03"],
        },
    }
}

/// Never fails: unknown ids get a generic, image-less placeholder.
pub fn lookup_cosmetic(cosmetic_id: &str) -> CosmeticItem {
    match COSMETICS.iter().find(|def| def.id == cosmetic_id) {
        Some(def) => CosmeticItem {
            id: def.id.to_string(),
            title: def.title.to_string(),
            image: Some(def.image.to_string()),
            rare: def.rare,
        },
        None => CosmeticItem {
            id: cosmetic_id.to_string(),
            title: "Bird".to_string(),
            image: None,
            rare: false,
        },
    }
}

/// Every bird the gallery can show, in display order.
pub fn all_cosmetics() -> Vec<CosmeticItem> {
    COSMETICS.iter().map(|def| lookup_cosmetic(def.id)).collect()
}
