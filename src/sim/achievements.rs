//! One-shot achievements
//!
//! Rules are evaluated against the game counters whenever the economy raises
//! a trigger. Each achievement unlocks at most once and pays its reward on
//! unlock. Only the unlock flags are persisted; names, descriptions and
//! rewards come from the static table below.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Achievement identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AchievementId {
    FirstMerge,
    Money100k,
    BallLevel64,
    Merge100,
    Bounce1000,
}

impl AchievementId {
    pub const ALL: [AchievementId; 5] = [
        AchievementId::FirstMerge,
        AchievementId::Money100k,
        AchievementId::BallLevel64,
        AchievementId::Merge100,
        AchievementId::Bounce1000,
    ];

    /// Stable key used in save files
    pub fn key(&self) -> &'static str {
        match self {
            AchievementId::FirstMerge => "first_merge",
            AchievementId::Money100k => "money_100k",
            AchievementId::BallLevel64 => "ball_level_64",
            AchievementId::Merge100 => "merge_100",
            AchievementId::Bounce1000 => "bounce_1000",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }

    pub fn definition(&self) -> &'static AchievementDef {
        match self {
            AchievementId::FirstMerge => &FIRST_MERGE,
            AchievementId::Money100k => &MONEY_100K,
            AchievementId::BallLevel64 => &BALL_LEVEL_64,
            AchievementId::Merge100 => &MERGE_100,
            AchievementId::Bounce1000 => &BOUNCE_1000,
        }
    }
}

/// What raised the evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Merge,
    Money,
    Bounce,
}

/// Static configuration of an achievement
#[derive(Debug)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub reward: f64,
    pub trigger: Trigger,
}

const FIRST_MERGE: AchievementDef = AchievementDef {
    id: AchievementId::FirstMerge,
    name: "First Merge",
    description: "Merge 2 balls",
    reward: 1000.0,
    trigger: Trigger::Merge,
};

const MONEY_100K: AchievementDef = AchievementDef {
    id: AchievementId::Money100k,
    name: "100K Club",
    description: "Earn 100K $",
    reward: 5000.0,
    trigger: Trigger::Money,
};

const BALL_LEVEL_64: AchievementDef = AchievementDef {
    id: AchievementId::BallLevel64,
    name: "Level 64",
    description: "Get a ball with value 64",
    reward: 10000.0,
    trigger: Trigger::Merge,
};

const MERGE_100: AchievementDef = AchievementDef {
    id: AchievementId::Merge100,
    name: "100 Merges",
    description: "Merge 100 times",
    reward: 50000.0,
    trigger: Trigger::Merge,
};

const BOUNCE_1000: AchievementDef = AchievementDef {
    id: AchievementId::Bounce1000,
    name: "1000 Bounces",
    description: "Bounce balls 1000 times",
    reward: 100000.0,
    trigger: Trigger::Bounce,
};

/// Counter snapshot the rules read
#[derive(Debug, Clone, Copy, Default)]
pub struct Progress {
    pub money: f64,
    pub total_merges: u64,
    pub total_bounces: u64,
}

impl AchievementDef {
    fn satisfied(&self, trigger: Trigger, payload: Option<u64>, progress: &Progress) -> bool {
        if trigger != self.trigger {
            return false;
        }
        match self.id {
            AchievementId::FirstMerge => true,
            AchievementId::Money100k => progress.money >= 100_000.0,
            AchievementId::BallLevel64 => payload.is_some_and(|v| v >= 64),
            AchievementId::Merge100 => progress.total_merges >= 100,
            AchievementId::Bounce1000 => progress.total_bounces >= 1000,
        }
    }
}

/// Achievement view combining static config with the unlock flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Achievement {
    pub id: AchievementId,
    pub unlocked: bool,
    pub name: &'static str,
    pub description: &'static str,
    pub reward: f64,
}

/// Unlock flags for every achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, bool>", into = "BTreeMap<String, bool>")]
pub struct AchievementBook {
    unlocked: BTreeMap<AchievementId, bool>,
}

impl Default for AchievementBook {
    fn default() -> Self {
        Self {
            unlocked: AchievementId::ALL.into_iter().map(|id| (id, false)).collect(),
        }
    }
}

// Unknown keys are dropped and missing ones stay locked
impl From<BTreeMap<String, bool>> for AchievementBook {
    fn from(saved: BTreeMap<String, bool>) -> Self {
        let mut book = Self::default();
        for (key, unlocked) in saved {
            match AchievementId::from_key(&key) {
                Some(id) => {
                    book.unlocked.insert(id, unlocked);
                }
                None => log::warn!("Ignoring unknown achievement '{}' in save", key),
            }
        }
        book
    }
}

impl From<AchievementBook> for BTreeMap<String, bool> {
    fn from(book: AchievementBook) -> Self {
        book.unlocked
            .into_iter()
            .map(|(id, unlocked)| (id.key().to_string(), unlocked))
            .collect()
    }
}

impl AchievementBook {
    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.get(&id).copied().unwrap_or(false)
    }

    /// All achievements in table order
    pub fn entries(&self) -> impl Iterator<Item = Achievement> + '_ {
        AchievementId::ALL.into_iter().map(|id| {
            let def = id.definition();
            Achievement {
                id,
                unlocked: self.is_unlocked(id),
                name: def.name,
                description: def.description,
                reward: def.reward,
            }
        })
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.values().filter(|u| **u).count()
    }

    /// Lock everything again
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Evaluate every rule for `trigger`, unlocking the newly satisfied ones.
    ///
    /// Rules are independent: one unlocking never short-circuits the others.
    /// Returns the definitions that unlocked on this call; the caller pays
    /// the rewards.
    pub fn evaluate(
        &mut self,
        trigger: Trigger,
        payload: Option<u64>,
        progress: &Progress,
    ) -> Vec<&'static AchievementDef> {
        let mut unlocked = Vec::new();
        for id in AchievementId::ALL {
            if self.is_unlocked(id) {
                continue;
            }
            let def = id.definition();
            if def.satisfied(trigger, payload, progress) {
                self.unlocked.insert(id, true);
                unlocked.push(def);
            }
        }
        unlocked
    }
}
