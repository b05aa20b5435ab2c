//! Player character: the singleton that experience and attributes accrue to.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// The only id a character ever has.
pub const CHARACTER_ID: i32 = 1;

/// The player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Always [`CHARACTER_ID`].
    pub id: i32,
    pub level: i32,
    pub experience: i64,
    pub character_class: CharacterClass,
    pub attributes: CharacterAttributes,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Development focus of the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterClass {
    /// Physical development, sport, health.
    #[default]
    Warrior,
    /// Study, learning, skills.
    Mage,
    /// Creativity and social skills.
    Bard,
    /// Finances and practical skills.
    Rogue,
}

impl CharacterClass {
    pub fn description(self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Focuses on physical development, sport and health",
            CharacterClass::Mage => "Grows the intellect through study and knowledge",
            CharacterClass::Bard => "Relies on creativity and social skills",
            CharacterClass::Rogue => "Concentrates on finances and practical skills",
        }
    }
}

impl std::fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Bard => "Bard",
            CharacterClass::Rogue => "Rogue",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for CharacterClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warrior" => Ok(CharacterClass::Warrior),
            "mage" => Ok(CharacterClass::Mage),
            "bard" => Ok(CharacterClass::Bard),
            "rogue" => Ok(CharacterClass::Rogue),
            other => Err(format!("unknown character class: {other}")),
        }
    }
}

/// The six attribute counters plotted on the radar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterAttributes {
    pub strength: i32,
    pub intelligence: i32,
    pub charisma: i32,
    pub dexterity: i32,
    pub wisdom: i32,
    pub constitution: i32,
}

impl CharacterAttributes {
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Intelligence => self.intelligence,
            Attribute::Charisma => self.charisma,
            Attribute::Dexterity => self.dexterity,
            Attribute::Wisdom => self.wisdom,
            Attribute::Constitution => self.constitution,
        }
    }
}

/// Names one of the six counters. Serialized lowercase, as the backend
/// expects in `add_attribute_points`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Strength,
    Intelligence,
    Charisma,
    Dexterity,
    Wisdom,
    Constitution,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Strength,
        Attribute::Intelligence,
        Attribute::Charisma,
        Attribute::Dexterity,
        Attribute::Wisdom,
        Attribute::Constitution,
    ];
}

// ---------------------------------------------------------------------------
// Requests / results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCharacterRequest {
    pub character_class: CharacterClass,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCharacterRequest {
    pub character_class: Option<CharacterClass>,
}

/// Result of `add_experience`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceResult {
    pub character: Character,
    #[serde(rename = "levelUp")]
    pub level_up: bool,
}
