//! Character cache: the singleton slot for the player character.

use tracing::{info, warn};

use super::{DomainCache, Domain, ErrorCode, Phase};
use crate::model::character::CHARACTER_ID;
use crate::model::*;
use crate::progression;
use crate::remote::Remote;
use crate::views::{self, AttributeRadar, CharacterStats, ExperienceInfo};

/// How [`CharacterStore::initialize`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Provisioning {
    /// An existing character was loaded.
    Loaded(Character),
    /// No character could be loaded, so a default one was created.
    Created(Character),
    /// Neither load nor fallback creation succeeded.
    Failed,
}

pub struct CharacterStore {
    remote: Remote,
    cache: DomainCache<Option<Character>>,
    default_class: CharacterClass,
    attribute_cap: i32,
}

impl CharacterStore {
    pub fn new(remote: Remote, default_class: CharacterClass) -> Self {
        Self {
            remote,
            cache: DomainCache::new(Domain::Character),
            default_class,
            attribute_cap: views::DEFAULT_ATTRIBUTE_CAP,
        }
    }

    /// Attribute value drawn at 100% by [`CharacterStore::radar`].
    pub fn with_attribute_cap(mut self, cap: i32) -> Self {
        self.attribute_cap = cap;
        self
    }

    pub fn cache(&self) -> &DomainCache<Option<Character>> {
        &self.cache
    }

    pub fn character(&self) -> Option<Character> {
        self.cache.read(|st| st.data.clone())
    }

    /// Level of the cached character, if one is loaded.
    pub fn level(&self) -> Option<i32> {
        self.cache.read(|st| st.data.as_ref().map(|c| c.level))
    }

    pub async fn load(&self) -> Option<Character> {
        self.cache
            .run(
                ErrorCode::GetCharacterError,
                self.remote.get_character(),
                confirm,
            )
            .await
    }

    pub async fn create(&self, character_class: CharacterClass) -> Option<Character> {
        let request = CreateCharacterRequest { character_class };
        self.cache
            .run(
                ErrorCode::CreateCharacterError,
                self.remote.create_character(&request),
                confirm,
            )
            .await
    }

    pub async fn update(&self, request: UpdateCharacterRequest) -> Option<Character> {
        self.cache
            .run(
                ErrorCode::UpdateCharacterError,
                self.remote.update_character(&request),
                confirm,
            )
            .await
    }

    /// Award experience. Level-up notification is the caller's concern.
    pub async fn add_experience(&self, exp_points: i64) -> Option<ExperienceResult> {
        self.cache
            .run(
                ErrorCode::AddExperienceError,
                self.remote.add_experience(exp_points),
                |slot, result: ExperienceResult| {
                    confirm(slot, result.character.clone());
                    result
                },
            )
            .await
    }

    pub async fn add_attribute_points(
        &self,
        attribute: Attribute,
        points: i32,
    ) -> Option<Character> {
        self.cache
            .run(
                ErrorCode::AddAttributePointsError,
                self.remote.add_attribute_points(attribute, points),
                confirm,
            )
            .await
    }

    /// Load the character, provisioning a default one if none can be found.
    pub async fn initialize(&self) -> Provisioning {
        if let Some(character) = self.load().await {
            return Provisioning::Loaded(character);
        }
        if self.character().is_some() {
            // A previously confirmed character is still cached; keep it.
            return Provisioning::Failed;
        }

        info!(class = %self.default_class, "no character found, creating default");
        match self.create(self.default_class).await {
            Some(character) => Provisioning::Created(character),
            None => Provisioning::Failed,
        }
    }

    pub fn stats(&self) -> Option<CharacterStats> {
        self.cache
            .read(|st| st.data.as_ref().map(views::character_stats))
    }

    pub fn experience_info(&self) -> Option<ExperienceInfo> {
        self.cache
            .read(|st| st.data.as_ref().map(views::experience_info))
    }

    pub fn radar(&self) -> Option<AttributeRadar> {
        let cap = self.attribute_cap;
        self.cache.read(|st| {
            st.data
                .as_ref()
                .map(|c| views::attribute_radar(&c.attributes, cap))
        })
    }

    pub fn clear_error(&self) {
        self.cache.clear_error();
    }

    pub fn reset(&self) {
        self.cache.reset();
    }

    pub fn phase(&self) -> Phase {
        self.cache.phase()
    }
}

/// Store a confirmed character, flagging server-side inconsistencies.
fn confirm(slot: &mut Option<Character>, character: Character) -> Character {
    if character.id != CHARACTER_ID {
        warn!(id = character.id, "character id is not the singleton id");
    }
    if !progression::is_consistent(character.level, character.experience) {
        warn!(
            level = character.level,
            experience = character.experience,
            "character level does not match experience"
        );
    }
    *slot = Some(character.clone());
    character
}
