//! Scenario prompt templates for focused model requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::profile::{Goal, Task, UserProfileSnapshot};

/// Named prompt scenarios. Unknown names parse as `DailyPlanning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ScenarioKey {
    GoalPlanning,
    TaskHelp,
    ProgressReview,
    ResourceSuggestion,
    MotivationBoost,
    #[default]
    DailyPlanning,
    SkillDevelopment,
    GoalReflection,
}

impl ScenarioKey {
    pub const ALL: [ScenarioKey; 8] = [
        ScenarioKey::GoalPlanning,
        ScenarioKey::TaskHelp,
        ScenarioKey::ProgressReview,
        ScenarioKey::ResourceSuggestion,
        ScenarioKey::MotivationBoost,
        ScenarioKey::DailyPlanning,
        ScenarioKey::SkillDevelopment,
        ScenarioKey::GoalReflection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoalPlanning => "goal_planning",
            Self::TaskHelp => "task_help",
            Self::ProgressReview => "progress_review",
            Self::ResourceSuggestion => "resource_suggestion",
            Self::MotivationBoost => "motivation_boost",
            Self::DailyPlanning => "daily_planning",
            Self::SkillDevelopment => "skill_development",
            Self::GoalReflection => "goal_reflection",
        }
    }

    /// Parses a key, falling back to `DailyPlanning`.
    pub fn parse_or_default(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == key.trim())
            .unwrap_or_default()
    }
}

impl FromStr for ScenarioKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_or_default(s))
    }
}

impl From<String> for ScenarioKey {
    fn from(key: String) -> Self {
        Self::parse_or_default(&key)
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The profile fields the templates interpolate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioProfile {
    pub name: String,
    pub level: Option<u32>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl ScenarioProfile {
    fn level_text(&self) -> String {
        self.level
            .map(|l| l.to_string())
            .unwrap_or_else(|| "not specified".to_string())
    }
}

/// Input for [`context_based_prompt`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioContext {
    pub profile: ScenarioProfile,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl ScenarioContext {
    /// Builds a context from a profile snapshot. A missing name becomes
    /// "there", matching the English greetings.
    pub fn from_snapshot(snapshot: &UserProfileSnapshot) -> Self {
        let identity = &snapshot.identity;
        Self {
            profile: ScenarioProfile {
                name: identity.display_name_or("there").to_string(),
                level: identity.level,
                skills: identity.skills.clone(),
                interests: identity.interests.clone(),
            },
            goals: snapshot.goals.clone(),
            tasks: snapshot.tasks.clone(),
        }
    }
}

/// Renders the template for `key` from the context's profile.
pub fn context_based_prompt(context: &ScenarioContext, key: ScenarioKey) -> String {
    let profile = &context.profile;
    let name = &profile.name;
    let level = profile.level_text();
    let skills = profile.skills.join(", ");
    let interests = profile.interests.join(", ");

    match key {
        ScenarioKey::GoalPlanning => format!(
            "As an AI assistant helping {name} (Level {level}), analyze their goal and create an actionable plan. Consider their skills ({skills}) and current tasks. Break down the goal into specific, achievable steps. Focus on practical actions and available resources."
        ),
        ScenarioKey::TaskHelp => format!(
            "You're assisting {name} with their current task. Consider their goal context, skill level ({level}), and previous progress. Provide specific, actionable advice that moves them forward. Include relevant resources or techniques based on their skills ({skills})."
        ),
        ScenarioKey::ProgressReview => format!(
            "Review {name}'s progress on their goals and tasks. Acknowledge achievements, identify challenges, and suggest next steps. Consider their level ({level}) and skills. Provide constructive feedback and specific recommendations for improvement."
        ),
        ScenarioKey::ResourceSuggestion => format!(
            "Based on {name}'s goals, tasks, and interests ({interests}), recommend relevant resources, tools, or approaches. Consider their skill level ({level}) and prioritize practical, accessible options."
        ),
        ScenarioKey::MotivationBoost => format!(
            "Craft an encouraging message for {name} that acknowledges their progress (Level {level}) and current challenges. Reference their specific goals and achievements. Provide actionable steps to maintain momentum."
        ),
        ScenarioKey::DailyPlanning => format!(
            "Help {name} plan their day effectively. Consider their high-priority tasks, ongoing goals, and skill level ({level}). Suggest a balanced approach that makes meaningful progress while remaining achievable."
        ),
        ScenarioKey::SkillDevelopment => format!(
            "Guide {name} in developing skills relevant to their goals. Consider their current level ({level}), existing skills ({skills}), and immediate objectives. Suggest specific learning resources and practice activities."
        ),
        ScenarioKey::GoalReflection => format!(
            "Help {name} reflect on their goals and progress. Consider their interests ({interests}), current level ({level}), and achievements. Guide them in adjusting or refining their objectives based on their experience."
        ),
    }
}

/// String-keyed variant for callers holding a raw scenario name.
pub fn context_based_prompt_for(context: &ScenarioContext, key: &str) -> String {
    context_based_prompt(context, ScenarioKey::parse_or_default(key))
}
