use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, OneOrMany};
use std::collections::BTreeMap;

/// Free-form questionnaire answers, kept in key order so prompts are stable.
pub type QuestionnaireAnswers = BTreeMap<String, serde_json::Value>;

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub experience: Option<String>,
    pub lifestyle: Option<String>,
    pub duration: Option<String>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub health_concerns: Vec<String>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl UserProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn primary_goal(&self) -> Option<&str> {
        self.goals.iter().map(|g| g.trim()).find(|g| !g.is_empty())
    }

    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() { "friend" } else { name }
    }
}

/// The ten prose blocks every plan is assembled from, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    Introduction,
    AssessmentSummary,
    DailySchedule,
    NutritionPlan,
    ExerciseRoutine,
    SupplementGuide,
    ShoppingList,
    ProgressTracking,
    Troubleshooting,
    ExpertTips,
}

impl SectionKey {
    pub const ALL: [SectionKey; 10] = [
        SectionKey::Introduction,
        SectionKey::AssessmentSummary,
        SectionKey::DailySchedule,
        SectionKey::NutritionPlan,
        SectionKey::ExerciseRoutine,
        SectionKey::SupplementGuide,
        SectionKey::ShoppingList,
        SectionKey::ProgressTracking,
        SectionKey::Troubleshooting,
        SectionKey::ExpertTips,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// File stem of the fallback template for this section.
    pub fn template_stem(self) -> &'static str {
        match self {
            SectionKey::Introduction => "introduction",
            SectionKey::AssessmentSummary => "assessment_summary",
            SectionKey::DailySchedule => "daily_schedule",
            SectionKey::NutritionPlan => "nutrition_plan",
            SectionKey::ExerciseRoutine => "exercise_routine",
            SectionKey::SupplementGuide => "supplement_guide",
            SectionKey::ShoppingList => "shopping_list",
            SectionKey::ProgressTracking => "progress_tracking",
            SectionKey::Troubleshooting => "troubleshooting",
            SectionKey::ExpertTips => "expert_tips",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            SectionKey::Introduction => "Welcome to Your Personalized Journey",
            SectionKey::AssessmentSummary => "Your Personal Assessment",
            SectionKey::DailySchedule => "Your Daily Success Schedule",
            SectionKey::NutritionPlan => "Nutrition Guidance",
            SectionKey::ExerciseRoutine => "Movement & Exercise Routine",
            SectionKey::SupplementGuide => "Natural Supplement Guide",
            SectionKey::ShoppingList => "Your Shopping List",
            SectionKey::ProgressTracking => "Tracking Your Progress",
            SectionKey::Troubleshooting => "Overcoming Common Challenges",
            SectionKey::ExpertTips => "Expert Tips & Insider Secrets",
        }
    }

    /// What the writer is asked to cover for this section.
    pub fn brief(self) -> &'static str {
        match self {
            SectionKey::Introduction => "Write a warm, motivating introduction (150-200 words) that acknowledges their goals and explains what this plan will do for them.",
            SectionKey::AssessmentSummary => "Summarize their current situation, strengths and the main areas to focus on, based on the profile and questionnaire answers.",
            SectionKey::DailySchedule => "Lay out a realistic hour-by-hour daily routine from waking to sleep, adapted to their lifestyle and available time.",
            SectionKey::NutritionPlan => "Give concrete nutrition guidance: meal structure, example meals for breakfast, lunch, dinner and snacks, and foods to favour or limit.",
            SectionKey::ExerciseRoutine => "Describe a weekly movement routine with specific activities, durations and intensity suited to their experience level.",
            SectionKey::SupplementGuide => "Recommend natural supplements and herbs with typical dosages, timing and safety notes; remind them to consult a professional.",
            SectionKey::ShoppingList => "Produce a categorized shopping list (produce, proteins, pantry, herbs and supplements) as checkbox bullet lines.",
            SectionKey::ProgressTracking => "Explain what to measure, how often, and give weekly milestones and a simple tracking checklist.",
            SectionKey::Troubleshooting => "List the most likely obstacles for this person and a practical solution for each.",
            SectionKey::ExpertTips => "Share advanced, lesser-known expert tips that will accelerate their results.",
        }
    }
}

/// Prose for every section of one plan. Every field is always non-empty.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedContent {
    pub introduction: String,
    pub assessment_summary: String,
    pub daily_schedule: String,
    pub nutrition_plan: String,
    pub exercise_routine: String,
    pub supplement_guide: String,
    pub shopping_list: String,
    pub progress_tracking: String,
    pub troubleshooting: String,
    pub expert_tips: String,
}

impl PersonalizedContent {
    pub fn from_sections(sections: [String; 10]) -> Self {
        let [introduction, assessment_summary, daily_schedule, nutrition_plan, exercise_routine, supplement_guide, shopping_list, progress_tracking, troubleshooting, expert_tips] = sections;
        Self {
            introduction,
            assessment_summary,
            daily_schedule,
            nutrition_plan,
            exercise_routine,
            supplement_guide,
            shopping_list,
            progress_tracking,
            troubleshooting,
            expert_tips,
        }
    }

    pub fn get(&self, key: SectionKey) -> &str {
        match key {
            SectionKey::Introduction => &self.introduction,
            SectionKey::AssessmentSummary => &self.assessment_summary,
            SectionKey::DailySchedule => &self.daily_schedule,
            SectionKey::NutritionPlan => &self.nutrition_plan,
            SectionKey::ExerciseRoutine => &self.exercise_routine,
            SectionKey::SupplementGuide => &self.supplement_guide,
            SectionKey::ShoppingList => &self.shopping_list,
            SectionKey::ProgressTracking => &self.progress_tracking,
            SectionKey::Troubleshooting => &self.troubleshooting,
            SectionKey::ExpertTips => &self.expert_tips,
        }
    }

    pub fn is_complete(&self) -> bool {
        SectionKey::ALL.iter().all(|k| !self.get(*k).trim().is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanRequest {
    pub plan_type: String,
    pub user_profile: UserProfile,
    #[serde(default)]
    pub questionnaire_answers: QuestionnaireAnswers,
}
