//! Plan-type themes: titles, colors, section ordering and bonus pages.

use crate::models::SectionKey;

pub const KNOWN_PLAN_TYPES: [&str; 5] = ["diet", "fitness", "skincare", "wellness", "recovery"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanType {
    Diet,
    Fitness,
    Skincare,
    Wellness,
    Recovery,
}

impl PlanType {
    /// Case-insensitive lookup; anything else is an unknown plan.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "diet" => Some(PlanType::Diet),
            "fitness" => Some(PlanType::Fitness),
            "skincare" => Some(PlanType::Skincare),
            "wellness" => Some(PlanType::Wellness),
            "recovery" => Some(PlanType::Recovery),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlanType::Diet => "diet",
            PlanType::Fitness => "fitness",
            PlanType::Skincare => "skincare",
            PlanType::Wellness => "wellness",
            PlanType::Recovery => "recovery",
        }
    }

    pub fn theme(self) -> &'static PlanTheme {
        match self {
            PlanType::Diet => &DIET,
            PlanType::Fitness => &FITNESS,
            PlanType::Skincare => &SKINCARE,
            PlanType::Wellness => &WELLNESS,
            PlanType::Recovery => &RECOVERY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanTheme {
    pub plan: &'static str,
    pub title: &'static str,
    pub tagline: &'static str,
    /// Hex colors, `#rrggbb`.
    pub accent: &'static str,
    pub cover: &'static str,
    pub disclaimer: &'static str,
    pub sections: [(&'static str, SectionKey); 10],
    pub bonus_title: &'static str,
    pub bonus_body: &'static str,
}

/// One row of a plan's document skeleton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSpec {
    pub title: &'static str,
    pub accent: &'static str,
    pub key: SectionKey,
}

impl PlanTheme {
    pub fn section_specs(&self) -> Vec<SectionSpec> {
        self.sections
            .iter()
            .map(|&(title, key)| SectionSpec { title, accent: self.accent, key })
            .collect()
    }
}

/// Ordered section skeleton for a plan type, or `None` for unknown types.
pub fn dispatch(plan_type: &str) -> Option<Vec<SectionSpec>> {
    PlanType::parse(plan_type).map(|plan| plan.theme().section_specs())
}

const MEDICAL_DISCLAIMER: &str = "This plan is for educational purposes and does not replace advice from a qualified healthcare professional.";

static DIET: PlanTheme = PlanTheme {
    plan: "diet",
    title: "Personalized Diet Plan",
    tagline: "Natural nutrition designed around you",
    accent: "#16a34a",
    cover: "#14532d",
    disclaimer: MEDICAL_DISCLAIMER,
    sections: [
        ("Welcome to Your Diet Transformation", SectionKey::Introduction),
        ("Your Nutritional Assessment", SectionKey::AssessmentSummary),
        ("Your Personalized Meal Plan", SectionKey::NutritionPlan),
        ("Your Daily Eating Schedule", SectionKey::DailySchedule),
        ("Smart Grocery Shopping List", SectionKey::ShoppingList),
        ("Natural Supplements for Your Diet", SectionKey::SupplementGuide),
        ("Movement to Support Your Diet", SectionKey::ExerciseRoutine),
        ("Tracking Your Diet Progress", SectionKey::ProgressTracking),
        ("Overcoming Diet Challenges", SectionKey::Troubleshooting),
        ("Nutritionist Secrets", SectionKey::ExpertTips),
    ],
    bonus_title: "Bonus: Meal Prep Quick Reference",
    bonus_body: "**Sunday Prep Checklist**\n□ Cook a large batch of quinoa or brown rice\n□ Roast two trays of mixed vegetables\n□ Prepare a pot of lentil or bean soup\n□ Wash and chop salad greens and crunchy vegetables\n□ Portion nuts and seeds into snack bags\n\n**Plate Formula**\n• Half the plate: vegetables\n• A quarter: protein\n• A quarter: whole grains or starchy vegetables\n• A thumb of healthy fat\n\n**Storage Tips**\n• Cooked grains keep for four days in the fridge.\n• Soups freeze well for up to three months.",
};

static FITNESS: PlanTheme = PlanTheme {
    plan: "fitness",
    title: "Personalized Fitness Plan",
    tagline: "Train smarter, recover naturally",
    accent: "#2563eb",
    cover: "#1e3a8a",
    disclaimer: "Consult your doctor before beginning any new exercise program. This plan is educational and does not replace professional advice.",
    sections: [
        ("Welcome to Your Fitness Journey", SectionKey::Introduction),
        ("Your Fitness Assessment", SectionKey::AssessmentSummary),
        ("Your Training Program", SectionKey::ExerciseRoutine),
        ("Your Daily Training Schedule", SectionKey::DailySchedule),
        ("Fueling Your Performance", SectionKey::NutritionPlan),
        ("Natural Performance Supplements", SectionKey::SupplementGuide),
        ("Athlete's Shopping List", SectionKey::ShoppingList),
        ("Measuring Your Gains", SectionKey::ProgressTracking),
        ("Breaking Through Plateaus", SectionKey::Troubleshooting),
        ("Coach's Insider Tips", SectionKey::ExpertTips),
    ],
    bonus_title: "Bonus: Warm-Up & Cool-Down Routines",
    bonus_body: "**Five-Minute Warm-Up**\n• Arm circles, 30 seconds each direction\n• Leg swings, 10 per side\n• Bodyweight squats, 10 slow repetitions\n• Hip openers, 5 per side\n• Light jog or marching in place, 1 minute\n\n**Cool-Down**\n• Hamstring stretch, 30 seconds per side\n• Quad stretch, 30 seconds per side\n• Child's pose with slow breathing, 1 minute\n\n**Recovery Checklist**\n□ Drink 500 ml of water\n□ Eat protein within an hour\n□ Sleep at least seven hours",
};

static SKINCARE: PlanTheme = PlanTheme {
    plan: "skincare",
    title: "Personalized Skincare Plan",
    tagline: "Radiant skin, the natural way",
    accent: "#db2777",
    cover: "#831843",
    disclaimer: "Patch test every new product. Consult a dermatologist for persistent skin conditions. This plan is educational only.",
    sections: [
        ("Welcome to Your Skin Journey", SectionKey::Introduction),
        ("Your Skin Assessment", SectionKey::AssessmentSummary),
        ("Your Daily Skincare Ritual", SectionKey::DailySchedule),
        ("Eating for Radiant Skin", SectionKey::NutritionPlan),
        ("Skin-Loving Supplements", SectionKey::SupplementGuide),
        ("Natural Skincare Shopping List", SectionKey::ShoppingList),
        ("Movement for a Healthy Glow", SectionKey::ExerciseRoutine),
        ("Tracking Your Skin's Progress", SectionKey::ProgressTracking),
        ("Solving Common Skin Concerns", SectionKey::Troubleshooting),
        ("Esthetician Secrets", SectionKey::ExpertTips),
    ],
    bonus_title: "Bonus: DIY Natural Masks",
    bonus_body: "**Soothing Oat Mask**\n• 2 tablespoons finely ground oats\n• 1 tablespoon plain yoghurt\n• 1 teaspoon raw honey\nLeave on for 10 minutes, then rinse with lukewarm water.\n\n**Brightening Turmeric Mask**\n• 1 teaspoon chickpea flour\n• A pinch of turmeric\n• Enough rose water to form a paste\nApply for 8 minutes and rinse well.\n\n**Before You Start**\n□ Patch test on your inner arm for 24 hours\n□ Use fresh ingredients only\n□ Skip masks on broken or irritated skin",
};

static WELLNESS: PlanTheme = PlanTheme {
    plan: "wellness",
    title: "Holistic Wellness Plan",
    tagline: "Balance for body and mind",
    accent: "#7c3aed",
    cover: "#4c1d95",
    disclaimer: MEDICAL_DISCLAIMER,
    sections: [
        ("Welcome to Your Wellness Journey", SectionKey::Introduction),
        ("Your Wellness Assessment", SectionKey::AssessmentSummary),
        ("Your Balanced Daily Rhythm", SectionKey::DailySchedule),
        ("Mindful Movement", SectionKey::ExerciseRoutine),
        ("Nourishing Nutrition", SectionKey::NutritionPlan),
        ("Herbal & Natural Support", SectionKey::SupplementGuide),
        ("Wellness Shopping List", SectionKey::ShoppingList),
        ("Tracking Your Wellbeing", SectionKey::ProgressTracking),
        ("Navigating Setbacks", SectionKey::Troubleshooting),
        ("Practitioner Wisdom", SectionKey::ExpertTips),
    ],
    bonus_title: "Bonus: Stress Relief Toolkit",
    bonus_body: "**Box Breathing**\n• Inhale for 4 seconds\n• Hold for 4 seconds\n• Exhale for 4 seconds\n• Hold for 4 seconds\nRepeat for four minutes.\n\n**Evening Wind-Down**\n□ Screens off one hour before bed\n□ Cup of chamomile or lemon balm tea\n□ Three things you are grateful for\n□ Gentle stretching for five minutes\n\n**Quick Resets**\n• Step outside for two minutes of daylight.\n• Relax your jaw and shoulders.\n• Drink a glass of water.",
};

static RECOVERY: PlanTheme = PlanTheme {
    plan: "recovery",
    title: "Recovery & Healing Plan",
    tagline: "Supporting your body's natural repair",
    accent: "#ea580c",
    cover: "#7c2d12",
    disclaimer: "Follow your doctor's or physiotherapist's instructions first. This plan supports, and never replaces, professional medical care.",
    sections: [
        ("Welcome to Your Recovery", SectionKey::Introduction),
        ("Your Recovery Assessment", SectionKey::AssessmentSummary),
        ("Your Healing Daily Routine", SectionKey::DailySchedule),
        ("Gentle Rehabilitation Movement", SectionKey::ExerciseRoutine),
        ("Healing Nutrition", SectionKey::NutritionPlan),
        ("Recovery Supplements", SectionKey::SupplementGuide),
        ("Recovery Shopping List", SectionKey::ShoppingList),
        ("Monitoring Your Healing", SectionKey::ProgressTracking),
        ("Managing Recovery Setbacks", SectionKey::Troubleshooting),
        ("Specialist Recovery Tips", SectionKey::ExpertTips),
    ],
    bonus_title: "Bonus: Warning Signs & Rest Guide",
    bonus_body: "**Contact a Professional If You Notice**\n• Pain that increases instead of easing over several days\n• Swelling, redness or warmth that spreads\n• Fever or feeling generally unwell\n• Numbness, tingling or loss of strength\n\n**Quality Rest Checklist**\n□ Seven to nine hours of sleep\n□ Short daytime rests when tired\n□ Elevate the affected area if advised\n□ Hydrate well throughout the day\n\n**Remember**\nHealing is not linear. Rest days are part of the plan.",
};
