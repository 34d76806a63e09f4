use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::{Config, GenerationSettings};
use crate::fallback::fallback_for;
use crate::models::{PersonalizedContent, QuestionnaireAnswers, SectionKey, UserProfile};
use crate::plans::{dispatch, PlanType};
use crate::providers::{normalize_output, GeminiClient, GenerationRequest, OpenAiClient, ProviderError, TextProvider};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid profile: {0}")] InvalidProfile(String),
    #[error("could not serialize questionnaire answers: {0}")] Answers(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSlot {
    /// Chat-completion provider (A).
    Primary,
    /// Single-prompt provider (B).
    Secondary,
}

/// Which provider writes each section, indexed by `SectionKey::index`.
pub const SECTION_PROVIDERS: [ProviderSlot; 10] = [
    ProviderSlot::Primary,   // introduction
    ProviderSlot::Secondary, // assessment
    ProviderSlot::Primary,   // schedule
    ProviderSlot::Secondary, // nutrition
    ProviderSlot::Primary,   // exercise
    ProviderSlot::Secondary, // supplements
    ProviderSlot::Primary,   // shopping
    ProviderSlot::Secondary, // progress
    ProviderSlot::Primary,   // troubleshooting
    ProviderSlot::Secondary, // expert tips
];

pub fn provider_for(section: SectionKey) -> ProviderSlot {
    SECTION_PROVIDERS[section.index()]
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentSource {
    Generated,
    Fallback { reason: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOutcome {
    pub section: SectionKey,
    pub provider: &'static str,
    pub slot: ProviderSlot,
    pub source: ContentSource,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct GenerationReport {
    pub sections: Vec<SectionOutcome>,
}

impl GenerationReport {
    pub fn fallback_count(&self) -> usize {
        self.sections.iter().filter(|s| matches!(s.source, ContentSource::Fallback { .. })).count()
    }
}

/// Writes the ten plan sections by fanning out to two text providers.
pub struct ContentGenerator {
    primary: Arc<dyn TextProvider>,
    secondary: Arc<dyn TextProvider>,
    settings: GenerationSettings,
}

impl ContentGenerator {
    pub fn new(primary: Arc<dyn TextProvider>, secondary: Arc<dyn TextProvider>, settings: GenerationSettings) -> Self {
        Self { primary, secondary, settings }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(OpenAiClient::new(&config.openai)),
            Arc::new(GeminiClient::new(&config.gemini)),
            config.generation,
        )
    }

    fn provider(&self, slot: ProviderSlot) -> &Arc<dyn TextProvider> {
        match slot {
            ProviderSlot::Primary => &self.primary,
            ProviderSlot::Secondary => &self.secondary,
        }
    }

    pub async fn generate(
        &self,
        plan_type: &str,
        profile: &UserProfile,
        answers: &QuestionnaireAnswers,
    ) -> Result<PersonalizedContent, GenerateError> {
        self.generate_with_report(plan_type, profile, answers).await.map(|(content, _)| content)
    }

    /// All ten requests are spawned before any is awaited; each failure is
    /// replaced by fallback text once every task has settled.
    pub async fn generate_with_report(
        &self,
        plan_type: &str,
        profile: &UserProfile,
        answers: &QuestionnaireAnswers,
    ) -> Result<(PersonalizedContent, GenerationReport), GenerateError> {
        let context = build_user_context(profile, answers)?;
        let system = system_instruction(plan_type);
        info!("🚀 Generating {} plan content for {} ({} context chars)", plan_type, profile.display_name(), context.len());

        let mut tasks = JoinSet::new();
        for section in SectionKey::ALL {
            let provider = Arc::clone(self.provider(provider_for(section)));
            let request = GenerationRequest {
                system: system.clone(),
                prompt: section_prompt(section, plan_type, profile, &context),
                temperature: self.settings.temperature,
                max_tokens: self.settings.max_tokens,
            };
            let budget = self.settings.timeout;
            tasks.spawn(async move {
                let result = match tokio::time::timeout(budget, provider.generate(&request)).await {
                    Ok(result) => result.and_then(|text| normalize_output(&text)),
                    Err(_) => Err(ProviderError::Timeout(budget)),
                };
                (section, result)
            });
        }

        let mut results: [Option<Result<String, ProviderError>>; 10] = Default::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((section, result)) => results[section.index()] = Some(result),
                Err(e) => error!("❌ Section task aborted: {}", e),
            }
        }

        let mut report = GenerationReport::default();
        let sections: [String; 10] = std::array::from_fn(|i| {
            let section = SectionKey::ALL[i];
            let slot = provider_for(section);
            let provider = self.provider(slot).name();
            let (text, source) = match results[i].take() {
                Some(Ok(text)) => (text, ContentSource::Generated),
                Some(Err(e)) => {
                    warn!("⚠️ {} failed for {:?}, using fallback: {}", provider, section, e);
                    (fallback_for(section, profile, plan_type), ContentSource::Fallback { reason: e.to_string() })
                }
                None => {
                    warn!("⚠️ {} produced no result for {:?}, using fallback", provider, section);
                    (fallback_for(section, profile, plan_type), ContentSource::Fallback { reason: "task aborted".to_string() })
                }
            };
            report.sections.push(SectionOutcome { section, provider, slot, source });
            text
        });

        info!("✅ Plan content ready: {} generated, {} fallback", 10 - report.fallback_count(), report.fallback_count());
        Ok((PersonalizedContent::from_sections(sections), report))
    }
}

/// Flatten the profile and answers into the block shared by every prompt.
pub fn build_user_context(profile: &UserProfile, answers: &QuestionnaireAnswers) -> Result<String, GenerateError> {
    let name = profile.name.trim();
    if name.is_empty() {
        return Err(GenerateError::InvalidProfile("name is required".to_string()));
    }

    let mut lines = vec![format!("Name: {}", name)];
    let optional = [
        ("Age", &profile.age),
        ("Gender", &profile.gender),
        ("Experience level", &profile.experience),
        ("Lifestyle", &profile.lifestyle),
        ("Plan duration", &profile.duration),
    ];
    for (label, value) in optional {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            lines.push(format!("{}: {}", label, value));
        }
    }
    let lists = [
        ("Goals", &profile.goals),
        ("Health concerns", &profile.health_concerns),
        ("Preferences", &profile.preferences),
    ];
    for (label, values) in lists {
        if !values.is_empty() {
            lines.push(format!("{}: {}", label, values.join(", ")));
        }
    }
    for (key, value) in &profile.extra {
        lines.push(format!("{}: {}", key, value_text(value)));
    }
    if !answers.is_empty() {
        lines.push(format!("Questionnaire answers:\n{}", serde_json::to_string_pretty(answers)?));
    }
    Ok(lines.join("\n"))
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn plan_label(plan_type: &str) -> &str {
    match PlanType::parse(plan_type) {
        Some(plan) => plan.as_str(),
        None => plan_type.trim(),
    }
}

pub fn system_instruction(plan_type: &str) -> String {
    format!(
        "You are a certified {} specialist writing for PlantRx, a natural wellness platform. \
         Write warm, practical, evidence-informed guidance using natural approaches. \
         Never diagnose conditions or promise cures, and recommend consulting a healthcare professional where appropriate.",
        plan_label(plan_type)
    )
}

fn section_title(section: SectionKey, plan_type: &str) -> &'static str {
    dispatch(plan_type)
        .and_then(|specs| specs.into_iter().find(|spec| spec.key == section))
        .map(|spec| spec.title)
        .unwrap_or_else(|| section.default_title())
}

pub fn section_prompt(section: SectionKey, plan_type: &str, profile: &UserProfile, context: &str) -> String {
    format!(
        "USER PROFILE\n{context}\n\n\
         Plan type: {plan}\n\
         Section: {title}\n\
         Task: {brief}\n\n\
         Formatting rules:\n\
         - Address {name} directly and refer to the details above.\n\
         - Put sub-headings on their own line wrapped in double asterisks, like **Morning**.\n\
         - Start bullet points with \"• \" and checklist items with \"□ \".\n\
         - Plain text only: no tables, links or code blocks.\n\
         - Keep the section under 450 words.",
        context = context,
        plan = plan_label(plan_type),
        title = section_title(section, plan_type),
        brief = section.brief(),
        name = profile.display_name(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback;
    use crate::providers::testing::{section_marker, Behavior, ScriptedProvider};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::{Duration, Instant};
    use tokio::sync::Barrier;

    fn settings(timeout: Duration) -> GenerationSettings {
        GenerationSettings { timeout, ..GenerationSettings::default() }
    }

    fn generator(primary: ScriptedProvider, secondary: ScriptedProvider) -> ContentGenerator {
        ContentGenerator::new(Arc::new(primary), Arc::new(secondary), settings(Duration::from_secs(2)))
    }

    fn ava() -> UserProfile {
        UserProfile {
            name: "Ava".into(),
            duration: Some("1 month".into()),
            goals: vec!["weight loss".into()],
            ..UserProfile::default()
        }
    }

    fn answers() -> QuestionnaireAnswers {
        let mut answers = QuestionnaireAnswers::new();
        answers.insert("budget".into(), json!("low"));
        answers
    }

    #[test]
    fn providers_alternate_starting_with_primary() {
        for section in SectionKey::ALL {
            let expected = if section.index() % 2 == 0 { ProviderSlot::Primary } else { ProviderSlot::Secondary };
            assert_eq!(provider_for(section), expected);
        }
    }

    #[test]
    fn context_includes_profile_fields_and_answers() {
        let mut profile = ava();
        profile.health_concerns = vec!["bloating".into(), "fatigue".into()];
        profile.extra.insert("favouriteTea".into(), json!("mint"));
        let context = build_user_context(&profile, &answers()).unwrap();

        assert!(context.starts_with("Name: Ava"));
        assert!(context.contains("Plan duration: 1 month"));
        assert!(context.contains("Health concerns: bloating, fatigue"));
        assert!(context.contains("favouriteTea: mint"));
        assert!(context.contains("\"budget\": \"low\""));
        assert!(!context.contains("Age:"));
    }

    #[test]
    fn blank_name_is_a_hard_error() {
        let err = build_user_context(&UserProfile::named("  "), &answers()).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidProfile(_)));
    }

    #[test]
    fn prompts_use_plan_specific_titles() {
        let prompt = section_prompt(SectionKey::NutritionPlan, "diet", &ava(), "Name: Ava");
        assert!(prompt.contains("Section: Your Personalized Meal Plan"));
        let generic = section_prompt(SectionKey::DailySchedule, "astrology", &ava(), "Name: Ava");
        assert!(generic.contains("Section: Your Daily Success Schedule"));
        assert!(generic.contains("Plan type: astrology"));
    }

    #[tokio::test]
    async fn all_sections_generated_when_providers_succeed() {
        let gen = generator(ScriptedProvider::always("a", Behavior::Echo), ScriptedProvider::always("b", Behavior::Echo));
        let (content, report) = gen.generate_with_report("diet", &ava(), &answers()).await.unwrap();

        assert!(content.is_complete());
        assert_eq!(report.fallback_count(), 0);
        assert_eq!(content.introduction, "**Welcome to Your Diet Transformation**\nWritten by a.");
        assert_eq!(content.assessment_summary, "**Your Nutritional Assessment**\nWritten by b.");
    }

    #[tokio::test]
    async fn half_failing_calls_fall_back_per_section() {
        let secondary = Arc::new(ScriptedProvider::always("b", Behavior::Fail));
        let gen = ContentGenerator::new(
            Arc::new(ScriptedProvider::always("a", Behavior::Echo)),
            secondary.clone(),
            settings(Duration::from_secs(2)),
        );
        let (content, report) = gen.generate_with_report("fitness", &ava(), &answers()).await.unwrap();

        assert!(content.is_complete());
        assert_eq!(report.fallback_count(), 5);
        assert_eq!(secondary.call_count(), 5);
        for outcome in &report.sections {
            let expected_fallback = outcome.slot == ProviderSlot::Secondary;
            assert_eq!(matches!(outcome.source, ContentSource::Fallback { .. }), expected_fallback);
        }
        assert_eq!(content.nutrition_plan, fallback(SectionKey::NutritionPlan.index(), &ava(), "fitness"));
    }

    #[tokio::test]
    async fn every_call_failing_still_yields_complete_content() {
        let gen = generator(ScriptedProvider::always("a", Behavior::Fail), ScriptedProvider::always("b", Behavior::Fail));
        let (content, report) = gen.generate_with_report("diet", &ava(), &answers()).await.unwrap();

        assert!(content.is_complete());
        assert_eq!(report.fallback_count(), 10);
        for section in SectionKey::ALL {
            assert_eq!(content.get(section), fallback(section.index(), &ava(), "diet"));
        }
        assert!(content.introduction.starts_with("Welcome to your personalized diet plan, Ava!"));
    }

    #[tokio::test]
    async fn one_failure_leaves_other_sections_untouched() {
        let baseline = generator(ScriptedProvider::always("a", Behavior::Echo), ScriptedProvider::always("b", Behavior::Echo))
            .generate("wellness", &ava(), &answers())
            .await
            .unwrap();

        let failing = ScriptedProvider::new("a", |request: &GenerationRequest| {
            if section_marker(request) == "Wellness Shopping List" { Behavior::Fail } else { Behavior::Echo }
        });
        let degraded = generator(failing, ScriptedProvider::always("b", Behavior::Echo))
            .generate("wellness", &ava(), &answers())
            .await
            .unwrap();

        for section in SectionKey::ALL {
            if section == SectionKey::ShoppingList {
                assert_eq!(degraded.get(section), fallback(section.index(), &ava(), "wellness"));
            } else {
                assert_eq!(degraded.get(section), baseline.get(section), "{:?} changed", section);
            }
        }
    }

    #[tokio::test]
    async fn hanging_provider_is_cut_off_by_the_timeout() {
        let gen = ContentGenerator::new(
            Arc::new(ScriptedProvider::always("a", Behavior::Hang)),
            Arc::new(ScriptedProvider::always("b", Behavior::Echo)),
            settings(Duration::from_millis(100)),
        );
        let started = Instant::now();
        let (content, report) = gen.generate_with_report("recovery", &ava(), &answers()).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(content.is_complete());
        assert_eq!(report.fallback_count(), 5);
        let reason = match &report.sections[0].source {
            ContentSource::Fallback { reason } => reason.clone(),
            ContentSource::Generated => String::new(),
        };
        assert!(reason.contains("timed out"));
    }

    #[tokio::test]
    async fn empty_and_panicking_responses_fall_back() {
        let gen = generator(ScriptedProvider::always("a", Behavior::Empty), ScriptedProvider::always("b", Behavior::Panic));
        let (content, report) = gen.generate_with_report("skincare", &ava(), &answers()).await.unwrap();

        assert!(content.is_complete());
        assert_eq!(report.fallback_count(), 10);
        assert_eq!(report.sections[1].source, ContentSource::Fallback { reason: "task aborted".into() });
    }

    #[tokio::test]
    async fn unknown_plan_types_generate_without_error() {
        let gen = generator(ScriptedProvider::always("a", Behavior::Fail), ScriptedProvider::always("b", Behavior::Echo));
        let content = gen.generate("astrology", &ava(), &QuestionnaireAnswers::new()).await.unwrap();
        assert!(content.is_complete());
        assert!(content.introduction.contains("astrology"));
    }

    #[tokio::test]
    async fn invalid_profile_fails_the_whole_generation() {
        let primary = Arc::new(ScriptedProvider::always("a", Behavior::Echo));
        let gen = ContentGenerator::new(primary.clone(), Arc::new(ScriptedProvider::always("b", Behavior::Echo)), settings(Duration::from_secs(1)));
        let result = gen.generate("diet", &UserProfile::default(), &answers()).await;

        assert!(matches!(result, Err(GenerateError::InvalidProfile(_))));
        assert_eq!(primary.call_count(), 0);
    }

    /// Every call blocks until all ten are in flight.
    struct GatedProvider {
        gate: Arc<Barrier>,
    }

    #[async_trait]
    impl TextProvider for GatedProvider {
        fn name(&self) -> &'static str {
            "gated"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
            self.gate.wait().await;
            Ok(format!("released {}", section_marker(request)))
        }
    }

    #[tokio::test]
    async fn all_ten_requests_are_in_flight_together() {
        let gate = Arc::new(Barrier::new(10));
        let gen = ContentGenerator::new(
            Arc::new(GatedProvider { gate: gate.clone() }),
            Arc::new(GatedProvider { gate }),
            settings(Duration::from_secs(5)),
        );
        let (_, report) = gen.generate_with_report("diet", &ava(), &answers()).await.unwrap();
        assert_eq!(report.fallback_count(), 0);
    }

    #[tokio::test]
    async fn unreachable_providers_keep_api_keys_out_of_the_report() {
        let unreachable = |base: &str, key: &str| crate::config::ProviderConfig {
            api_key: Some(key.to_string()),
            base_url: base.to_string(),
            model: "m".to_string(),
        };
        let gen = ContentGenerator::new(
            Arc::new(OpenAiClient::new(&unreachable("http://127.0.0.1:9/v1", "OPENAISECRET1"))),
            Arc::new(GeminiClient::new(&unreachable("http://127.0.0.1:9/v1beta", "SECRETKEY123"))),
            settings(Duration::from_secs(5)),
        );
        let (content, report) = gen.generate_with_report("diet", &ava(), &answers()).await.unwrap();

        assert_eq!(report.fallback_count(), 10);
        assert!(content.is_complete());
        let serialized = serde_json::to_string(&report).unwrap();
        assert!(!serialized.contains("SECRETKEY123"), "{serialized}");
        assert!(!serialized.contains("OPENAISECRET1"), "{serialized}");
    }
}
