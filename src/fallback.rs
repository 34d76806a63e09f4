//! Deterministic section text used whenever a provider cannot deliver.
//!
//! Templates live under `templates/fallback/` and are compiled into the
//! binary. A plan-specific file (`<plan>/<section>.txt`) wins over the
//! generic `<section>.txt`.

use include_dir::{include_dir, Dir};

use crate::models::{SectionKey, UserProfile};
use crate::plans::PlanType;

static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates/fallback");

const LAST_RESORT: &str = "This part of your personalized {plan} plan is being refined, {name}. Focus on steady daily habits, whole foods, gentle movement and good sleep while you work toward {goal}.";

/// Fallback text for `section_index` (0..9) of a `plan_type` plan.
pub fn fallback(section_index: usize, profile: &UserProfile, plan_type: &str) -> String {
    let template = SectionKey::from_index(section_index)
        .and_then(|section| template_for(section, plan_type))
        .unwrap_or(LAST_RESORT);
    interpolate(template, &placeholders(profile, plan_type))
}

pub fn fallback_for(section: SectionKey, profile: &UserProfile, plan_type: &str) -> String {
    fallback(section.index(), profile, plan_type)
}

/// Raw template for a section, preferring the plan-specific override.
pub fn template_for(section: SectionKey, plan_type: &str) -> Option<&'static str> {
    let plan = plan_type.trim().to_ascii_lowercase();
    let stem = section.template_stem();
    let specific = (!plan.is_empty() && plan.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .then(|| format!("{plan}/{stem}.txt"))
        .and_then(|path| TEMPLATES.get_file(path));
    specific
        .or_else(|| TEMPLATES.get_file(format!("{stem}.txt")))
        .and_then(|file| file.contents_utf8())
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Canonical name for known plans; other labels lose template braces.
fn plan_label(plan_type: &str) -> String {
    match PlanType::parse(plan_type) {
        Some(plan) => plan.as_str().to_string(),
        None => plan_type.replace(['{', '}'], "").trim().to_string(),
    }
}

fn placeholders(profile: &UserProfile, plan_type: &str) -> [(&'static str, String); 5] {
    let plan = plan_label(plan_type);
    let non_empty = |value: Option<&String>, default: &str| {
        value.map(|v| v.trim()).filter(|v| !v.is_empty()).unwrap_or(default).to_string()
    };
    [
        ("name", profile.display_name().to_string()),
        ("plan", if plan.is_empty() { "wellness".to_string() } else { plan }),
        ("duration", non_empty(profile.duration.as_ref(), "the coming weeks")),
        ("goal", profile.primary_goal().unwrap_or("your personal goals").to_string()),
        ("level", non_empty(profile.experience.as_ref(), "all levels")),
    ]
}

/// Single-pass `{key}` substitution; values are never re-scanned.
fn interpolate(template: &str, vars: &[(&'static str, String)]) -> String {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match vars.iter().find(|(name, _)| *name == key) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
