//! Themed, paginated plan documents.
//!
//! Page order is fixed: cover, table of contents, one or more pages per
//! section in the plan's order, then the bonus page. Page numbers are
//! stamped in a final pass on every page but the cover.

pub mod canvas;
pub mod layout;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{PersonalizedContent, UserProfile};
use crate::plans::{PlanTheme, PlanType};
use canvas::{Canvas, DocumentInfo, PdfCanvas};
use layout::{
    classify, sanitize, text_width, wrap, BulletMarker, Color, Cursor, FontWeight, LineKind, BOTTOM_MARGIN,
    CONTENT_WIDTH, FOOTER_Y, MARGIN_X, PAGE_HEIGHT, PAGE_WIDTH, TOP_MARGIN,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid color: {0:?}")] InvalidColor(String),
    #[error("no page has been started")] NoPage,
    #[error("page {0} does not exist")] PageOutOfRange(usize),
    #[error("PDF backend error: {0}")] Backend(String),
}

pub const BRAND: &str = "PlantRx";
pub const BODY_SIZE: f32 = 10.5;
pub const BODY_LINE: f32 = 5.4;
pub const HEADER_SIZE: f32 = 12.5;
pub const HEADER_LINE: f32 = 7.0;
pub const BULLET_INDENT: f32 = 7.0;
/// Static table-of-contents page of the first section (cover 1, TOC 2).
pub const FIRST_SECTION_PAGE: usize = 3;

const TITLE_SIZE: f32 = 20.0;
const TITLE_LINE: f32 = 9.0;
const SECTION_TITLE_Y: f32 = 268.0;
const HEADER_GAP: f32 = 3.0;
const PARAGRAPH_GAP: f32 = 2.5;
const RUNNING_HEADER_Y: f32 = 283.0;
const GENERIC_ACCENT: &str = "#16a34a";

/// Where things landed in a laid-out document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutSummary {
    pub page_count: usize,
    /// Actual first page of each section and of the bonus page, in order.
    pub section_pages: Vec<usize>,
}

#[derive(Debug)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub summary: LayoutSummary,
}

/// Render a plan document dated today.
pub fn render(plan_type: &str, profile: &UserProfile, content: &PersonalizedContent) -> Result<Vec<u8>, RenderError> {
    let doc = render_document(plan_type, profile, content, Utc::now().date_naive())?;
    info!("📄 Rendered {} plan: {} pages, {} bytes", plan_type, doc.summary.page_count, doc.bytes.len());
    Ok(doc.bytes)
}

pub fn render_document(
    plan_type: &str,
    profile: &UserProfile,
    content: &PersonalizedContent,
    created: NaiveDate,
) -> Result<RenderedDocument, RenderError> {
    let mut canvas = PdfCanvas::new(&document_info(plan_type, profile))?;
    let summary = layout_document(&mut canvas, plan_type, profile, content, created)?;
    let bytes = canvas.finish()?;
    Ok(RenderedDocument { bytes, summary })
}

/// Lay out the whole document on any canvas. Unknown plan types get the
/// generic welcome page.
pub fn layout_document<C: Canvas>(
    canvas: &mut C,
    plan_type: &str,
    profile: &UserProfile,
    content: &PersonalizedContent,
    created: NaiveDate,
) -> Result<LayoutSummary, RenderError> {
    match PlanType::parse(plan_type) {
        Some(plan) => layout_plan(canvas, plan.theme(), profile, content, created),
        None => layout_generic(canvas, plan_type, profile),
    }
}

pub fn layout_plan<C: Canvas>(
    canvas: &mut C,
    theme: &PlanTheme,
    profile: &UserProfile,
    content: &PersonalizedContent,
    created: NaiveDate,
) -> Result<LayoutSummary, RenderError> {
    let accent = Color::from_hex(theme.accent)?;
    let cover = Color::from_hex(theme.cover)?;

    draw_cover(canvas, theme, profile, created, accent, cover)?;
    draw_table_of_contents(canvas, theme, accent)?;

    let mut section_pages = Vec::with_capacity(theme.sections.len() + 1);
    for section in theme.section_specs() {
        let color = Color::from_hex(section.accent)?;
        section_pages.push(write_section(canvas, section.title, content.get(section.key), color)?);
    }
    section_pages.push(write_section(canvas, theme.bonus_title, theme.bonus_body, accent)?);

    for ((title, listed), actual) in toc_entries(theme).iter().zip(&section_pages) {
        if listed != actual {
            warn!("⚠️ Contents lists {:?} on page {} but it starts on page {}", title, listed, actual);
        }
    }

    number_pages(canvas, 2)?;
    Ok(LayoutSummary { page_count: canvas.page_count(), section_pages })
}

/// Contents rows with their static page numbers. These are not adjusted
/// for overflow pages.
pub fn toc_entries(theme: &PlanTheme) -> Vec<(String, usize)> {
    theme
        .sections
        .iter()
        .map(|(title, _)| title.to_string())
        .chain(std::iter::once(theme.bonus_title.to_string()))
        .enumerate()
        .map(|(i, title)| (title, FIRST_SECTION_PAGE + i))
        .collect()
}

pub fn document_info(plan_type: &str, profile: &UserProfile) -> DocumentInfo {
    let name = addressee(profile);
    let (title, plan) = match PlanType::parse(plan_type) {
        Some(plan) => (format!("{} for {}", plan.theme().title, name), plan.as_str().to_string()),
        None => {
            let label = generic_label(plan_type);
            (format!("{} plan for {}", label, name), label)
        }
    };
    DocumentInfo {
        title,
        author: BRAND.to_string(),
        subject: format!("Personalized {} plan", plan),
        keywords: vec![BRAND.to_string(), plan, "natural wellness".to_string(), "personalized plan".to_string()],
        creator: "PlantRx Plan Generator".to_string(),
    }
}

/// The user's name as the built-in fonts can draw it; names with nothing
/// drawable read "friend".
fn addressee(profile: &UserProfile) -> String {
    let name = sanitize(profile.display_name());
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() { "friend".to_string() } else { name }
}

fn generic_label(plan_type: &str) -> String {
    let label = sanitize(plan_type.trim());
    if label.trim().is_empty() { "personalized".to_string() } else { label.trim().to_string() }
}

fn centered<C: Canvas>(canvas: &mut C, text: &str, size: f32, y: f32, weight: FontWeight, color: Color) -> Result<(), RenderError> {
    let x = ((PAGE_WIDTH - text_width(text, size, weight)) / 2.0).max(MARGIN_X);
    canvas.text(text, size, x, y, weight, color)
}

fn draw_cover<C: Canvas>(
    canvas: &mut C,
    theme: &PlanTheme,
    profile: &UserProfile,
    created: NaiveDate,
    accent: Color,
    background: Color,
) -> Result<(), RenderError> {
    canvas.begin_page()?;
    canvas.fill_rect(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT, background)?;
    canvas.fill_rect(0.0, 262.0, PAGE_WIDTH, PAGE_HEIGHT - 262.0, accent)?;
    centered(canvas, BRAND, 30.0, 276.0, FontWeight::Bold, Color::WHITE)?;
    centered(canvas, "Natural Wellness, Personalized", 11.0, 267.0, FontWeight::Regular, Color::WHITE)?;

    let mut y = 205.0;
    for line in wrap(theme.title, CONTENT_WIDTH, 28.0, FontWeight::Bold) {
        centered(canvas, &line, 28.0, y, FontWeight::Bold, Color::WHITE)?;
        y -= 12.0;
    }
    centered(canvas, theme.tagline, 13.0, y - 2.0, FontWeight::Italic, Color::WHITE)?;
    let addressed = format!("Exclusively for {}", addressee(profile));
    centered(canvas, &addressed, 16.0, y - 22.0, FontWeight::Bold, Color::WHITE)?;

    // Details box
    let (box_x, box_y, box_w, box_h) = (30.0, 78.0, PAGE_WIDTH - 60.0, 66.0);
    canvas.fill_rect(box_x, box_y, box_w, box_h, background.lighten(0.9))?;
    canvas.fill_rect(box_x, box_y + box_h - 2.0, box_w, 2.0, accent)?;
    let inner_x = box_x + 8.0;
    let inner_w = box_w - 16.0;
    let mut line_y = box_y + box_h - 12.0;
    canvas.text("Plan Details", 13.0, inner_x, line_y, FontWeight::Bold, accent)?;
    line_y -= 10.0;

    let goals: Vec<&str> = profile.goals.iter().map(|g| g.trim()).filter(|g| !g.is_empty()).take(2).collect();
    let details = [
        format!("Created: {}", created.format("%B %-d, %Y")),
        format!("Duration: {}", non_blank(profile.duration.as_deref()).unwrap_or("Flexible")),
        format!("Experience level: {}", non_blank(profile.experience.as_deref()).unwrap_or("All levels")),
        format!("Top goals: {}", if goals.is_empty() { "Overall wellbeing".to_string() } else { goals.join(", ") }),
    ];
    for detail in &details {
        for line in wrap(&sanitize(detail), inner_w, 11.0, FontWeight::Regular).into_iter().take(2) {
            canvas.text(&line, 11.0, inner_x, line_y, FontWeight::Regular, Color::TEXT)?;
            line_y -= 6.0;
        }
        line_y -= 2.0;
    }

    let mut y = 45.0;
    for line in wrap(theme.disclaimer, CONTENT_WIDTH, 8.0, FontWeight::Italic) {
        centered(canvas, &line, 8.0, y, FontWeight::Italic, Color::WHITE)?;
        y -= 4.0;
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn draw_table_of_contents<C: Canvas>(canvas: &mut C, theme: &PlanTheme, accent: Color) -> Result<(), RenderError> {
    canvas.begin_page()?;
    canvas.text("Table of Contents", 22.0, MARGIN_X, 266.0, FontWeight::Bold, accent)?;
    canvas.line((MARGIN_X, 260.0), (PAGE_WIDTH - MARGIN_X, 260.0), 1.2, accent)?;

    let mut y = 246.0;
    let right = PAGE_WIDTH - MARGIN_X;
    for (i, (title, page)) in toc_entries(theme).iter().enumerate() {
        let label = format!("{}. {}", i + 1, sanitize(title));
        let number = page.to_string();
        let label_x = MARGIN_X + 5.0;
        let label_end = label_x + text_width(&label, 12.0, FontWeight::Regular);
        let number_x = right - text_width(&number, 12.0, FontWeight::Bold);

        canvas.text(&label, 12.0, label_x, y, FontWeight::Regular, Color::TEXT)?;
        if number_x - label_end > 8.0 {
            canvas.line((label_end + 3.0, y + 0.8), (number_x - 3.0, y + 0.8), 0.3, Color::RULE)?;
        }
        canvas.text(&number, 12.0, number_x, y, FontWeight::Bold, accent)?;
        y -= 14.0;
    }

    centered(canvas, "Every section is tailored to your profile and questionnaire answers.", 10.0, 60.0, FontWeight::Italic, Color::MUTED)?;
    Ok(())
}

/// Write one titled section starting on a fresh page; returns that page.
pub fn write_section<C: Canvas>(canvas: &mut C, title: &str, body: &str, accent: Color) -> Result<usize, RenderError> {
    let mut writer = SectionWriter::open(canvas, title, accent)?;
    writer.write_body(body)?;
    Ok(writer.first_page)
}

struct SectionWriter<'c, C: Canvas> {
    canvas: &'c mut C,
    cursor: Cursor,
    title: String,
    accent: Color,
    first_page: usize,
}

impl<'c, C: Canvas> SectionWriter<'c, C> {
    fn open(canvas: &'c mut C, title: &str, accent: Color) -> Result<Self, RenderError> {
        let first_page = canvas.begin_page()?;
        let title = sanitize(title);
        let mut baseline = SECTION_TITLE_Y + TITLE_LINE;
        for line in wrap(&title, CONTENT_WIDTH, TITLE_SIZE, FontWeight::Bold) {
            baseline -= TITLE_LINE;
            canvas.text(&line, TITLE_SIZE, MARGIN_X, baseline, FontWeight::Bold, accent)?;
        }
        let rule_y = baseline.min(SECTION_TITLE_Y) - 4.0;
        canvas.line((MARGIN_X, rule_y), (PAGE_WIDTH - MARGIN_X, rule_y), 1.2, accent)?;

        Ok(Self {
            canvas,
            cursor: Cursor::starting_at(rule_y - 4.0, TOP_MARGIN, BOTTOM_MARGIN),
            title,
            accent,
            first_page,
        })
    }

    /// Reserve `height` for the next line, breaking the page if needed.
    fn place(&mut self, height: f32) -> Result<f32, RenderError> {
        let advance = self.cursor.advance(height);
        if advance.new_page {
            self.canvas.begin_page()?;
            let running = format!("{} (continued)", self.title);
            self.canvas.text(&running, 9.0, MARGIN_X, RUNNING_HEADER_Y, FontWeight::Italic, Color::MUTED)?;
            self.canvas.line((MARGIN_X, RUNNING_HEADER_Y - 4.0), (PAGE_WIDTH - MARGIN_X, RUNNING_HEADER_Y - 4.0), 0.5, Color::RULE)?;
        }
        Ok(advance.baseline)
    }

    fn write_body(&mut self, body: &str) -> Result<(), RenderError> {
        for raw in body.lines() {
            match classify(raw) {
                LineKind::Blank => self.cursor.skip(PARAGRAPH_GAP),
                LineKind::Header(text) => self.write_header(&sanitize(text))?,
                LineKind::Bullet(marker, text) => self.write_bullet(marker, &sanitize(text))?,
                LineKind::Paragraph(text) => self.write_paragraph(&sanitize(text))?,
            }
        }
        Ok(())
    }

    fn write_header(&mut self, text: &str) -> Result<(), RenderError> {
        if !self.cursor.at_top() {
            self.cursor.skip(HEADER_GAP);
        }
        for line in wrap(text, CONTENT_WIDTH, HEADER_SIZE, FontWeight::Bold) {
            let y = self.place(HEADER_LINE)?;
            self.canvas.text(&line, HEADER_SIZE, MARGIN_X, y, FontWeight::Bold, self.accent)?;
        }
        Ok(())
    }

    fn write_bullet(&mut self, marker: BulletMarker, text: &str) -> Result<(), RenderError> {
        let x = MARGIN_X + BULLET_INDENT;
        for (i, line) in wrap(text, CONTENT_WIDTH - BULLET_INDENT, BODY_SIZE, FontWeight::Regular).iter().enumerate() {
            let y = self.place(BODY_LINE)?;
            if i == 0 {
                self.draw_marker(marker, y)?;
            }
            self.canvas.text(line, BODY_SIZE, x, y, FontWeight::Regular, Color::TEXT)?;
        }
        Ok(())
    }

    fn draw_marker(&mut self, marker: BulletMarker, baseline: f32) -> Result<(), RenderError> {
        let x = MARGIN_X + 1.5;
        match marker {
            BulletMarker::Dot => self.canvas.fill_rect(x, baseline + 1.0, 1.4, 1.4, self.accent),
            BulletMarker::Dash => self.canvas.line((x, baseline + 1.6), (x + 2.6, baseline + 1.6), 0.8, self.accent),
            BulletMarker::Checkbox => {
                let (x0, y0, side) = (x - 0.5, baseline - 0.2, 2.8);
                let corners = [(x0, y0), (x0 + side, y0), (x0 + side, y0 + side), (x0, y0 + side)];
                for i in 0..corners.len() {
                    self.canvas.line(corners[i], corners[(i + 1) % corners.len()], 0.4, self.accent)?;
                }
                Ok(())
            }
        }
    }

    fn write_paragraph(&mut self, text: &str) -> Result<(), RenderError> {
        for line in wrap(text, CONTENT_WIDTH, BODY_SIZE, FontWeight::Regular) {
            let y = self.place(BODY_LINE)?;
            self.canvas.text(&line, BODY_SIZE, MARGIN_X, y, FontWeight::Regular, Color::TEXT)?;
        }
        Ok(())
    }
}

fn layout_generic<C: Canvas>(canvas: &mut C, plan_type: &str, profile: &UserProfile) -> Result<LayoutSummary, RenderError> {
    let accent = Color::from_hex(GENERIC_ACCENT)?;
    canvas.begin_page()?;
    canvas.fill_rect(0.0, 262.0, PAGE_WIDTH, PAGE_HEIGHT - 262.0, accent)?;
    centered(canvas, BRAND, 26.0, 275.0, FontWeight::Bold, Color::WHITE)?;

    let heading = format!("Welcome {}, this is your {} plan", addressee(profile), generic_label(plan_type));
    let mut y = 236.0;
    for line in wrap(&heading, CONTENT_WIDTH, TITLE_SIZE, FontWeight::Bold) {
        canvas.text(&line, TITLE_SIZE, MARGIN_X, y, FontWeight::Bold, accent)?;
        y -= TITLE_LINE + 1.0;
    }
    y -= 6.0;
    let body = "Thank you for choosing PlantRx. Your personalized guidance is being prepared by our wellness team. \
                In the meantime, focus on the fundamentals: drink plenty of water, eat whole foods, move gently every day \
                and protect your sleep. Always consult a qualified healthcare professional before making significant changes.";
    for line in wrap(body, CONTENT_WIDTH, BODY_SIZE + 1.0, FontWeight::Regular) {
        canvas.text(&line, BODY_SIZE + 1.0, MARGIN_X, y, FontWeight::Regular, Color::TEXT)?;
        y -= BODY_LINE + 1.0;
    }

    number_pages(canvas, 1)?;
    Ok(LayoutSummary { page_count: canvas.page_count(), section_pages: Vec::new() })
}

/// Stamp the 1-based page index centered in the footer of pages `first..`.
fn number_pages<C: Canvas>(canvas: &mut C, first: usize) -> Result<(), RenderError> {
    for page in first..=canvas.page_count() {
        canvas.select_page(page)?;
        centered(canvas, &page.to_string(), 9.0, FOOTER_Y, FontWeight::Regular, Color::MUTED)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::canvas::recording::{Op, RecordingCanvas};
    use super::*;
    use crate::fallback::fallback;
    use pretty_assertions::assert_eq;

    fn ava() -> UserProfile {
        UserProfile {
            name: "Ava".into(),
            duration: Some("1 month".into()),
            goals: vec!["weight loss".into()],
            ..UserProfile::default()
        }
    }

    fn fallback_content(plan: &str) -> PersonalizedContent {
        PersonalizedContent::from_sections(std::array::from_fn(|i| fallback(i, &ava(), plan)))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn lay_out(plan: &str, content: &PersonalizedContent) -> (RecordingCanvas, LayoutSummary) {
        let mut canvas = RecordingCanvas::default();
        let summary = layout_document(&mut canvas, plan, &ava(), content, date()).unwrap();
        (canvas, summary)
    }

    fn footer(canvas: &RecordingCanvas, page: usize) -> Option<String> {
        canvas.texts(page).into_iter().find(|(_, _, y)| *y == FOOTER_Y).map(|(t, _, _)| t)
    }

    #[test]
    fn fallback_diet_plan_has_thirteen_numbered_pages() {
        let (canvas, summary) = lay_out("diet", &fallback_content("diet"));

        assert_eq!(summary.page_count, 13);
        assert_eq!(summary.section_pages, (3..=13).collect::<Vec<_>>());
        assert_eq!(footer(&canvas, 1), None);
        for page in 2..=13 {
            assert_eq!(footer(&canvas, page), Some(page.to_string()));
        }
    }

    #[test]
    fn every_known_plan_fits_fallback_sections_on_one_page_each() {
        for plan in crate::plans::KNOWN_PLAN_TYPES {
            let (_, summary) = lay_out(plan, &fallback_content(plan));
            assert_eq!(summary.page_count, 13, "{plan} overflowed");
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let content = fallback_content("fitness");
        let (first, a) = lay_out("fitness", &content);
        let (second, b) = lay_out("fitness", &content);
        assert_eq!(a, b);
        assert_eq!(first.pages, second.pages);
    }

    #[test]
    fn cover_addresses_the_user() {
        let (canvas, _) = lay_out("diet", &fallback_content("diet"));
        let cover = canvas.all_text(1);
        assert!(cover.contains("Exclusively for Ava"));
        assert!(cover.contains("Personalized Diet Plan"));
        assert!(cover.contains("Created: March 14, 2026"));
        assert!(cover.contains("Duration: 1 month"));
        assert!(cover.contains("Experience level: All levels"));
        assert!(cover.contains("Top goals: weight loss"));
    }

    #[test]
    fn long_sections_overflow_and_reset_the_cursor() {
        let mut content = fallback_content("diet");
        content.nutrition_plan = (1..=200).map(|i| format!("Line {i} of a very long nutrition section")).collect::<Vec<_>>().join("\n");
        let (canvas, summary) = lay_out("diet", &content);

        // Nutrition is the third diet section.
        let start = summary.section_pages[2];
        let next = summary.section_pages[3];
        assert!(next - start > 1, "expected overflow pages");
        assert_eq!(summary.page_count, 13 + (next - start - 1));

        let continuation = canvas.texts(start + 1);
        assert_eq!(continuation[0].0, "Your Personalized Meal Plan (continued)");
        let first_body = continuation.iter().find(|(_, size, _)| *size == BODY_SIZE).unwrap();
        assert!((first_body.2 - (TOP_MARGIN - BODY_LINE)).abs() < 1e-3);
        assert!(canvas.all_text(next - 1).contains("Line 200 of a very long nutrition section"));

        for page in 2..=summary.page_count {
            assert_eq!(footer(&canvas, page), Some(page.to_string()));
        }
    }

    #[test]
    fn contents_page_numbers_stay_static_after_overflow() {
        let mut content = fallback_content("diet");
        content.introduction = "word ".repeat(4000);
        let (canvas, summary) = lay_out("diet", &content);

        assert!(summary.section_pages[1] > 4);
        let toc = canvas.texts(2);
        let numbers: Vec<String> = toc.iter().filter(|(_, size, y)| *size == 12.0 && *y != FOOTER_Y).map(|(t, _, _)| t.clone()).filter(|t| t.parse::<usize>().is_ok()).collect();
        assert_eq!(numbers, (3..=13).map(|n| n.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn headers_bullets_and_checkboxes_are_styled() {
        let mut canvas = RecordingCanvas::default();
        let accent = Color::from_hex("#2563eb").unwrap();
        write_section(&mut canvas, "Test", "**Morning**\n• Drink water\n□ Oats\n- Walk\nPlain text", accent).unwrap();

        let ops = &canvas.pages[0];
        let text_op = |needle: &str| {
            ops.iter().find_map(|op| match op {
                Op::Text { text, size, x, weight, .. } if text == needle => Some((*size, *x, *weight)),
                _ => None,
            })
        };
        assert_eq!(text_op("Morning"), Some((HEADER_SIZE, MARGIN_X, FontWeight::Bold)));
        assert_eq!(text_op("Drink water"), Some((BODY_SIZE, MARGIN_X + BULLET_INDENT, FontWeight::Regular)));
        assert_eq!(text_op("Oats").map(|t| t.1), Some(MARGIN_X + BULLET_INDENT));
        assert_eq!(text_op("Plain text"), Some((BODY_SIZE, MARGIN_X, FontWeight::Regular)));

        let dots = ops.iter().filter(|op| matches!(op, Op::Rect { .. })).count();
        let lines = ops.iter().filter(|op| matches!(op, Op::Line { .. })).count();
        assert_eq!(dots, 1);
        // title rule + 4 checkbox edges + dash
        assert_eq!(lines, 6);
    }

    #[test]
    fn unknown_plan_gets_a_single_welcome_page() {
        let (canvas, summary) = lay_out("astrology", &fallback_content("astrology"));
        assert_eq!(summary.page_count, 1);
        let text = canvas.all_text(1);
        assert!(text.contains("Welcome Ava, this is your astrology plan"));
        assert_eq!(footer(&canvas, 1), Some("1".to_string()));
    }

    #[test]
    fn invalid_theme_color_fails_the_render() {
        let mut theme = PlanType::Diet.theme().clone();
        theme.accent = "chartreuse";
        let mut canvas = RecordingCanvas::default();
        let err = layout_plan(&mut canvas, &theme, &ava(), &fallback_content("diet"), date()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidColor(_)));
    }

    #[test]
    fn undrawable_names_fall_back_to_friend() {
        let profile = UserProfile::named("Иван");
        let mut canvas = RecordingCanvas::default();
        layout_document(&mut canvas, "diet", &profile, &fallback_content("diet"), date()).unwrap();

        assert!(canvas.all_text(1).lines().any(|l| l == "Exclusively for friend"));
        assert_eq!(document_info("diet", &profile).title, "Personalized Diet Plan for friend");
        assert_eq!(document_info("diet", &UserProfile::named("José")).title, "Personalized Diet Plan for Jose");

        let mut canvas = RecordingCanvas::default();
        layout_document(&mut canvas, "astrology", &UserProfile::named("王芳"), &fallback_content("astrology"), date()).unwrap();
        assert!(canvas.all_text(1).contains("Welcome friend, this is your astrology plan"));
    }

    #[test]
    fn metadata_names_the_plan_and_user() {
        let info = document_info("Skincare", &ava());
        assert_eq!(info.title, "Personalized Skincare Plan for Ava");
        assert_eq!(info.subject, "Personalized skincare plan");
        assert!(info.keywords.contains(&"skincare".to_string()));
        assert_eq!(document_info("astrology", &ava()).title, "astrology plan for Ava");
    }

    #[test]
    fn toc_entries_are_static() {
        let entries = toc_entries(PlanType::Recovery.theme());
        assert_eq!(entries.len(), 11);
        assert_eq!(entries[0], ("Welcome to Your Recovery".to_string(), 3));
        assert_eq!(entries[10].1, 13);
        assert_eq!(entries.iter().filter(|(t, _)| t.starts_with("Bonus")).count(), 1);
    }

    #[test]
    fn rendered_bytes_are_pdf() {
        let bytes = render("diet", &ava(), &fallback_content("diet")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let generic = render("astrology", &ava(), &fallback_content("astrology")).unwrap();
        assert!(generic.starts_with(b"%PDF"));
    }
}
