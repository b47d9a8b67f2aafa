//! The fixed page sequence of a rendered report.
//!
//! Every page lays itself out against the logical A4 page (794×1123 by default) and is
//! handed to the exporter as an [`ExportPage`]. Pages after the cover carry a footer with
//! the brand, a two-digit page number, and the website.

use std::io::Cursor;
use std::sync::Arc;

use super::loshu::LoShuGrid;
use super::model::{NumerologyReport, Plan, YearPrediction};
use crate::config::ReportConfig;
use crate::draw::{
    Color, FontDescriptor, GREY, INDIGO, PAPER, TextAlign, TextStyle, WHITE, render_bullet_list,
    render_page_frame, render_panel, render_text_block,
};
use crate::export::{ExportPage, SharedPage};

const MARGIN: f64 = 64.0;
const FOOTER_HEIGHT: f64 = 72.0;

const TEXT: Color = Color {
    r: 31.0 / 255.0,
    g: 41.0 / 255.0,
    b: 55.0 / 255.0,
    a: 1.0,
};
const EMERALD: Color = Color {
    r: 5.0 / 255.0,
    g: 150.0 / 255.0,
    b: 105.0 / 255.0,
    a: 1.0,
};
const CRIMSON: Color = Color {
    r: 220.0 / 255.0,
    g: 38.0 / 255.0,
    b: 38.0 / 255.0,
    a: 1.0,
};
const SKY: Color = Color {
    r: 37.0 / 255.0,
    g: 99.0 / 255.0,
    b: 235.0 / 255.0,
    a: 1.0,
};
const ROSE: Color = Color {
    r: 219.0 / 255.0,
    g: 39.0 / 255.0,
    b: 119.0 / 255.0,
    a: 1.0,
};
const TEAL: Color = Color {
    r: 13.0 / 255.0,
    g: 148.0 / 255.0,
    b: 136.0 / 255.0,
    a: 1.0,
};
const VIOLET: Color = Color {
    r: 124.0 / 255.0,
    g: 58.0 / 255.0,
    b: 237.0 / 255.0,
    a: 1.0,
};

/// Appearance shared by every page of one report.
#[derive(Debug, Clone)]
pub struct ReportTheme {
    pub font: FontDescriptor,
    pub accent: Color,
    pub brand_name: String,
    pub website: String,
}

impl From<&ReportConfig> for ReportTheme {
    fn from(config: &ReportConfig) -> Self {
        Self {
            font: FontDescriptor::new(&config.font_family, "normal", "normal"),
            accent: config.accent_color.to_color(),
            brand_name: config.brand_name.clone(),
            website: config.website.clone(),
        }
    }
}

impl Default for ReportTheme {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

/// One page of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Cover,
    Introduction,
    Snapshot,
    LoShu,
    Personality,
    StrengthsWeaknesses,
    Signature,
    Family,
    Numbers,
    CareerFinance,
    Health,
    /// Forecast for `future_predictions[i]`.
    Year(usize),
    Remedies,
}

impl PageKind {
    pub fn label(&self, report: &NumerologyReport) -> String {
        match self {
            PageKind::Cover => "Cover".to_string(),
            PageKind::Introduction => "Introduction".to_string(),
            PageKind::Snapshot => "Snapshot".to_string(),
            PageKind::LoShu => "Lo Shu Grid".to_string(),
            PageKind::Personality => "Personality".to_string(),
            PageKind::StrengthsWeaknesses => "Strengths & Weaknesses".to_string(),
            PageKind::Signature => "Signature".to_string(),
            PageKind::Family => "Family".to_string(),
            PageKind::Numbers => "Name, Mobile & Vehicle".to_string(),
            PageKind::CareerFinance => "Career & Finance".to_string(),
            PageKind::Health => "Health".to_string(),
            PageKind::Year(index) => match report.future_predictions.get(*index) {
                Some(prediction) => format!("Forecast {}", prediction.year),
                None => "Forecast".to_string(),
            },
            PageKind::Remedies => "Remedies".to_string(),
        }
    }
}

/// Pages rendered for `plan`, in output order.
///
/// Free reports stop after the snapshot. Premium reports continue with the detailed
/// analysis, one forecast page per predicted year, and the remedies.
pub fn page_sequence(report: &NumerologyReport, plan: Plan) -> Vec<PageKind> {
    let mut kinds = vec![PageKind::Cover, PageKind::Introduction, PageKind::Snapshot];
    if plan.is_premium() {
        kinds.extend([
            PageKind::LoShu,
            PageKind::Personality,
            PageKind::StrengthsWeaknesses,
            PageKind::Signature,
            PageKind::Family,
            PageKind::Numbers,
            PageKind::CareerFinance,
            PageKind::Health,
        ]);
        kinds.extend((0..report.future_predictions.len()).map(PageKind::Year));
        kinds.push(PageKind::Remedies);
    }
    kinds
}

/// Builds the exportable pages of a report.
pub fn build_pages(report: &NumerologyReport, plan: Plan, config: &ReportConfig) -> Vec<SharedPage> {
    let report = Arc::new(report.clone());
    let theme = Arc::new(ReportTheme::from(config));

    page_sequence(&report, plan)
        .into_iter()
        .enumerate()
        .map(|(position, kind)| {
            Arc::new(ReportPage {
                kind,
                number: position + 1,
                label: kind.label(&report),
                plan,
                report: Arc::clone(&report),
                theme: Arc::clone(&theme),
            }) as SharedPage
        })
        .collect()
}

/// A report page ready for export.
#[derive(Debug)]
pub struct ReportPage {
    kind: PageKind,
    /// One-based position in the document.
    number: usize,
    label: String,
    plan: Plan,
    report: Arc<NumerologyReport>,
    theme: Arc<ReportTheme>,
}

impl ReportPage {
    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn number(&self) -> usize {
        self.number
    }

    fn paint_cover(&self, ctx: &cairo::Context, width: f64, height: f64) {
        let report = &self.report;
        let accent = self.theme.accent;

        INDIGO.apply(ctx);
        ctx.rectangle(0.0, 0.0, width, height);
        let _ = ctx.fill();
        render_page_frame(ctx, width, height, accent.with_alpha(0.6));

        let font = &self.theme.font;
        let inner = width - 2.0 * MARGIN;
        let centered = |y: f64, text: &str, style: TextStyle| {
            render_text_block(ctx, MARGIN, y, inner, text, &style.aligned(TextAlign::Center))
        };

        centered(
            250.0,
            &self.theme.brand_name,
            TextStyle::new(font.bold(), 44.0, WHITE),
        );

        accent.apply(ctx);
        ctx.set_line_width(6.0);
        ctx.set_line_cap(cairo::LineCap::Round);
        ctx.move_to(width / 2.0 - 80.0, 340.0);
        ctx.line_to(width / 2.0 + 80.0, 340.0);
        let _ = ctx.stroke();

        let tier = match self.plan {
            Plan::Premium => "Premium Life Path Report",
            Plan::Free => "Free Numerology Report",
        };
        centered(380.0, tier, TextStyle::new(font.bold(), 18.0, accent));

        render_panel(
            ctx,
            width / 2.0 - 190.0,
            480.0,
            380.0,
            230.0,
            28.0,
            WHITE.with_alpha(0.1),
            Some(WHITE.with_alpha(0.2)),
        );
        centered(
            515.0,
            &format!("{} / {}", report.driver, report.conductor),
            TextStyle::new(font.bold(), 72.0, WHITE),
        );
        centered(
            650.0,
            "DRIVER & CONDUCTOR NUMBERS",
            TextStyle::new(font.clone(), 13.0, accent),
        );

        centered(
            height - 130.0,
            &format!(
                "CONFIDENTIAL REPORT • {}",
                report.generated_date_or_today()
            ),
            TextStyle::new(font.clone(), 10.0, GREY),
        );
    }

    fn paint_footer(&self, ctx: &cairo::Context, width: f64, height: f64) {
        let y = height - FOOTER_HEIGHT;
        let inner = width - 2.0 * MARGIN;

        self.theme.accent.with_alpha(0.4).apply(ctx);
        ctx.set_line_width(1.0);
        ctx.move_to(MARGIN, y);
        ctx.line_to(width - MARGIN, y);
        let _ = ctx.stroke();

        let style = TextStyle::new(self.theme.font.clone(), 8.0, GREY);
        let brand = TextStyle::new(self.theme.font.bold(), 8.0, self.theme.accent);
        let text_y = y + 10.0;

        render_text_block(ctx, MARGIN, text_y, inner, &self.theme.brand_name.to_uppercase(), &brand);
        render_text_block(
            ctx,
            MARGIN,
            text_y,
            inner,
            &format!("PAGE {:02}", self.number),
            &style.clone().aligned(TextAlign::Center),
        );
        if !self.theme.website.is_empty() {
            render_text_block(
                ctx,
                MARGIN,
                text_y,
                inner,
                &self.theme.website,
                &style.aligned(TextAlign::Right),
            );
        }
    }

    fn paint_introduction(&self, flow: &mut Flow<'_>) {
        flow.heading("Important Information");
        flow.paragraph(
            "Namaste! This report is a detailed reading based on your date of birth. \
             Numerology is an ancient discipline that helps reveal hidden aspects of your \
             nature, your fortune, and the remedies that support you.",
        );
        flow.section(
            "Disclaimer",
            "This report is meant as guidance. Your destiny depends on your own actions; \
             consult an expert before any major decision. No outcome is guaranteed.",
            CRIMSON,
        );
        flow.gap(16.0);

        let third = (flow.width - 32.0) / 3.0;
        let y = flow.y;
        for (i, (title, color)) in [("Nature", INDIGO), ("Fortune", VIOLET), ("Remedies", EMERALD)]
            .into_iter()
            .enumerate()
        {
            let x = flow.x + i as f64 * (third + 16.0);
            render_panel(flow.ctx, x, y, third, 90.0, 10.0, color.with_alpha(0.08), None);
            render_text_block(
                flow.ctx,
                x,
                y + 32.0,
                third,
                title,
                &TextStyle::new(flow.theme.font.bold(), 14.0, color).aligned(TextAlign::Center),
            );
        }
        flow.y = y + 110.0;
    }

    fn paint_snapshot(&self, flow: &mut Flow<'_>) {
        let report = &self.report;
        flow.heading("Snapshot");

        let half = (flow.width - 24.0) / 2.0;
        let y = flow.y;
        for (i, (title, value, caption, color)) in [
            ("DRIVER", report.driver, "Your personality and nature", INDIGO),
            ("CONDUCTOR", report.conductor, "Your fortune and karma", VIOLET),
        ]
        .into_iter()
        .enumerate()
        {
            let x = flow.x + i as f64 * (half + 24.0);
            render_panel(flow.ctx, x, y, half, 170.0, 16.0, color, None);
            let centered = |dy: f64, text: &str, style: TextStyle| {
                render_text_block(flow.ctx, x, y + dy, half, text, &style.aligned(TextAlign::Center));
            };
            centered(18.0, title, TextStyle::new(flow.theme.font.bold(), 12.0, WHITE.with_alpha(0.8)));
            centered(42.0, &value.to_string(), TextStyle::new(flow.theme.font.bold(), 54.0, WHITE));
            centered(132.0, caption, TextStyle::new(flow.theme.font.clone(), 10.0, WHITE.with_alpha(0.8)));
        }
        flow.y = y + 194.0;

        flow.quote("LIFE PURPOSE", &report.summary.life_theme);

        let join = |values: Vec<String>| {
            if values.is_empty() {
                "-".to_string()
            } else {
                values.join(", ")
            }
        };
        flow.cards(&[
            (
                "LUCKY NUMBERS",
                join(report.summary.favorable_numbers.iter().map(u32::to_string).collect()),
                EMERALD,
            ),
            ("LUCKY DAYS", join(report.summary.favorable_days.clone()), SKY),
            ("LUCKY COLORS", join(report.summary.favorable_colors.clone()), ROSE),
        ]);

        flow.bullets(Some("Key Advice"), &report.summary.key_advice);
    }

    fn paint_lo_shu(&self, flow: &mut Flow<'_>) {
        let report = &self.report;
        let grid = LoShuGrid::new(&report.lo_shu_grid);
        flow.heading("Lo Shu Grid (Birth Chart)");

        let (cell, gap) = (84.0, 8.0);
        let size = 3.0 * cell + 4.0 * gap;
        let left = flow.x + (flow.width - size) / 2.0;
        let top = flow.y;

        render_panel(flow.ctx, left, top, size, size, 12.0, flow.theme.accent, None);
        for (i, value) in grid.cells().iter().enumerate() {
            let x = left + gap + (i % 3) as f64 * (cell + gap);
            let y = top + gap + (i / 3) as f64 * (cell + gap);
            match value {
                Some(digit) => {
                    render_panel(flow.ctx, x, y, cell, cell, 8.0, WHITE, None);
                    render_text_block(
                        flow.ctx,
                        x,
                        y + cell / 2.0 - 26.0,
                        cell,
                        &digit.to_string(),
                        &TextStyle::new(flow.theme.font.bold(), 30.0, INDIGO)
                            .aligned(TextAlign::Center),
                    );
                }
                None => render_panel(flow.ctx, x, y, cell, cell, 8.0, PAPER.with_alpha(0.35), None),
            }
        }
        flow.y = top + size + 24.0;

        flow.italic(
            "The grid is based on the Lakshmi yantra. Filled cells are your strengths; \
             empty cells show where you need to work.",
            GREY,
        );

        let missing = if report.missing_numbers.is_empty() {
            grid.missing()
        } else {
            report.missing_numbers.clone()
        };
        if !missing.is_empty() {
            let listed: Vec<String> = missing.iter().map(u8::to_string).collect();
            flow.subheading(&format!("Missing numbers: {}", listed.join(", ")), INDIGO);
        }

        flow.section("Chart Analysis", &report.birth_chart_analysis, INDIGO);
        flow.section("Missing Numbers", &report.missing_number_analysis, VIOLET);
        flow.bullets(None, &report.missing_number_remedies);
    }

    fn paint_personality(&self, flow: &mut Flow<'_>) {
        let report = &self.report;
        flow.heading("Personality & Fortune");
        flow.section(
            &format!("Driver {} (Nature)", report.driver),
            &report.driver_analysis,
            SKY,
        );
        flow.section(
            &format!("Conductor {} (Fortune)", report.conductor),
            &report.conductor_analysis,
            VIOLET,
        );
        flow.section("Combination", &report.combination_analysis, flow.theme.accent);
    }

    fn paint_strengths(&self, flow: &mut Flow<'_>) {
        let report = &self.report;
        flow.heading("Strengths & Weaknesses");
        flow.banner("Strengths", EMERALD);
        flow.bullets_in(&report.strengths, EMERALD);
        flow.gap(16.0);
        flow.banner("Needs Improvement", CRIMSON);
        flow.bullets_in(&report.weaknesses, CRIMSON);
    }

    fn paint_signature(&self, flow: &mut Flow<'_>) {
        let report = &self.report;
        flow.heading("Signature Analysis");
        flow.subheading("Your Signature", INDIGO);

        let (x, y, w, h) = (flow.x, flow.y, flow.width, 170.0);
        render_panel(flow.ctx, x, y, w, h, 12.0, WHITE, Some(GREY.with_alpha(0.5)));

        match report.signature_png().as_deref().and_then(load_png) {
            Some(image) => {
                let (iw, ih) = (image.width() as f64, image.height() as f64);
                let scale = ((w - 48.0) / iw).min((h - 32.0) / ih);
                let ctx = flow.ctx;
                let _ = ctx.save();
                ctx.translate(x + (w - iw * scale) / 2.0, y + (h - ih * scale) / 2.0);
                ctx.scale(scale, scale);
                if ctx.set_source_surface(&image, 0.0, 0.0).is_ok() {
                    let _ = ctx.paint();
                }
                let _ = ctx.restore();
            }
            None => {
                render_text_block(
                    flow.ctx,
                    x,
                    y + h / 2.0 - 10.0,
                    w,
                    "No signature provided",
                    &TextStyle::new(flow.theme.font.italic(), 12.0, GREY).aligned(TextAlign::Center),
                );
            }
        }
        flow.y = y + h + 24.0;

        let visual = report
            .signature_visual_analysis
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or("Visual analysis is unavailable because no signature was provided.");
        flow.section("Graphology (Visual Analysis)", visual, ROSE);
        flow.section("Tips for Success", &report.signature_analysis, INDIGO);
    }

    fn paint_family(&self, flow: &mut Flow<'_>) {
        let report = &self.report;
        flow.heading("Family Bond");
        flow.section(
            "Spouse",
            or_placeholder(
                &report.spouse_analysis,
                "Analysis unavailable because spouse details were not provided.",
            ),
            ROSE,
        );
        flow.section(
            "Children",
            or_placeholder(
                &report.child_analysis,
                "Analysis unavailable because child details were not provided.",
            ),
            TEAL,
        );
        flow.section("Relationships", &report.relationship_analysis, VIOLET);
        flow.quote("FAMILY HARMONY TIP", &report.family_dynamics);
    }

    fn paint_numbers(&self, flow: &mut Flow<'_>) {
        let report = &self.report;
        flow.heading("Name, Mobile & Vehicle");
        flow.section("Name Analysis", &report.name_analysis, INDIGO);
        if !report.name_correction.trim().is_empty() {
            flow.quote("SUGGESTED NAME", &report.name_correction);
        }

        let mobile_title = if report.mobile_score.trim().is_empty() {
            "Mobile Number".to_string()
        } else {
            format!("Mobile Number ({})", report.mobile_score.trim())
        };
        flow.section(&mobile_title, &report.mobile_analysis, SKY);

        if let Some(car) = report.car_analysis.as_deref() {
            let title = match report.car_score.as_deref().map(str::trim) {
                Some(score) if !score.is_empty() => format!("Vehicle ({})", score),
                _ => "Vehicle".to_string(),
            };
            flow.section(&title, car, GREY);
        }
    }

    fn paint_career(&self, flow: &mut Flow<'_>) {
        let report = &self.report;
        flow.heading("Career, Business & Money");
        flow.section("Career Advice", &report.career_analysis, INDIGO);
        flow.bullets(Some("Suitable Professions"), &report.suitable_professions);
        flow.section("Financial Outlook", &report.finance_analysis, EMERALD);
        flow.quote("MONEY MANTRA", &report.wealth_mindset);
    }

    fn paint_health(&self, flow: &mut Flow<'_>) {
        let report = &self.report;
        flow.heading("Health");
        flow.section("Overview", &report.health_analysis, TEAL);
        flow.bullets(Some("Health Remedies"), &report.health_remedies);
    }

    fn paint_year(&self, flow: &mut Flow<'_>, prediction: &YearPrediction) {
        flow.heading(&format!("Forecast for {}", prediction.year));

        let (x, y, w) = (flow.x, flow.y, flow.width);
        render_panel(flow.ctx, x, y, w, 150.0, 20.0, INDIGO, None);
        render_text_block(
            flow.ctx,
            x,
            y + 18.0,
            w,
            &prediction.year.to_string(),
            &TextStyle::new(flow.theme.font.bold(), 44.0, flow.theme.accent)
                .aligned(TextAlign::Center),
        );
        render_text_block(
            flow.ctx,
            x + 24.0,
            y + 96.0,
            w - 48.0,
            &format!("\u{201c}{}\u{201d}", prediction.theme),
            &TextStyle::new(flow.theme.font.clone(), 15.0, WHITE).aligned(TextAlign::Center),
        );
        flow.y = y + 174.0;

        flow.section("Career & Business", &prediction.career, SKY);
        flow.section("Finance", &prediction.finance, EMERALD);
        flow.section("Relationships", &prediction.relationship, ROSE);
        flow.section("Health", &prediction.health, TEAL);
        flow.quote("REMEDY FOR THE YEAR", &prediction.remedy);
    }

    fn paint_remedies(&self, flow: &mut Flow<'_>) {
        let remedies = &self.report.remedies;
        flow.heading("Key Remedies");
        flow.banner("Lal Kitab Remedies", CRIMSON);
        flow.bullets_in(&remedies.lal_kitab, CRIMSON);
        flow.gap(8.0);
        flow.section("Gemstone", &remedies.crystals, VIOLET);
        flow.section("Yantra", &remedies.yantra, flow.theme.accent);
        flow.bullets(Some("Lifestyle Changes"), &remedies.lifestyle);
        flow.bullets(Some("Action Plan"), &self.report.action_plan);
        flow.bullets(Some("Golden Rules"), &self.report.golden_rules);
    }
}

impl ExportPage for ReportPage {
    fn label(&self) -> &str {
        &self.label
    }

    fn paint(&self, ctx: &cairo::Context, width: f64, height: f64) -> Result<(), cairo::Error> {
        if self.kind == PageKind::Cover {
            self.paint_cover(ctx, width, height);
            return ctx.status();
        }

        render_page_frame(ctx, width, height, self.theme.accent);

        // Body text never runs into the footer
        ctx.save()?;
        ctx.rectangle(0.0, 0.0, width, height - FOOTER_HEIGHT - 4.0);
        ctx.clip();

        let mut flow = Flow::new(ctx, &self.theme, width);
        match self.kind {
            PageKind::Cover => {}
            PageKind::Introduction => self.paint_introduction(&mut flow),
            PageKind::Snapshot => self.paint_snapshot(&mut flow),
            PageKind::LoShu => self.paint_lo_shu(&mut flow),
            PageKind::Personality => self.paint_personality(&mut flow),
            PageKind::StrengthsWeaknesses => self.paint_strengths(&mut flow),
            PageKind::Signature => self.paint_signature(&mut flow),
            PageKind::Family => self.paint_family(&mut flow),
            PageKind::Numbers => self.paint_numbers(&mut flow),
            PageKind::CareerFinance => self.paint_career(&mut flow),
            PageKind::Health => self.paint_health(&mut flow),
            PageKind::Year(index) => {
                if let Some(prediction) = self.report.future_predictions.get(index) {
                    self.paint_year(&mut flow, prediction);
                }
            }
            PageKind::Remedies => self.paint_remedies(&mut flow),
        }
        ctx.restore()?;

        self.paint_footer(ctx, width, height);
        ctx.status()
    }
}

/// Top-to-bottom layout cursor inside the page margins.
struct Flow<'a> {
    ctx: &'a cairo::Context,
    theme: &'a ReportTheme,
    x: f64,
    width: f64,
    y: f64,
}

impl<'a> Flow<'a> {
    fn new(ctx: &'a cairo::Context, theme: &'a ReportTheme, page_width: f64) -> Self {
        Self {
            ctx,
            theme,
            x: MARGIN,
            width: page_width - 2.0 * MARGIN,
            y: MARGIN + 8.0,
        }
    }

    fn gap(&mut self, height: f64) {
        self.y += height;
    }

    fn body_style(&self) -> TextStyle {
        TextStyle::new(self.theme.font.clone(), 11.0, TEXT).aligned(TextAlign::Justify)
    }

    fn heading(&mut self, title: &str) {
        let style = TextStyle::new(self.theme.font.bold(), 22.0, INDIGO);
        self.y += render_text_block(self.ctx, self.x, self.y, self.width, title, &style) + 10.0;

        self.theme.accent.apply(self.ctx);
        self.ctx.set_line_width(3.0);
        self.ctx.move_to(self.x, self.y);
        self.ctx.line_to(self.x + 120.0, self.y);
        let _ = self.ctx.stroke();
        self.y += 24.0;
    }

    fn subheading(&mut self, title: &str, color: Color) {
        let style = TextStyle::new(self.theme.font.bold(), 14.0, color);
        self.y += render_text_block(self.ctx, self.x, self.y, self.width, title, &style) + 8.0;
    }

    fn paragraph(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let style = self.body_style();
        self.y += render_text_block(self.ctx, self.x, self.y, self.width, text, &style) + 16.0;
    }

    fn italic(&mut self, text: &str, color: Color) {
        let style = TextStyle::new(self.theme.font.italic(), 11.0, color);
        self.y += render_text_block(self.ctx, self.x, self.y, self.width, text, &style) + 16.0;
    }

    /// Titled paragraph with a colored bar down its left edge. Empty bodies are skipped.
    fn section(&mut self, title: &str, body: &str, color: Color) {
        if body.trim().is_empty() {
            return;
        }
        let top = self.y;
        self.x += 18.0;
        self.width -= 18.0;
        self.subheading(title, color);
        self.paragraph(body);
        self.x -= 18.0;
        self.width += 18.0;

        color.apply(self.ctx);
        self.ctx.rectangle(self.x, top, 4.0, (self.y - top - 16.0).max(0.0));
        let _ = self.ctx.fill();
        self.y += 4.0;
    }

    /// Centered emphasized text under a small caption.
    fn quote(&mut self, caption: &str, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let accent = self.theme.accent;
        let caption_style =
            TextStyle::new(self.theme.font.bold(), 10.0, accent).aligned(TextAlign::Center);
        let text_style =
            TextStyle::new(self.theme.font.italic(), 16.0, INDIGO).aligned(TextAlign::Center);

        self.y += render_text_block(self.ctx, self.x, self.y, self.width, caption, &caption_style)
            + 6.0;
        self.y += render_text_block(
            self.ctx,
            self.x + 24.0,
            self.y,
            self.width - 48.0,
            &format!("\u{201c}{}\u{201d}", text.trim()),
            &text_style,
        ) + 24.0;
    }

    /// Row of equally sized label/value cards.
    fn cards(&mut self, cards: &[(&str, String, Color)]) {
        if cards.is_empty() {
            return;
        }
        let gap = 16.0;
        let card_width = (self.width - gap * (cards.len() - 1) as f64) / cards.len() as f64;
        let height = 96.0;

        for (i, (label, value, color)) in cards.iter().enumerate() {
            let x = self.x + i as f64 * (card_width + gap);
            render_panel(self.ctx, x, self.y, card_width, height, 10.0, WHITE, Some(color.with_alpha(0.4)));
            color.apply(self.ctx);
            self.ctx.rectangle(x, self.y + 10.0, 4.0, height - 20.0);
            let _ = self.ctx.fill();

            render_text_block(
                self.ctx,
                x + 16.0,
                self.y + 14.0,
                card_width - 24.0,
                label,
                &TextStyle::new(self.theme.font.bold(), 8.0, GREY),
            );
            render_text_block(
                self.ctx,
                x + 16.0,
                self.y + 36.0,
                card_width - 24.0,
                value,
                &TextStyle::new(self.theme.font.bold(), 13.0, *color),
            );
        }
        self.y += height + 24.0;
    }

    /// Full-width colored title bar.
    fn banner(&mut self, title: &str, color: Color) {
        render_panel(self.ctx, self.x, self.y, self.width, 40.0, 10.0, color, None);
        render_text_block(
            self.ctx,
            self.x,
            self.y + 9.0,
            self.width,
            title,
            &TextStyle::new(self.theme.font.bold(), 14.0, WHITE).aligned(TextAlign::Center),
        );
        self.y += 56.0;
    }

    fn bullets(&mut self, title: Option<&str>, items: &[String]) {
        if items.iter().all(|item| item.trim().is_empty()) {
            return;
        }
        if let Some(title) = title {
            self.subheading(title, INDIGO);
        }
        let bullet = self.theme.accent;
        self.bullets_in(items, bullet);
    }

    fn bullets_in(&mut self, items: &[String], bullet: Color) {
        let style = TextStyle::new(self.theme.font.clone(), 11.0, TEXT);
        self.y += render_bullet_list(self.ctx, self.x, self.y, self.width, items, &style, bullet)
            + 12.0;
    }
}

fn or_placeholder<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => placeholder,
    }
}

fn load_png(bytes: &[u8]) -> Option<cairo::ImageSurface> {
    cairo::ImageSurface::create_from_png(&mut Cursor::new(bytes))
        .inspect_err(|e| log::warn!("Could not decode signature image: {}", e))
        .ok()
}
