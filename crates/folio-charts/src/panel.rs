//! ggplot2-style panel
//!
//! Everything around the marks: grey panel, white gridlines, border, tick
//! marks and labels, axis titles, plot title, caption, legend and tooltip.
//! Geometry lives in [`PanelLayout`] so it can be checked without a DOM.

use leptos::prelude::*;

use crate::{AxisTick, ChartDimensions, ChartMargin, colors};

/// Extra height reserved above the plot when it has a title
pub const TITLE_OFFSET: f64 = 22.0;
/// Axis label font size in px
pub const LABEL_FONT_SIZE: f64 = 10.0;
/// Average glyph width as a fraction of the font size
pub const CHAR_WIDTH_RATIO: f64 = 0.58;

const TICK_LENGTH: f64 = 5.0;

// ============================================================================
// CAPTION
// ============================================================================

/// One line of the terminal-style caption above a chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLine {
    pub prompt: &'static str,
    pub code: String,
}

/// A ggplot call shown as a caption, e.g.
/// `ggplot(works, aes(x = year)) + geom_dotplot() + ggtitle("Publications")`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Caption {
    pub lines: Vec<CaptionLine>,
    /// Argument of `ggtitle(...)`, used as the plot title
    pub title: Option<String>,
}

impl Caption {
    pub fn parse(source: &str) -> Self {
        let lines = source
            .split(" +")
            .enumerate()
            .map(|(i, part)| {
                if i == 0 {
                    CaptionLine {
                        prompt: "> ",
                        code: part.trim().to_string(),
                    }
                } else {
                    CaptionLine {
                        prompt: "  ",
                        code: format!("+ {}", part.trim()),
                    }
                }
            })
            .collect();

        Self {
            lines,
            title: ggtitle(source),
        }
    }
}

/// Text of the first `ggtitle("...")` (or single-quoted) call
fn ggtitle(source: &str) -> Option<String> {
    let start = source.find("ggtitle(")? + "ggtitle(".len();
    let rest = &source[start..];
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &rest[quote.len_utf8()..];

    // Closing quote may be either kind, as long as `)` follows it
    let end = body
        .char_indices()
        .skip(1)
        .find(|&(i, c)| (c == '"' || c == '\'') && body[i + c.len_utf8()..].starts_with(')'))
        .map(|(i, _)| i)?;

    Some(body[..end].to_string())
}

// ============================================================================
// LABEL TRUNCATION
// ============================================================================

/// Shorten `text` with an ellipsis so it fits `max_px` at `font_size`
pub fn truncate_label(text: &str, max_px: f64, font_size: f64) -> String {
    let char_width = font_size * CHAR_WIDTH_RATIO;
    let max_chars = (max_px / char_width).floor().max(0.0) as usize;

    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(1).max(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('\u{2026}');
    out
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Size and labelling of one panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelFrame {
    pub width: f64,
    /// Height without the title band
    pub height: f64,
    pub margin: ChartMargin,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub max_label_width: Option<f64>,
}

impl PanelFrame {
    pub fn new(dims: ChartDimensions) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
            margin: dims.margin,
            title: None,
            x_label: None,
            y_label: None,
            max_label_width: None,
        }
    }

    pub fn title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn max_label_width(mut self, px: f64) -> Self {
        self.max_label_width = Some(px);
        self
    }
}

/// Rectangle in SVG pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Tick mark plus its label
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub tick: GridLine,
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// Untruncated text when `text` was shortened
    pub full: Option<String>,
}

/// Resolved panel geometry.
///
/// Tick positions are given in the un-offset coordinate system the marks use;
/// the layout shifts them by the title offset. Gridlines and labels are both
/// read from the same tick list.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    pub frame: PanelFrame,
    pub title_offset: f64,
    pub total_height: f64,
    pub plot: PlotRect,
    x_ticks: Vec<AxisTick>,
    y_ticks: Vec<AxisTick>,
}

impl PanelLayout {
    pub fn new(frame: PanelFrame, x_ticks: Vec<AxisTick>, y_ticks: Vec<AxisTick>) -> Self {
        let title_offset = if frame.title.is_some() { TITLE_OFFSET } else { 0.0 };
        let total_height = frame.height + title_offset;
        let m = frame.margin;

        let plot = PlotRect {
            x: m.left,
            y: m.top + title_offset,
            width: (frame.width - m.left - m.right).max(0.0),
            height: (frame.height - m.top - m.bottom).max(0.0),
        };

        Self {
            frame,
            title_offset,
            total_height,
            plot,
            x_ticks,
            y_ticks,
        }
    }

    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.frame.width, self.total_height)
    }

    /// Transform for the marks group
    pub fn marks_transform(&self) -> String {
        format!("translate(0, {})", self.title_offset)
    }

    pub fn x_ticks(&self) -> &[AxisTick] {
        &self.x_ticks
    }

    pub fn y_ticks(&self) -> &[AxisTick] {
        &self.y_ticks
    }

    pub fn x_gridlines(&self) -> Vec<GridLine> {
        self.x_ticks
            .iter()
            .map(|t| GridLine {
                x1: t.position,
                y1: self.plot.y,
                x2: t.position,
                y2: self.plot.bottom(),
            })
            .collect()
    }

    pub fn y_gridlines(&self) -> Vec<GridLine> {
        self.y_ticks
            .iter()
            .map(|t| {
                let y = t.position + self.title_offset;
                GridLine {
                    x1: self.plot.x,
                    y1: y,
                    x2: self.plot.right(),
                    y2: y,
                }
            })
            .collect()
    }

    pub fn x_labels(&self) -> Vec<TickLabel> {
        let bottom = self.plot.bottom();
        self.x_ticks
            .iter()
            .map(|t| TickLabel {
                tick: GridLine {
                    x1: t.position,
                    y1: bottom,
                    x2: t.position,
                    y2: bottom + TICK_LENGTH,
                },
                x: t.position,
                y: bottom + 18.0,
                text: t.label.clone(),
                full: None,
            })
            .collect()
    }

    pub fn y_labels(&self) -> Vec<TickLabel> {
        let left = self.plot.x;
        self.y_ticks
            .iter()
            .map(|t| {
                let y = t.position + self.title_offset;
                let text = match self.frame.max_label_width {
                    Some(max) => truncate_label(&t.label, max, LABEL_FONT_SIZE),
                    None => t.label.clone(),
                };
                let full = (text != t.label).then(|| t.label.clone());
                TickLabel {
                    tick: GridLine {
                        x1: left - TICK_LENGTH,
                        y1: y,
                        x2: left,
                        y2: y,
                    },
                    x: left - 10.0,
                    y,
                    text,
                    full,
                }
            })
            .collect()
    }

    /// Anchor of the plot title
    pub fn title_anchor(&self) -> (f64, f64) {
        (self.frame.margin.left, self.frame.margin.top + 14.0)
    }

    pub fn x_title_anchor(&self) -> (f64, f64) {
        (self.plot.x + self.plot.width / 2.0, self.total_height - 5.0)
    }

    pub fn y_title_anchor(&self) -> (f64, f64) {
        (self.plot.x - 40.0, self.plot.y + self.plot.height / 2.0)
    }
}

// ============================================================================
// TOOLTIP
// ============================================================================

/// Tooltip text anchored at a pointer position
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub x: f64,
    pub y: f64,
    pub title: String,
    pub details: Vec<String>,
}

impl TooltipContent {
    pub fn new(x: f64, y: f64, title: impl Into<String>) -> Self {
        Self {
            x,
            y,
            title: title.into(),
            details: Vec::new(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn detail(mut self, line: impl Into<String>) -> Self {
        let line = line.into();
        if !line.is_empty() {
            self.details.push(line);
        }
        self
    }
}

// ============================================================================
// COMPONENTS
// ============================================================================

/// Panel around a chart's marks
#[component]
pub fn ChartPanel(
    layout: PanelLayout,
    #[prop(optional)] caption: Option<Caption>,
    #[prop(optional)] legend: Option<AnyView>,
    #[prop(into)] tooltip: Signal<Option<TooltipContent>>,
    #[prop(optional, into)] on_background_tap: Option<Callback<()>>,
    children: Children,
) -> impl IntoView {
    let plot = layout.plot;
    let (title_x, title_y) = layout.title_anchor();
    let (x_title_x, x_title_y) = layout.x_title_anchor();
    let (y_title_x, y_title_y) = layout.y_title_anchor();
    let y_title_rotate = format!("rotate(-90, {}, {})", y_title_x, y_title_y);

    view! {
        <div class="gg-panel" style="position: relative;">
            {caption.map(|c| view! {
                <div class="gg-terminal">
                    {c.lines.into_iter().map(|line| view! {
                        <div class="gg-term-line">
                            <span class="gg-term-prompt">{line.prompt}</span>
                            <span class="gg-term-code">{line.code}</span>
                        </div>
                    }).collect_view()}
                </div>
            })}

            <div style="position: relative;">
                <svg viewBox=layout.viewbox() width="100%" style="display: block;">
                    {layout.frame.title.clone().map(|title| view! {
                        <text x=title_x y=title_y class="gg-plot-title">{title}</text>
                    })}

                    // Panel background
                    <rect
                        x=plot.x
                        y=plot.y
                        width=plot.width
                        height=plot.height
                        fill=colors::PANEL_BG
                        on:click=move |_| {
                            if let Some(cb) = on_background_tap {
                                cb.run(());
                            }
                        }
                    />

                    // Gridlines
                    {layout.y_gridlines().into_iter().map(|g| view! {
                        <line x1=g.x1 y1=g.y1 x2=g.x2 y2=g.y2 stroke=colors::GRID stroke-width="1" />
                    }).collect_view()}
                    {layout.x_gridlines().into_iter().map(|g| view! {
                        <line x1=g.x1 y1=g.y1 x2=g.x2 y2=g.y2 stroke=colors::GRID stroke-width="1" />
                    }).collect_view()}

                    <g transform=layout.marks_transform()>
                        {children()}
                    </g>

                    // Border
                    <rect
                        x=plot.x
                        y=plot.y
                        width=plot.width
                        height=plot.height
                        fill="none"
                        stroke=colors::AXIS
                        stroke-width="1"
                        pointer-events="none"
                    />

                    // X axis
                    {layout.x_labels().into_iter().map(|l| view! {
                        <g>
                            <line x1=l.tick.x1 y1=l.tick.y1 x2=l.tick.x2 y2=l.tick.y2 stroke=colors::AXIS />
                            <text x=l.x y=l.y text-anchor="middle" class="gg-axis-label">{l.text}</text>
                        </g>
                    }).collect_view()}

                    // Y axis
                    {layout.y_labels().into_iter().map(|l| view! {
                        <g>
                            <line x1=l.tick.x1 y1=l.tick.y1 x2=l.tick.x2 y2=l.tick.y2 stroke=colors::AXIS />
                            <text
                                x=l.x
                                y=l.y
                                text-anchor="end"
                                dominant-baseline="central"
                                class="gg-axis-label"
                            >
                                {l.full.map(|full| view! { <title>{full}</title> })}
                                {l.text}
                            </text>
                        </g>
                    }).collect_view()}

                    {layout.frame.x_label.clone().map(|label| view! {
                        <text x=x_title_x y=x_title_y text-anchor="middle" class="gg-axis-title">
                            {label}
                        </text>
                    })}
                    {layout.frame.y_label.clone().map(|label| view! {
                        <text
                            x=y_title_x
                            y=y_title_y
                            text-anchor="middle"
                            class="gg-axis-title"
                            transform=y_title_rotate
                        >
                            {label}
                        </text>
                    })}
                </svg>

                {move || tooltip.get().map(|t| view! {
                    <div class="gg-tooltip" style=format!("left: {}px; top: {}px;", t.x, t.y)>
                        <div class="gg-tooltip-title">{t.title}</div>
                        {t.details.into_iter().map(|d| view! {
                            <div class="gg-tooltip-detail">{d}</div>
                        }).collect_view()}
                    </div>
                })}
            </div>

            {legend.map(|legend| view! { <div class="gg-legend">{legend}</div> })}
        </div>
    }
}

/// One legend swatch
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    /// SVG path for a shaped swatch; a plain round or square chip otherwise
    pub shape: Option<String>,
}

impl LegendEntry {
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            shape: None,
        }
    }

    pub fn shaped(mut self, path: String) -> Self {
        self.shape = Some(path);
        self
    }
}

/// Legend row: heading followed by swatches
#[component]
pub fn Legend(
    #[prop(into)] heading: String,
    entries: Vec<LegendEntry>,
    #[prop(optional)] round: bool,
) -> impl IntoView {
    let radius = if round { "50%" } else { "2px" };

    view! {
        <div class="gg-legend-items">
            <span class="gg-legend-heading">{heading}</span>
            {entries.into_iter().map(|entry| {
                let swatch = match entry.shape {
                    Some(path) => view! {
                        <svg class="gg-legend-shape" viewBox="-6 -6 12 12" width="12" height="12">
                            <path d=path fill=colors::TEXT_MUTED stroke=colors::TEXT_MUTED />
                        </svg>
                    }.into_any(),
                    None => view! {
                        <span
                            class="gg-legend-swatch"
                            style=format!("background: {}; border-radius: {};", entry.color, radius)
                        />
                    }.into_any(),
                };
                view! {
                    <span class="gg-legend-item">
                        {swatch}
                        {entry.label}
                    </span>
                }
            }).collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(positions: &[(f64, &str)]) -> Vec<AxisTick> {
        positions
            .iter()
            .map(|&(position, label)| AxisTick {
                position,
                label: label.to_string(),
            })
            .collect()
    }

    fn frame() -> PanelFrame {
        PanelFrame::new(ChartDimensions::new(800.0, 300.0))
    }

    #[test]
    fn test_caption_lines() {
        let caption = Caption::parse(
            r#"ggplot(works, aes(x = year, fill = type)) + geom_dotplot() + ggtitle("Publications")"#,
        );
        assert_eq!(caption.lines.len(), 3);
        assert_eq!(caption.lines[0].prompt, "> ");
        assert_eq!(caption.lines[0].code, "ggplot(works, aes(x = year, fill = type))");
        assert_eq!(caption.lines[1].prompt, "  ");
        assert_eq!(caption.lines[1].code, "+ geom_dotplot()");
        assert_eq!(caption.lines[2].code, r#"+ ggtitle("Publications")"#);
        assert_eq!(caption.title.as_deref(), Some("Publications"));
    }

    #[test]
    fn test_caption_title_variants() {
        assert_eq!(Caption::parse("ggtitle('Stack Exchange')").title.as_deref(), Some("Stack Exchange"));
        assert_eq!(Caption::parse("ggplot(x) + geom_point()").title, None);
        assert_eq!(Caption::parse(r#"ggtitle("")"#).title, None);
        assert_eq!(Caption::parse("ggtitle(title)").title, None);
    }

    #[test]
    fn test_truncate_label() {
        // 10px font: 5.8px per char, 60px fits 10 chars
        assert_eq!(truncate_label("short", 60.0, 10.0), "short");
        assert_eq!(truncate_label("exactly10c", 60.0, 10.0), "exactly10c");
        assert_eq!(truncate_label("eleven char", 60.0, 10.0), "eleven ch\u{2026}");
        assert_eq!(truncate_label("anything", 1.0, 10.0), "a\u{2026}");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_label("Universität Zürich", 40.0, 10.0), "Unive\u{2026}");
    }

    #[test]
    fn test_plot_rect_without_title() {
        let layout = PanelLayout::new(frame(), vec![], vec![]);
        assert_eq!(layout.title_offset, 0.0);
        assert_eq!(layout.total_height, 300.0);
        assert_eq!(
            layout.plot,
            PlotRect {
                x: 160.0,
                y: 10.0,
                width: 610.0,
                height: 240.0
            }
        );
        assert_eq!(layout.viewbox(), "0 0 800 300");
    }

    #[test]
    fn test_title_adds_offset() {
        let layout = PanelLayout::new(frame().title(Some("Experience".into())), vec![], vec![]);
        assert_eq!(layout.title_offset, 22.0);
        assert_eq!(layout.total_height, 322.0);
        assert_eq!(layout.plot.y, 32.0);
        assert_eq!(layout.plot.height, 240.0);
        assert_eq!(layout.marks_transform(), "translate(0, 22)");
    }

    #[test]
    fn test_gridlines_align_with_labels() {
        let x = ticks(&[(160.0, "2018"), (363.3, "2019"), (770.0, "2021")]);
        let y = ticks(&[(250.0, "0"), (130.0, "1"), (10.0, "2")]);
        let layout = PanelLayout::new(frame().title(Some("t".into())), x, y);

        let xg = layout.x_gridlines();
        let xl = layout.x_labels();
        assert_eq!(xg.len(), xl.len());
        for (g, l) in xg.iter().zip(&xl) {
            assert_eq!(g.x1, l.x);
            assert_eq!(g.x1, l.tick.x1);
            assert_eq!(g.y1, layout.plot.y);
            assert_eq!(g.y2, layout.plot.bottom());
        }

        let yg = layout.y_gridlines();
        let yl = layout.y_labels();
        assert_eq!(yg.len(), yl.len());
        for (g, l) in yg.iter().zip(&yl) {
            assert_eq!(g.y1, l.y);
            assert_eq!(g.y1, l.tick.y1);
            assert_eq!(g.x1, layout.plot.x);
            assert_eq!(g.x2, layout.plot.right());
        }
        assert_eq!(yg[0].y1, 272.0);
    }

    #[test]
    fn test_y_labels_truncate_with_full_text() {
        let y = ticks(&[(100.0, "Senior Research Engineer"), (200.0, "Intern")]);
        let layout = PanelLayout::new(frame().max_label_width(65.0), vec![], y);
        let labels = layout.y_labels();

        assert_eq!(labels[0].text, "Senior Res\u{2026}");
        assert_eq!(labels[0].full.as_deref(), Some("Senior Research Engineer"));
        assert_eq!(labels[1].text, "Intern");
        assert_eq!(labels[1].full, None);
    }

    #[test]
    fn test_tooltip_skips_empty_details() {
        let t = TooltipContent::new(1.0, 2.0, "Paper").detail("").detail("2020 · article");
        assert_eq!(t.details, vec!["2020 · article".to_string()]);
    }
}
