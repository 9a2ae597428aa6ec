//! Stacked reputation bars
//!
//! One bar per Q&A site. Each question and answer contributes a segment sized
//! by its estimated reputation; whatever the posts do not explain is drawn as
//! a grey "other" segment at the end.

use folio_core::{
    CompactNumberFormatter, ReputationSite, ReputationWeights, SiteBreakdown, segment_sites,
};
use leptos::{html, prelude::*};

use crate::{
    ACTIVE_OPACITY, Caption, CategoricalScale, ChartHover, ChartPanel, ChartSize, ChartSizeConfig,
    DIMMED_OPACITY, PanelFrame, PanelLayout, TooltipContent, chartkit::Scale, colors,
    fitted_height, linear_scale, nice_ticks, resolve_categories, resolve_ticks, use_chart_hover,
    use_chart_size,
};

const CAPTION: &str = r#"ggplot(stack_exchange, aes(x = reputation, y = site, fill = item)) + geom_col(position = "stack") + ggtitle("Stack Exchange")"#;

/// Segment identity: (site, segment) in scene order
pub type SegmentKey = (usize, usize);

/// Reputation chart configuration
#[derive(Debug, Clone)]
pub struct ReputationChartConfig {
    pub bar_height: f64,
    pub min_segment_width: f64,
    pub row_height: f64,
    pub min_height: f64,
    /// Headroom to the right of the longest bar
    pub x_headroom: f64,
    pub x_tick_count: usize,
    pub size: ChartSizeConfig,
}

impl Default for ReputationChartConfig {
    fn default() -> Self {
        Self {
            bar_height: 24.0,
            min_segment_width: 2.0,
            row_height: 45.0,
            min_height: 200.0,
            x_headroom: 1.1,
            x_tick_count: 5,
            size: ChartSizeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMark {
    pub key: SegmentKey,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub fill: String,
    pub link: Option<String>,
    pub tooltip: TooltipContent,
}

/// Grey remainder of a site's bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualMark {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReputationScene {
    pub panel: PanelLayout,
    pub segments: Vec<SegmentMark>,
    pub residuals: Vec<ResidualMark>,
    pub bar_height: f64,
}

impl ReputationScene {
    pub fn build(sites: &[SiteBreakdown], size: &ChartSize, config: &ReputationChartConfig) -> Self {
        let height = fitted_height(sites.len(), config.row_height, &size.margin, config.min_height);
        let dims = size.dimensions(height);
        let (top, bottom) = dims.y_range();

        // a site's posts can explain more than its total, so the bar ends at the larger
        let max_reputation = sites
            .iter()
            .map(|s| s.total_reputation.max(s.accounted()))
            .max()
            .unwrap_or(0);
        let x_max = if max_reputation > 0 {
            max_reputation as f64 * config.x_headroom
        } else {
            1.0
        };
        let x_scale = linear_scale((0.0, x_max), dims.x_range());
        let y_scale = CategoricalScale::vertical(sites.iter().map(|s| s.site_name.as_str()), top, bottom);

        let total_segments: usize = sites.iter().map(|s| s.segments.len()).sum();
        let mut color_index = 0;
        let mut segments = Vec::with_capacity(total_segments);
        let mut residuals = Vec::new();

        for (si, site) in sites.iter().enumerate() {
            let center = match y_scale.position(&site.site_name) {
                Ok(y) => y,
                Err(e) => {
                    tracing::error!("Reputation bar skipped: {}", e);
                    color_index += site.segments.len();
                    continue;
                }
            };
            let y = center - config.bar_height / 2.0;

            let offsets = site.offsets();
            for (qi, (segment, start)) in site.segments.iter().zip(offsets).enumerate() {
                let x0 = x_scale.scale(start as f64);
                let x1 = x_scale.scale((start + segment.value) as f64);

                let kind = if segment.is_answer { "Answer" } else { "Question" };
                let accepted = if segment.accepted { " (accepted)" } else { "" };

                segments.push(SegmentMark {
                    key: (si, qi),
                    x: x0,
                    y,
                    width: (x1 - x0).max(config.min_segment_width),
                    fill: colors::hue(total_segments, color_index),
                    link: segment.link.clone(),
                    tooltip: TooltipContent::new(0.0, 0.0, segment.label.clone()).detail(format!(
                        "{} \u{00B7} {} rep{}",
                        kind,
                        group_thousands(segment.value),
                        accepted
                    )),
                });
                color_index += 1;
            }

            if site.other_residual > 0 {
                let accounted = site.accounted();
                let x0 = x_scale.scale(accounted as f64);
                let x1 = x_scale.scale((accounted + site.other_residual) as f64);
                residuals.push(ResidualMark {
                    x: x0,
                    y,
                    width: (x1 - x0).max(config.min_segment_width),
                });
            }
        }

        let x_ticks = resolve_ticks(
            &x_scale,
            &nice_ticks(0.0, x_max, config.x_tick_count),
            &CompactNumberFormatter,
        );

        let frame = PanelFrame::new(dims)
            .title(Caption::parse(CAPTION).title)
            .x_label("Reputation")
            .max_label_width(size.max_label_width);

        Self {
            panel: PanelLayout::new(frame, x_ticks, resolve_categories(&y_scale)),
            segments,
            residuals,
            bar_height: config.bar_height,
        }
    }

    fn tooltip_of(&self, key: &SegmentKey) -> Option<TooltipContent> {
        self.segments
            .iter()
            .find(|s| &s.key == key)
            .map(|s| s.tooltip.clone())
    }
}

/// `1234567` as `"1,234,567"`
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Reputation chart component
#[component]
pub fn ReputationChart(
    #[prop(into)] sites: Signal<Vec<ReputationSite>>,
    #[prop(into, optional)] weights: Option<Signal<ReputationWeights>>,
    #[prop(optional)] config: Option<ReputationChartConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let weights = weights.unwrap_or_else(|| Signal::stored(ReputationWeights::default()));
    let container = NodeRef::<html::Div>::new();
    let size = use_chart_size(container, config.size);
    let hover: ChartHover<SegmentKey> = use_chart_hover();
    hover.reset_on(sites);

    let scene = move || {
        let breakdowns = sites.with(|s| segment_sites(s, &weights.get()));
        ReputationScene::build(&breakdowns, &size.get(), &config)
    };

    view! {
        <div node_ref=container class="gg-chart reputation-chart">
            {move || render_scene(scene(), hover)}
        </div>
    }
}

fn render_scene(scene: ReputationScene, hover: ChartHover<SegmentKey>) -> impl IntoView {
    let bar_height = scene.bar_height;
    let lookup = scene.clone();
    let tooltip = hover.tooltip(move |key| lookup.tooltip_of(key));

    view! {
        <ChartPanel
            layout=scene.panel
            caption=Caption::parse(CAPTION)
            tooltip=tooltip
            on_background_tap=Callback::new(move |_: ()| hover.clear())
        >
            {scene.segments.into_iter().map(|segment| {
                let key = segment.key;
                let binding = hover.bind(key, segment.link);
                let (enter, leave, track, click) =
                    (binding.clone(), binding.clone(), binding.clone(), binding);

                view! {
                    <rect
                        x=segment.x
                        y=segment.y
                        width=segment.width
                        height=bar_height
                        fill=segment.fill
                        style="cursor: pointer;"
                        opacity=move || hover.opacity_for(&key, ACTIVE_OPACITY, DIMMED_OPACITY)
                        on:mouseenter=move |_| enter.enter()
                        on:mouseleave=move |_| leave.leave()
                        on:mousemove=move |ev| track.track(&ev)
                        on:click=move |ev| click.click(&ev)
                    />
                }
            }).collect_view()}
            {scene.residuals.into_iter().map(|residual| view! {
                <rect
                    x=residual.x
                    y=residual.y
                    width=residual.width
                    height=bar_height
                    fill=colors::RESIDUAL
                    opacity=move || hover.background_opacity(ACTIVE_OPACITY, DIMMED_OPACITY)
                />
            }).collect_view()}
        </ChartPanel>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SizeNegotiator;
    use folio_core::{Post, segment_site};

    fn size_at(width: f64) -> ChartSize {
        SizeNegotiator::new(ChartSizeConfig::default()).layout_for(width)
    }

    fn site(url: &str, reputation: u64, questions: Vec<Post>, answers: Vec<Post>) -> ReputationSite {
        ReputationSite {
            site_url: url.into(),
            reputation,
            questions,
            answers,
        }
    }

    fn breakdowns() -> Vec<SiteBreakdown> {
        let sites = vec![
            site(
                "https://stats.stackexchange.com",
                500,
                vec![Post::scored("Q1", 10)],
                vec![Post::scored("A1", 5).with_link("https://stats.stackexchange.com/a/1")],
            ),
            site("https://stackoverflow.com", 100, vec![Post::scored("Q2", 15)], vec![]),
        ];
        segment_sites(&sites, &ReputationWeights::default())
    }

    #[test]
    fn test_segments_are_contiguous() {
        let scene = ReputationScene::build(&breakdowns(), &size_at(800.0), &ReputationChartConfig::default());
        let stats: Vec<&SegmentMark> = scene.segments.iter().filter(|s| s.key.0 == 1).collect();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].x, scene.panel.plot.x);
        assert!((stats[0].x + stats[0].width - stats[1].x).abs() < 1e-9);
        assert_eq!(stats[1].link.as_deref(), Some("https://stats.stackexchange.com/a/1"));
    }

    #[test]
    fn test_residual_only_when_positive() {
        let scene = ReputationScene::build(&breakdowns(), &size_at(800.0), &ReputationChartConfig::default());
        // stackoverflow: 100 rep, 150 attributed -> no residual; stats: 500 - 150 = 350
        assert_eq!(scene.residuals.len(), 1);
        let stats_last = scene.segments.iter().filter(|s| s.key.0 == 1).last().map(|s| s.x + s.width);
        assert!((scene.residuals[0].x - stats_last.unwrap_or_default()).abs() < 1e-9);
    }

    #[test]
    fn test_overattributed_bar_stays_inside_plot() {
        // 100 rep but the question weighs 150
        let sites = vec![site("https://stackoverflow.com", 100, vec![Post::scored("q", 15)], vec![])];
        let breakdowns = segment_sites(&sites, &ReputationWeights::default());
        let scene = ReputationScene::build(&breakdowns, &size_at(800.0), &ReputationChartConfig::default());

        let plot = scene.panel.plot;
        assert_eq!(scene.segments.len(), 1);
        assert!(scene.residuals.is_empty());
        let seg = &scene.segments[0];
        assert!(seg.x >= plot.x);
        assert!(seg.x + seg.width <= plot.right() + 1e-9);
    }

    #[test]
    fn test_sites_ordered_low_to_high() {
        let scene = ReputationScene::build(&breakdowns(), &size_at(800.0), &ReputationChartConfig::default());
        let names: Vec<&str> = scene.panel.y_ticks().iter().map(|t| t.label.as_str()).collect();
        // bottom to top: highest reputation at the bottom
        assert_eq!(names, ["stats SE", "stackoverflow"]);
    }

    #[test]
    fn test_colors_run_across_sites() {
        let scene = ReputationScene::build(&breakdowns(), &size_at(800.0), &ReputationChartConfig::default());
        let fills: Vec<&str> = scene.segments.iter().map(|s| s.fill.as_str()).collect();
        assert_eq!(fills.len(), 3);
        assert_eq!(fills[0], colors::hue(3, 0));
        assert_eq!(fills[2], colors::hue(3, 2));
    }

    #[test]
    fn test_axis_uses_compact_labels() {
        let big = vec![segment_site(
            &site("https://math.stackexchange.com", 5313, vec![], vec![]),
            &ReputationWeights::default(),
        )];
        let scene = ReputationScene::build(&big, &size_at(800.0), &ReputationChartConfig::default());
        let labels: Vec<&str> = scene.panel.x_ticks().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels.first().copied(), Some("0"));
        assert!(labels.contains(&"1k"));
        assert_eq!(scene.residuals.len(), 1);
    }

    #[test]
    fn test_tooltip_text() {
        let scene = ReputationScene::build(&breakdowns(), &size_at(800.0), &ReputationChartConfig::default());
        let tip = scene.tooltip_of(&(1, 1));
        assert_eq!(tip.map(|t| t.details), Some(vec!["Answer \u{00B7} 50 rep".to_string()]));
        assert_eq!(scene.tooltip_of(&(9, 9)), None);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_empty_sites() {
        let scene = ReputationScene::build(&[], &size_at(800.0), &ReputationChartConfig::default());
        assert!(scene.segments.is_empty());
        assert_eq!(scene.panel.frame.height, 200.0);
        assert!(!scene.panel.x_ticks().is_empty());
    }
}
