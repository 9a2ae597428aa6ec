//! Publication dot plot
//!
//! One dot per publication, stacked by year and filled by work type. Clicking
//! a dot opens its DOI.

use folio_core::{IntegerFormatter, Publication, PublicationPlot};
use leptos::{html, prelude::*};

use crate::{
    AxisTick, Caption, ChartHover, ChartPanel, ChartSize, ChartSizeConfig, Legend, LegendEntry,
    PanelFrame, PanelLayout, TooltipContent, chartkit::Scale, fitted_height, linear_scale,
    resolve_ticks, use_chart_hover, use_chart_size, whole_ticks,
};

const CAPTION: &str =
    r#"ggplot(works, aes(x = year, fill = type)) + geom_dotplot() + ggtitle("Publications")"#;

/// Publication chart configuration
#[derive(Debug, Clone)]
pub struct PublicationChartConfig {
    pub dot_radius: f64,
    /// Vertical space per stacked dot
    pub row_height: f64,
    pub min_height: f64,
    pub x_tick_count: usize,
    pub y_tick_count: usize,
    pub opacity: f64,
    pub dimmed_opacity: f64,
    pub size: ChartSizeConfig,
}

impl Default for PublicationChartConfig {
    fn default() -> Self {
        Self {
            dot_radius: 10.0,
            row_height: 28.0,
            min_height: 300.0,
            x_tick_count: 8,
            y_tick_count: 5,
            opacity: 0.85,
            dimmed_opacity: 0.35,
            size: ChartSizeConfig::default(),
        }
    }
}

/// A dot ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DotMark {
    /// Position in `PublicationPlot::dots`; the hover key
    pub key: usize,
    pub cx: f64,
    pub cy: f64,
    pub fill: String,
    pub link: Option<String>,
    pub tooltip: TooltipContent,
}

/// Resolved geometry of the publication chart at one width
#[derive(Debug, Clone, PartialEq)]
pub struct PublicationScene {
    pub panel: PanelLayout,
    pub dots: Vec<DotMark>,
    pub legend: Vec<LegendEntry>,
}

impl PublicationScene {
    pub fn build(plot: &PublicationPlot, size: &ChartSize, config: &PublicationChartConfig) -> Self {
        let height = fitted_height(
            plot.max_stack as usize,
            config.row_height,
            &size.margin,
            config.min_height,
        );
        let dims = size.dimensions(height);
        let (x0, x1) = dims.x_range();
        let (y_top, y_bottom) = dims.y_range();

        let x_scale = linear_scale(plot.x_domain, (x0, x1));
        let y_max = f64::from(plot.max_stack) + 1.0;
        let y_scale = linear_scale((0.0, y_max), (y_bottom, y_top));

        let x_ticks: Vec<AxisTick> = resolve_ticks(
            &x_scale,
            &whole_ticks(plot.x_domain.0, plot.x_domain.1, config.x_tick_count),
            &IntegerFormatter,
        );
        let y_ticks: Vec<AxisTick> = resolve_ticks(
            &y_scale,
            &whole_ticks(0.0, y_max, config.y_tick_count),
            &IntegerFormatter,
        );

        let dots = plot
            .dots
            .iter()
            .enumerate()
            .map(|(key, dot)| {
                let publication = plot.publication(dot);
                DotMark {
                    key,
                    cx: x_scale.scale(f64::from(dot.year)),
                    cy: y_scale.scale(f64::from(dot.stack_index)),
                    fill: plot.color_of(&publication.kind),
                    link: publication.doi_url.clone(),
                    tooltip: TooltipContent::new(0.0, 0.0, publication.title.clone())
                        .detail(publication.journal.clone())
                        .detail(format!("{} \u{00B7} {}", dot.year, publication.kind)),
                }
            })
            .collect();

        let legend = plot
            .kinds
            .iter()
            .map(|kind| LegendEntry::new(kind.clone(), plot.color_of(kind)))
            .collect();

        let frame = PanelFrame::new(dims)
            .title(Caption::parse(CAPTION).title)
            .x_label("Publication Year")
            .y_label("Count")
            .max_label_width(size.max_label_width);

        Self {
            panel: PanelLayout::new(frame, x_ticks, y_ticks),
            dots,
            legend,
        }
    }
}

/// Publication dot plot component
#[component]
pub fn PublicationChart(
    #[prop(into)] publications: Signal<Vec<Publication>>,
    #[prop(optional)] config: Option<PublicationChartConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let container = NodeRef::<html::Div>::new();
    let size = use_chart_size(container, config.size);
    let hover: ChartHover<usize> = use_chart_hover();
    hover.reset_on(publications);
    let (radius, opacity, dimmed) = (config.dot_radius, config.opacity, config.dimmed_opacity);

    let scene = move || {
        let plot = publications.with(|p| PublicationPlot::from_publications(p));
        PublicationScene::build(&plot, &size.get(), &config)
    };

    view! {
        <div node_ref=container class="gg-chart publication-chart">
            {move || render_scene(scene(), hover, radius, opacity, dimmed)}
        </div>
    }
}

fn render_scene(
    scene: PublicationScene,
    hover: ChartHover<usize>,
    radius: f64,
    opacity: f64,
    dimmed: f64,
) -> impl IntoView {
    let tips: Vec<TooltipContent> = scene.dots.iter().map(|d| d.tooltip.clone()).collect();
    let tooltip = hover.tooltip(move |key| tips.get(*key).cloned());

    let legend = view! { <Legend heading="type" entries=scene.legend round=true /> }.into_any();

    view! {
        <ChartPanel
            layout=scene.panel
            caption=Caption::parse(CAPTION)
            legend=legend
            tooltip=tooltip
            on_background_tap=Callback::new(move |_: ()| hover.clear())
        >
            {scene.dots.into_iter().map(|dot| {
                let key = dot.key;
                let cursor = if dot.link.is_some() { "cursor: pointer;" } else { "cursor: default;" };
                let binding = hover.bind(key, dot.link);
                let (enter, leave, track, click) =
                    (binding.clone(), binding.clone(), binding.clone(), binding);

                view! {
                    <g
                        style=cursor
                        on:mouseenter=move |_| enter.enter()
                        on:mouseleave=move |_| leave.leave()
                        on:mousemove=move |ev| track.track(&ev)
                        on:click=move |ev| click.click(&ev)
                    >
                        <circle
                            cx=dot.cx
                            cy=dot.cy
                            r=radius
                            fill=dot.fill
                            opacity=move || hover.opacity_for(&key, opacity, dimmed)
                            stroke=move || if hover.is_active(&key) { crate::colors::HIGHLIGHT } else { "none" }
                            stroke-width="1.5"
                        />
                    </g>
                }
            }).collect_view()}
        </ChartPanel>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SizeNegotiator;

    fn size_at(width: f64) -> ChartSize {
        SizeNegotiator::new(ChartSizeConfig::default()).layout_for(width)
    }

    fn sample() -> Vec<Publication> {
        vec![
            Publication::new(2020, "journal article", "A").with_doi("https://doi.org/10.1/a"),
            Publication::new(2019, "conference paper", "B"),
            Publication::new(2020, "journal article", "C"),
        ]
    }

    #[test]
    fn test_scene_dots_stack_upwards() {
        let plot = PublicationPlot::from_publications(&sample());
        let scene = PublicationScene::build(&plot, &size_at(800.0), &PublicationChartConfig::default());

        assert_eq!(scene.dots.len(), 3);
        let (a, b, c) = (&scene.dots[0], &scene.dots[1], &scene.dots[2]);
        assert_eq!(a.cx, c.cx);
        assert!(c.cy < a.cy, "second 2020 dot sits above the first");
        assert!(b.cx < a.cx);
        assert_eq!(a.link.as_deref(), Some("https://doi.org/10.1/a"));
        assert_eq!(b.link, None);
        assert_ne!(a.fill, b.fill);
        assert_eq!(a.fill, c.fill);
    }

    #[test]
    fn test_scene_height_and_axes() {
        let plot = PublicationPlot::from_publications(&sample());
        let scene = PublicationScene::build(&plot, &size_at(800.0), &PublicationChartConfig::default());

        assert_eq!(scene.panel.frame.height, 300.0);
        let years: Vec<&str> = scene.panel.x_ticks().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(years, ["2018", "2019", "2020", "2021"]);
        let counts: Vec<&str> = scene.panel.y_ticks().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(counts, ["0", "1", "2", "3"]);
    }

    #[test]
    fn test_scene_tooltip_and_legend() {
        let plot = PublicationPlot::from_publications(&sample());
        let scene = PublicationScene::build(&plot, &size_at(800.0), &PublicationChartConfig::default());

        let tip = &scene.dots[0].tooltip;
        assert_eq!(tip.title, "A");
        assert_eq!(tip.details, vec!["2020 \u{00B7} journal article".to_string()]);

        let legend: Vec<&str> = scene.legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(legend, ["journal article", "conference paper"]);
    }

    #[test]
    fn test_empty_scene_still_has_axes() {
        let plot = PublicationPlot::from_publications(&[]);
        let scene = PublicationScene::build(&plot, &size_at(500.0), &PublicationChartConfig::default());

        assert!(scene.dots.is_empty());
        assert!(!scene.panel.x_ticks().is_empty());
        assert!(!scene.panel.y_ticks().is_empty());
        assert!(scene.panel.plot.width > 0.0);
    }
}
