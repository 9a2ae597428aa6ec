//! Education lollipop chart
//!
//! One point per degree at its completion year, colored by degree and shaped
//! by institution, with a dashed stem back to the y axis.

use folio_core::{Education, EducationPlot, IntegerFormatter};
use leptos::{html, prelude::*};

use crate::{
    ACTIVE_OPACITY, Caption, CategoricalScale, ChartHover, ChartPanel, ChartSize, ChartSizeConfig,
    DIMMED_OPACITY, Legend, LegendEntry, MarkerShape, PanelFrame, PanelLayout, TooltipContent,
    chartkit::Scale, fitted_height, linear_scale, resolve_categories, resolve_ticks,
    use_chart_hover, use_chart_size, whole_ticks,
};

const CAPTION: &str = r#"ggplot(education, aes(x = year, y = degree, color = degree, shape = institution)) + geom_point(size = 4) + ggtitle("Education")"#;

/// Education chart configuration
#[derive(Debug, Clone)]
pub struct EducationChartConfig {
    pub marker_size: f64,
    pub row_height: f64,
    pub min_height: f64,
    pub x_tick_count: usize,
    pub stem_opacity: f64,
    pub stem_dimmed_opacity: f64,
    pub size: ChartSizeConfig,
}

impl Default for EducationChartConfig {
    fn default() -> Self {
        Self {
            marker_size: 8.0,
            row_height: 50.0,
            min_height: 180.0,
            x_tick_count: 6,
            stem_opacity: 0.5,
            stem_dimmed_opacity: 0.15,
            size: ChartSizeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointMark {
    pub key: usize,
    pub cx: f64,
    pub cy: f64,
    /// x where the stem starts (left edge of the plot)
    pub stem_x: f64,
    pub color: String,
    pub shape: MarkerShape,
    pub tooltip: TooltipContent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EducationScene {
    pub panel: PanelLayout,
    pub points: Vec<PointMark>,
    pub degree_legend: Vec<LegendEntry>,
    pub institution_legend: Vec<LegendEntry>,
}

impl EducationScene {
    pub fn build(plot: &EducationPlot, size: &ChartSize, config: &EducationChartConfig) -> Self {
        let height = fitted_height(plot.degrees.len(), config.row_height, &size.margin, config.min_height);
        let dims = size.dimensions(height);
        let (top, bottom) = dims.y_range();
        let (left, right) = dims.x_range();

        let x_scale = linear_scale(plot.x_domain, (left, right));
        let y_scale = CategoricalScale::vertical(&plot.degrees, top, bottom);

        let points = plot
            .points
            .iter()
            .enumerate()
            .filter_map(|(key, point)| {
                let education = plot.education(point);
                let cy = y_scale
                    .position(&education.role)
                    .inspect_err(|e| tracing::error!("Education point skipped: {}", e))
                    .ok()?;

                Some(PointMark {
                    key,
                    cx: x_scale.scale(f64::from(point.year)),
                    cy,
                    stem_x: left,
                    color: plot.color_of(&education.role),
                    shape: MarkerShape::for_index(plot.org_index(&education.org)),
                    tooltip: TooltipContent::new(0.0, 0.0, education.role.clone())
                        .detail(education.org.clone())
                        .detail(point.year.to_string()),
                })
            })
            .collect();

        let degree_legend = plot
            .degrees
            .iter()
            .map(|d| LegendEntry::new(d.clone(), plot.color_of(d)))
            .collect();
        let institution_legend = plot
            .orgs
            .iter()
            .enumerate()
            .map(|(i, org)| {
                LegendEntry::new(org.clone(), crate::colors::TEXT_MUTED)
                    .shaped(MarkerShape::for_index(i).path(5.0))
            })
            .collect();

        let x_ticks = resolve_ticks(
            &x_scale,
            &whole_ticks(plot.x_domain.0, plot.x_domain.1, config.x_tick_count),
            &IntegerFormatter,
        );

        let frame = PanelFrame::new(dims)
            .title(Caption::parse(CAPTION).title)
            .x_label("Year")
            .max_label_width(size.max_label_width);

        Self {
            panel: PanelLayout::new(frame, x_ticks, resolve_categories(&y_scale)),
            points,
            degree_legend,
            institution_legend,
        }
    }
}

/// Education chart component
#[component]
pub fn EducationChart(
    #[prop(into)] educations: Signal<Vec<Education>>,
    #[prop(optional)] config: Option<EducationChartConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let container = NodeRef::<html::Div>::new();
    let size = use_chart_size(container, config.size);
    let hover: ChartHover<usize> = use_chart_hover();
    hover.reset_on(educations);
    let style = (
        config.marker_size,
        config.stem_opacity,
        config.stem_dimmed_opacity,
    );

    let scene = move || {
        let plot = educations.with(|e| EducationPlot::new(e));
        EducationScene::build(&plot, &size.get(), &config)
    };

    view! {
        <div node_ref=container class="gg-chart education-chart">
            {move || render_scene(scene(), hover, style)}
        </div>
    }
}

fn render_scene(
    scene: EducationScene,
    hover: ChartHover<usize>,
    (marker_size, stem_opacity, stem_dimmed): (f64, f64, f64),
) -> impl IntoView {
    let tips: Vec<TooltipContent> = scene.points.iter().map(|p| p.tooltip.clone()).collect();
    let tooltip = hover.tooltip(move |key| tips.get(*key).cloned());

    let legend = view! {
        <div class="gg-legend-rows">
            <Legend heading="Degree" entries=scene.degree_legend round=true />
            <Legend heading="Institution" entries=scene.institution_legend />
        </div>
    }
    .into_any();

    view! {
        <ChartPanel
            layout=scene.panel
            caption=Caption::parse(CAPTION)
            legend=legend
            tooltip=tooltip
            on_background_tap=Callback::new(move |_: ()| hover.clear())
        >
            {scene.points.into_iter().map(|point| {
                let key = point.key;
                let binding = hover.bind(key, None);
                let (enter, leave, track, click) =
                    (binding.clone(), binding.clone(), binding.clone(), binding);
                let marker = point.shape.path(marker_size);
                let stroke_width = if point.shape.is_stroked() { "3" } else { "1" };
                let (fill, stroke, stem) = (point.color.clone(), point.color.clone(), point.color);

                view! {
                    <g
                        fill=fill
                        stroke=stroke
                        opacity=move || hover.opacity_for(&key, ACTIVE_OPACITY, DIMMED_OPACITY)
                        on:mouseenter=move |_| enter.enter()
                        on:mouseleave=move |_| leave.leave()
                        on:mousemove=move |ev| track.track(&ev)
                        on:click=move |ev| click.click(&ev)
                    >
                        <line
                            x1=point.stem_x
                            y1=point.cy
                            x2=point.cx
                            y2=point.cy
                            stroke=stem
                            stroke-width="2"
                            stroke-dasharray="4,3"
                            opacity=move || hover.opacity_for(&key, stem_opacity, stem_dimmed)
                        />
                        <path
                            d=marker
                            transform=format!("translate({}, {})", point.cx, point.cy)
                            stroke-width=stroke_width
                        />
                    </g>
                }
            }).collect_view()}
        </ChartPanel>
    }
}
