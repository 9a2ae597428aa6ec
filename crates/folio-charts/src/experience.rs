//! Experience timeline
//!
//! One horizontal bar per role, from start to end date, filled by
//! organization. Ongoing roles run to the current date.

use folio_core::{Affiliation, IntegerFormatter, TimelinePlot, fractional_year_now};
use leptos::{html, prelude::*};

use crate::{
    ACTIVE_OPACITY, Caption, CategoricalScale, ChartHover, ChartPanel, ChartSize, ChartSizeConfig,
    DIMMED_OPACITY, Legend, LegendEntry, PanelFrame, PanelLayout, TooltipContent, chartkit::Scale,
    fitted_height, linear_scale, resolve_categories, resolve_ticks, use_chart_hover,
    use_chart_size, whole_ticks,
};

const CAPTION: &str = r#"ggplot(experience, aes(x = year, y = role, fill = org)) + geom_segment() + ggtitle("Experience")"#;

/// Experience chart configuration
#[derive(Debug, Clone)]
pub struct ExperienceChartConfig {
    pub bar_height: f64,
    /// Bars narrower than this are widened so they stay visible
    pub min_bar_width: f64,
    pub row_height: f64,
    pub min_height: f64,
    pub x_tick_count: usize,
    pub size: ChartSizeConfig,
}

impl Default for ExperienceChartConfig {
    fn default() -> Self {
        Self {
            bar_height: 22.0,
            min_bar_width: 3.0,
            row_height: 40.0,
            min_height: 300.0,
            x_tick_count: 6,
            size: ChartSizeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarMark {
    pub key: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub tooltip: TooltipContent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceScene {
    pub panel: PanelLayout,
    pub bars: Vec<BarMark>,
    pub legend: Vec<LegendEntry>,
}

impl ExperienceScene {
    pub fn build(plot: &TimelinePlot, size: &ChartSize, config: &ExperienceChartConfig) -> Self {
        let height = fitted_height(plot.roles.len(), config.row_height, &size.margin, config.min_height);
        let dims = size.dimensions(height);
        let (top, bottom) = dims.y_range();

        let x_scale = linear_scale(plot.x_domain, dims.x_range());
        let y_scale = CategoricalScale::vertical(&plot.roles, top, bottom);

        let bars = plot
            .bars
            .iter()
            .enumerate()
            .filter_map(|(key, bar)| {
                let affiliation = plot.affiliation(bar);
                let y = match y_scale.position(&affiliation.title) {
                    Ok(y) => y,
                    Err(e) => {
                        tracing::error!("Experience bar skipped: {}", e);
                        return None;
                    }
                };
                let x0 = x_scale.scale(bar.start_value);
                let x1 = x_scale.scale(bar.end_value);

                Some(BarMark {
                    key,
                    x: x0,
                    y: y - config.bar_height / 2.0,
                    width: (x1 - x0).max(config.min_bar_width),
                    height: config.bar_height,
                    fill: plot.color_of(&affiliation.org),
                    tooltip: TooltipContent::new(0.0, 0.0, affiliation.title.clone())
                        .detail(affiliation.org.clone())
                        .detail(affiliation.period_label()),
                })
            })
            .collect();

        let x_ticks = resolve_ticks(
            &x_scale,
            &whole_ticks(plot.x_domain.0, plot.x_domain.1, config.x_tick_count),
            &IntegerFormatter,
        );

        let legend = plot
            .orgs
            .iter()
            .map(|org| LegendEntry::new(org.clone(), plot.color_of(org)))
            .collect();

        let frame = PanelFrame::new(dims)
            .title(Caption::parse(CAPTION).title)
            .x_label("Year")
            .max_label_width(size.max_label_width);

        Self {
            panel: PanelLayout::new(frame, x_ticks, resolve_categories(&y_scale)),
            bars,
            legend,
        }
    }
}

/// Experience timeline component
#[component]
pub fn ExperienceChart(
    #[prop(into)] experience: Signal<Vec<Affiliation>>,
    #[prop(optional)] config: Option<ExperienceChartConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let container = NodeRef::<html::Div>::new();
    let size = use_chart_size(container, config.size);
    let hover: ChartHover<usize> = use_chart_hover();
    hover.reset_on(experience);

    let scene = move || {
        let plot = experience.with(|e| TimelinePlot::new(e, fractional_year_now()));
        ExperienceScene::build(&plot, &size.get(), &config)
    };

    view! {
        <div node_ref=container class="gg-chart experience-chart">
            {move || render_scene(scene(), hover)}
        </div>
    }
}

fn render_scene(scene: ExperienceScene, hover: ChartHover<usize>) -> impl IntoView {
    let tips: Vec<TooltipContent> = scene.bars.iter().map(|b| b.tooltip.clone()).collect();
    let tooltip = hover.tooltip(move |key| tips.get(*key).cloned());
    let legend = view! { <Legend heading="org" entries=scene.legend /> }.into_any();

    view! {
        <ChartPanel
            layout=scene.panel
            caption=Caption::parse(CAPTION)
            legend=legend
            tooltip=tooltip
            on_background_tap=Callback::new(move |_: ()| hover.clear())
        >
            {scene.bars.into_iter().map(|bar| {
                let key = bar.key;
                let binding = hover.bind(key, None);
                let (enter, leave, track, click) =
                    (binding.clone(), binding.clone(), binding.clone(), binding);

                view! {
                    <g
                        style="cursor: default;"
                        on:mouseenter=move |_| enter.enter()
                        on:mouseleave=move |_| leave.leave()
                        on:mousemove=move |ev| track.track(&ev)
                        on:click=move |ev| click.click(&ev)
                    >
                        <rect
                            x=bar.x
                            y=bar.y
                            width=bar.width
                            height=bar.height
                            fill=bar.fill
                            rx="2"
                            opacity=move || hover.opacity_for(&key, ACTIVE_OPACITY, DIMMED_OPACITY)
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

    const NOW: f64 = 2024.5;

    fn size_at(width: f64) -> ChartSize {
        SizeNegotiator::new(ChartSizeConfig::default()).layout_for(width)
    }

    fn sample() -> Vec<Affiliation> {
        vec![
            Affiliation::new("Research Engineer", "Lab A", "Mar 2022").ongoing(),
            Affiliation::new("PhD Researcher", "University B", "Sep 2017").ended("Feb 2022"),
            Affiliation::new("Intern", "Lab A", "Jun 2016").ended("Aug 2016"),
        ]
    }

    #[test]
    fn test_first_role_on_top() {
        let plot = TimelinePlot::new(&sample(), NOW);
        let scene = ExperienceScene::build(&plot, &size_at(800.0), &ExperienceChartConfig::default());

        assert_eq!(scene.bars.len(), 3);
        assert!(scene.bars[0].y < scene.bars[1].y);
        assert!(scene.bars[1].y < scene.bars[2].y);

        let labels: Vec<&str> = scene.panel.y_ticks().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["Intern", "PhD Researcher", "Research Engineer"]);
    }

    #[test]
    fn test_bars_span_dates() {
        let plot = TimelinePlot::new(&sample(), NOW);
        let scene = ExperienceScene::build(&plot, &size_at(800.0), &ExperienceChartConfig::default());

        let phd = &scene.bars[1];
        let engineer = &scene.bars[0];
        assert!(phd.x + phd.width <= engineer.x + 1e-9);
        assert_eq!(scene.bars[0].fill, scene.bars[2].fill);
        assert_ne!(scene.bars[0].fill, scene.bars[1].fill);
        // two-month internship still visible
        assert!(scene.bars[2].width >= 3.0);
    }

    #[test]
    fn test_tooltip_period() {
        let plot = TimelinePlot::new(&sample(), NOW);
        let scene = ExperienceScene::build(&plot, &size_at(800.0), &ExperienceChartConfig::default());
        assert_eq!(
            scene.bars[0].tooltip.details,
            vec!["Lab A".to_string(), "Mar 2022 \u{2013} Present".to_string()]
        );
    }

    #[test]
    fn test_axis_years() {
        let plot = TimelinePlot::new(&sample(), NOW);
        let scene = ExperienceScene::build(&plot, &size_at(800.0), &ExperienceChartConfig::default());

        let first = scene.panel.x_ticks().first().map(|t| t.label.clone());
        let last = scene.panel.x_ticks().last().map(|t| t.label.clone());
        assert_eq!(first.as_deref(), Some("2016"));
        assert_eq!(last.as_deref(), Some("2025"));
        assert_eq!(scene.panel.frame.height, 300.0);
    }

    #[test]
    fn test_empty_timeline() {
        let plot = TimelinePlot::new(&[], NOW);
        let scene = ExperienceScene::build(&plot, &size_at(800.0), &ExperienceChartConfig::default());
        assert!(scene.bars.is_empty());
        assert!(scene.panel.y_ticks().is_empty());
        assert!(!scene.panel.x_ticks().is_empty());
    }
}
