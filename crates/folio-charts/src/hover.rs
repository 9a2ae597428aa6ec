//! Hover and tap interaction
//!
//! Mouse hover and touch taps share one notion of the "active mark". On touch
//! devices the first tap on a linked mark reveals its tooltip instead of
//! following the link; a second tap on the same mark follows it.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

use crate::TooltipContent;

// ============================================================================
// STATE MACHINE
// ============================================================================

/// Which mark, if any, is active and why
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HoverPhase<K> {
    #[default]
    Idle,
    Hovered(K),
    Tapped(K),
}

impl<K> HoverPhase<K> {
    pub fn key(&self) -> Option<&K> {
        match self {
            Self::Idle => None,
            Self::Hovered(k) | Self::Tapped(k) => Some(k),
        }
    }
}

/// Pointer position relative to the chart's SVG
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPixel {
    pub x: f64,
    pub y: f64,
}

impl PointerPixel {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What the host should do after a click or tap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// Open this link
    Navigate(String),
    /// Keep the page; the tapped mark's tooltip is now showing
    RevealTooltip,
    /// Nothing to do
    Ignored,
}

/// Interaction state of one chart instance
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState<K> {
    pub phase: HoverPhase<K>,
    pub pointer: PointerPixel,
}

impl<K: Clone + PartialEq> InteractionState<K> {
    pub fn new() -> Self {
        Self {
            phase: HoverPhase::Idle,
            pointer: PointerPixel::default(),
        }
    }

    pub fn active_key(&self) -> Option<&K> {
        self.phase.key()
    }

    /// Pointer entered a mark. Re-entering the mark that is already tapped
    /// keeps it tapped, so the follow-up tap still navigates.
    pub fn pointer_enter(&mut self, key: K) {
        if self.phase == HoverPhase::Tapped(key.clone()) {
            return;
        }
        self.phase = HoverPhase::Hovered(key);
    }

    /// Pointer left the active mark
    pub fn pointer_leave(&mut self) {
        self.phase = HoverPhase::Idle;
    }

    /// Pointer moved; only the tooltip anchor changes
    pub fn pointer_move(&mut self, pointer: PointerPixel) {
        self.pointer = pointer;
    }

    /// Click (desktop) or tap (touch) on a mark
    pub fn tap(&mut self, key: K, link: Option<&str>, touch: bool) -> TapOutcome {
        if !touch {
            return link.map_or(TapOutcome::Ignored, |l| TapOutcome::Navigate(l.to_string()));
        }

        if self.phase == HoverPhase::Tapped(key.clone()) {
            return link.map_or(TapOutcome::Ignored, |l| TapOutcome::Navigate(l.to_string()));
        }

        self.phase = HoverPhase::Tapped(key);
        TapOutcome::RevealTooltip
    }

    /// Tap outside every mark
    pub fn tap_elsewhere(&mut self) {
        self.phase = HoverPhase::Idle;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// ============================================================================
// LEPTOS INTEGRATION
// ============================================================================

/// Opacity of active (or undimmed) marks
pub const ACTIVE_OPACITY: f64 = 1.0;
/// Opacity of marks while another mark is active
pub const DIMMED_OPACITY: f64 = 0.4;

/// Reactive hover controller owned by one chart
pub struct ChartHover<K: Send + Sync + 'static> {
    state: RwSignal<InteractionState<K>>,
    touch: bool,
}

impl<K: Send + Sync + 'static> Clone for ChartHover<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Send + Sync + 'static> Copy for ChartHover<K> {}

impl<K> ChartHover<K>
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(touch: bool) -> Self {
        Self {
            state: RwSignal::new(InteractionState::new()),
            touch,
        }
    }

    /// Active mark key (tracked)
    pub fn active_key(&self) -> Option<K> {
        self.state.with(|s| s.active_key().cloned())
    }

    /// Tooltip anchor (tracked)
    pub fn pointer(&self) -> PointerPixel {
        self.state.with(|s| s.pointer)
    }

    pub fn is_active(&self, key: &K) -> bool {
        self.state.with(|s| s.active_key() == Some(key))
    }

    /// `active` for the active mark or when nothing is active, else `dimmed`
    pub fn opacity_for(&self, key: &K, active: f64, dimmed: f64) -> f64 {
        self.state.with(|s| match s.active_key() {
            None => active,
            Some(k) if k == key => active,
            Some(_) => dimmed,
        })
    }

    /// Opacity for marks that never become active themselves
    pub fn background_opacity(&self, active: f64, dimmed: f64) -> f64 {
        self.state.with(|s| if s.active_key().is_some() { dimmed } else { active })
    }

    /// Event handlers for one mark
    pub fn bind(&self, key: K, link: Option<String>) -> MarkBinding<K> {
        MarkBinding {
            hover: *self,
            key,
            link,
        }
    }

    /// Tap on the chart background
    pub fn clear(&self) {
        self.state.update(|s| s.tap_elsewhere());
    }

    /// Drop the active mark and pointer; mark keys are stale once the
    /// dataset changes
    pub fn reset(&self) {
        self.state.update(|s| s.reset());
    }

    /// Reset whenever `source` changes
    pub fn reset_on<T>(&self, source: Signal<T>)
    where
        T: Send + Sync + 'static,
    {
        let hover = *self;
        Effect::new(move |_| {
            source.track();
            hover.reset();
        });
    }

    /// Tooltip for the active mark, anchored at the pointer
    pub fn tooltip<F>(&self, content: F) -> Signal<Option<TooltipContent>>
    where
        F: Fn(&K) -> Option<TooltipContent> + Send + Sync + 'static,
    {
        let hover = *self;
        Signal::derive(move || {
            let key = hover.active_key()?;
            let pointer = hover.pointer();
            content(&key).map(|t| t.at(pointer.x, pointer.y))
        })
    }
}

/// Hover controller for a chart, with touch support detected from the window
pub fn use_chart_hover<K>() -> ChartHover<K>
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    ChartHover::new(is_touch_device())
}

/// Handlers binding a mark's identity and link into the controller
#[derive(Clone)]
pub struct MarkBinding<K: Send + Sync + 'static> {
    hover: ChartHover<K>,
    key: K,
    link: Option<String>,
}

impl<K> MarkBinding<K>
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn enter(&self) {
        let key = self.key.clone();
        self.hover.state.update(|s| s.pointer_enter(key));
    }

    pub fn leave(&self) {
        self.hover.state.update(|s| s.pointer_leave());
    }

    pub fn track(&self, ev: &MouseEvent) {
        if let Some(pointer) = pointer_in_svg(ev) {
            self.hover.state.update(|s| s.pointer_move(pointer));
        }
    }

    /// Click handler: runs the tap transition and performs the outcome
    pub fn click(&self, ev: &MouseEvent) {
        let key = self.key.clone();
        let link = self.link.clone();
        let touch = self.hover.touch;

        let mut outcome = TapOutcome::Ignored;
        self.hover.state.update(|s| {
            outcome = s.tap(key, link.as_deref(), touch);
            if outcome == TapOutcome::RevealTooltip {
                if let Some(pointer) = pointer_in_svg(ev) {
                    s.pointer_move(pointer);
                }
            }
        });

        match outcome {
            TapOutcome::Navigate(url) => open_link(&url),
            TapOutcome::RevealTooltip => ev.prevent_default(),
            TapOutcome::Ignored => {}
        }
    }
}

/// Pointer position relative to the closest enclosing `<svg>`
fn pointer_in_svg(ev: &MouseEvent) -> Option<PointerPixel> {
    let target = ev.current_target()?.dyn_into::<Element>().ok()?;
    let svg = target.closest("svg").ok()??;
    let rect = svg.get_bounding_client_rect();
    Some(PointerPixel::new(
        f64::from(ev.client_x()) - rect.left(),
        f64::from(ev.client_y()) - rect.top(),
    ))
}

fn is_touch_device() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let has_touch_events =
        js_sys::Reflect::has(&window, &wasm_bindgen::JsValue::from_str("ontouchstart")).unwrap_or(false);
    has_touch_events || window.navigator().max_touch_points() > 0
}

fn open_link(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.open_with_url_and_target_and_features(url, "_blank", "noopener") {
        tracing::warn!("Failed to open {}: {:?}", url, e);
    }
}
