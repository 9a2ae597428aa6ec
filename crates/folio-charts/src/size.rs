//! Responsive chart sizing
//!
//! A chart is designed against a fixed base width and margin. The observed
//! container width is clamped, the horizontal margins scale with it, and the
//! left margin doubles as the budget for y-axis labels.

use std::{cell::RefCell, rc::Rc};

use gloo_timers::callback::Timeout;
use leptos::{html, prelude::*};
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{ResizeObserver, ResizeObserverEntry};

use crate::{ChartDimensions, ChartMargin};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Size negotiation configuration.
///
/// Only the horizontal margins scale with width (`left` and `right`, each
/// with its floor). `top` and `bottom` hold the base values at every width,
/// since chart heights are fitted to their row count rather than the width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSizeConfig {
    /// Width the base margin was designed for
    pub base_width: f64,
    pub base_margin: ChartMargin,
    pub min_width: f64,
    pub min_left: f64,
    pub min_right: f64,
    /// Space between the y labels and the plot (tick + padding)
    pub label_gutter: f64,
    /// Settle time before a new width is committed
    pub debounce_ms: u32,
    /// Width changes at or below this many pixels are ignored
    pub noise_threshold: f64,
}

impl Default for ChartSizeConfig {
    fn default() -> Self {
        Self {
            base_width: 800.0,
            base_margin: ChartMargin::standard(),
            min_width: 300.0,
            min_left: 80.0,
            min_right: 15.0,
            label_gutter: 15.0,
            debounce_ms: 300,
            noise_threshold: 1.0,
        }
    }
}

impl ChartSizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(mut self, width: f64, margin: ChartMargin) -> Self {
        self.base_width = width;
        self.base_margin = margin;
        self
    }

    pub fn min_width(mut self, width: f64) -> Self {
        self.min_width = width;
        self
    }

    pub fn floors(mut self, left: f64, right: f64) -> Self {
        self.min_left = left;
        self.min_right = right;
        self
    }

    pub fn noise_threshold(mut self, px: f64) -> Self {
        self.noise_threshold = px;
        self
    }
}

// ============================================================================
// NEGOTIATION
// ============================================================================

/// A committed chart width and the margins derived from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSize {
    pub width: f64,
    pub margin: ChartMargin,
    /// Longest y label, in pixels, before it gets truncated
    pub max_label_width: f64,
}

impl ChartSize {
    pub fn dimensions(&self, height: f64) -> ChartDimensions {
        ChartDimensions::new(self.width, height).with_margin(self.margin)
    }
}

/// Turns observed container widths into committed layouts
#[derive(Debug, Clone)]
pub struct SizeNegotiator {
    config: ChartSizeConfig,
    committed: Option<f64>,
}

impl SizeNegotiator {
    pub fn new(config: ChartSizeConfig) -> Self {
        Self {
            config,
            committed: None,
        }
    }

    /// Layout for a given container width; vertical margins stay at base
    pub fn layout_for(&self, width: f64) -> ChartSize {
        let c = &self.config;
        let width = if width.is_finite() {
            width.max(c.min_width)
        } else {
            c.base_width.max(c.min_width)
        };
        let ratio = width / c.base_width;

        let left = (c.base_margin.left * ratio).max(c.min_left);
        let right = (c.base_margin.right * ratio).max(c.min_right);

        ChartSize {
            width,
            margin: ChartMargin::new(c.base_margin.top, right, c.base_margin.bottom, left),
            max_label_width: (left - c.label_gutter).max(0.0),
        }
    }

    /// Layout at the committed width, or the base width before any commit
    pub fn current(&self) -> ChartSize {
        self.layout_for(self.committed.unwrap_or(self.config.base_width))
    }

    /// Feed a settled width. Returns the new layout only when the clamped
    /// width moved by more than the noise threshold.
    pub fn observe(&mut self, observed: f64) -> Option<ChartSize> {
        let next = self.layout_for(observed);
        let changed = self
            .committed
            .is_none_or(|prev| (next.width - prev).abs() > self.config.noise_threshold);

        if !changed {
            return None;
        }
        self.committed = Some(next.width);
        Some(next)
    }
}

// ============================================================================
// LEPTOS INTEGRATION
// ============================================================================

type ObserverSlot = Option<(ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)>;

/// Observe `container` and expose its negotiated size.
///
/// Every resize notification replaces the pending settle timer (dropping a
/// gloo `Timeout` cancels it), so only the last width of a burst is
/// negotiated.
pub fn use_chart_size(container: NodeRef<html::Div>, config: ChartSizeConfig) -> Signal<ChartSize> {
    let negotiator = Rc::new(RefCell::new(SizeNegotiator::new(config)));
    let size = RwSignal::new(negotiator.borrow().current());
    let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    let slot = StoredValue::new_local(None as ObserverSlot);

    Effect::new(move |_| {
        let Some(element) = container.get() else {
            return;
        };
        if slot.with_value(Option::is_some) {
            return;
        }

        let negotiator = negotiator.clone();
        let pending = pending.clone();
        let debounce_ms = config.debounce_ms;

        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            let Ok(entry) = entries.get(0).dyn_into::<ResizeObserverEntry>() else {
                return;
            };
            let width = entry.content_rect().width();
            let negotiator = negotiator.clone();

            let timeout = Timeout::new(debounce_ms, move || {
                if let Some(next) = negotiator.borrow_mut().observe(width) {
                    tracing::debug!("Chart width committed: {:.0}px", next.width);
                    size.set(next);
                }
            });
            pending.borrow_mut().replace(timeout);
        });

        match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&element);
                slot.set_value(Some((observer, callback)));
            }
            Err(e) => {
                tracing::warn!("ResizeObserver unavailable, keeping base width: {:?}", e);
            }
        }
    });

    on_cleanup(move || {
        slot.with_value(|slot| {
            if let Some((observer, _)) = slot {
                observer.disconnect();
            }
        });
    });

    size.into()
}
