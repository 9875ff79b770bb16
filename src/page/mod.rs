//! In-memory page model.
//!
//! [`Page`] stands in for the document the dashboard runs in: a flat list of
//! elements addressed by stable [`NodeId`]s, a toast container, and the set of
//! running counter animations. It implements [`Notifier`] and
//! [`ChartSurface`], so the API actions and chart builders can target it
//! directly, and it is advanced one display frame at a time with
//! [`Page::advance_frame`].

pub mod element;
pub mod init;

use crate::animate::NumberAnimation;
use crate::charts::{ChartConfig, ChartSurface};
use crate::config::schema::UiConfig;
use crate::notify::toast::{DEFAULT_AUTOHIDE_MS, ToastId, ToastStack};
use crate::notify::{Notifier, Severity};

pub use element::{Element, NodeId};
pub use init::initialize_page;

/// Element ids the dashboard scripts rely on.
pub mod ids {
    pub const TOAST_CONTAINER: &str = "toast-container";
    pub const CHART_RECICLAJES: &str = "chart-reciclajes";
    pub const TOTAL_USUARIOS: &str = "total-usuarios";
    pub const TOTAL_TRANSACCIONES: &str = "total-transacciones";
    pub const TOTAL_PUNTOS: &str = "total-puntos";
    pub const CO2_EVITADO: &str = "co2-evitado";
    pub const PESO_RECICLADO: &str = "peso-reciclado";
}

/// Class list of a freshly created toast container.
const TOAST_CONTAINER_CLASS: &str = "toast-container position-fixed bottom-0 end-0 p-3";

/// What one call to [`Page::advance_frame`] did.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameReport {
    /// Animation frames written into element text.
    pub written: usize,
    /// Animations that finished on this frame (including abandoned ones).
    pub completed: usize,
    /// Toasts removed after their hide transition.
    pub toasts_removed: Vec<ToastId>,
}

#[derive(Debug, Clone)]
struct RunningAnimation {
    node: NodeId,
    animation: NumberAnimation,
}

#[derive(Debug, Clone)]
pub struct Page {
    elements: Vec<Element>,
    next_node: u64,
    toasts: ToastStack,
    animations: Vec<RunningAnimation>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Self::with_toast_autohide(Some(DEFAULT_AUTOHIDE_MS))
    }

    /// Create an empty page whose toasts hide after `autohide_ms` (`None`:
    /// only when dismissed).
    pub fn with_toast_autohide(autohide_ms: Option<f64>) -> Self {
        Self {
            elements: Vec::new(),
            next_node: 1,
            toasts: ToastStack::new(autohide_ms),
            animations: Vec::new(),
        }
    }

    /// Create an empty page with the toast timing from `[ui]`.
    pub fn from_ui(ui: &UiConfig) -> Self {
        Self::with_toast_autohide(ui.toast_autohide())
    }

    /// The standard dashboard with default timings.
    pub fn dashboard() -> Self {
        Self::dashboard_with(&UiConfig::default())
    }

    /// The standard dashboard: stat counters, impact figures and the weekly
    /// recycling canvas.
    pub fn dashboard_with(ui: &UiConfig) -> Self {
        let mut page = Self::from_ui(ui);
        for id in [
            ids::TOTAL_USUARIOS,
            ids::TOTAL_TRANSACCIONES,
            ids::TOTAL_PUNTOS,
        ] {
            page.append(Element::new("h3").with_id(id).with_class("stat-value").with_text("0"));
        }
        for id in [ids::CO2_EVITADO, ids::PESO_RECICLADO] {
            page.append(Element::new("span").with_id(id).with_text("0.00"));
        }
        page.append(Element::new("canvas").with_id(ids::CHART_RECICLAJES));
        page
    }

    // -- Tree --

    /// Append an element at the end of the body.
    pub fn append(&mut self, mut element: Element) -> NodeId {
        let node = NodeId(self.next_node);
        self.next_node += 1;
        element.node = node;
        self.elements.push(element);
        node
    }

    /// Detach an element. Animations targeting it stop on their next frame.
    pub fn remove(&mut self, node: NodeId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.node == node)?;
        Some(self.elements.remove(index))
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.elements.iter().find(|e| e.node == node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.node == node)
    }

    /// First element with the given id, in document order.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .find(|e| e.id.as_deref() == Some(id))
            .map(|e| e.node)
    }

    pub fn by_id(&self, id: &str) -> Option<&Element> {
        self.element_by_id(id).and_then(|n| self.get(n))
    }

    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements
            .iter_mut()
            .find(|e| e.id.as_deref() == Some(id))
    }

    /// Every element carrying `class`, in document order.
    pub fn query_class(&self, class: &str) -> Vec<NodeId> {
        self.elements
            .iter()
            .filter(|e| e.has_class(class))
            .map(|e| e.node)
            .collect()
    }

    /// Text content of the element with the given id.
    pub fn text_of(&self, id: &str) -> Option<&str> {
        self.by_id(id).map(|e| e.text.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    // -- Toasts --

    pub fn toasts(&self) -> &ToastStack {
        &self.toasts
    }

    /// Close a toast, as its dismiss button does.
    pub fn dismiss_toast(&mut self, id: ToastId) -> bool {
        self.toasts.dismiss(id)
    }

    pub fn toast_container(&self) -> Option<&Element> {
        self.by_id(ids::TOAST_CONTAINER)
    }

    fn ensure_toast_container(&mut self) -> NodeId {
        if let Some(node) = self.element_by_id(ids::TOAST_CONTAINER) {
            return node;
        }
        self.append(
            Element::new("div")
                .with_id(ids::TOAST_CONTAINER)
                .with_classes(TOAST_CONTAINER_CLASS),
        )
    }

    // -- Animation --

    /// Animate the text of `node` from 0 to `target`, starting at `start_ms`.
    pub fn animate_number(&mut self, node: NodeId, target: i64, duration_ms: f64, start_ms: f64) {
        self.animations.push(RunningAnimation {
            node,
            animation: NumberAnimation::new(target, duration_ms, start_ms),
        });
    }

    pub fn running_animations(&self) -> usize {
        self.animations.len()
    }

    /// Whether anything still changes on future frames.
    pub fn is_settled(&self) -> bool {
        self.animations.is_empty() && self.toasts.is_empty()
    }

    /// Run one display frame at `now_ms`.
    ///
    /// Each running animation writes its current value into its element;
    /// animations whose element has been removed finish without writing.
    /// Toast transitions advance as well.
    pub fn advance_frame(&mut self, now_ms: f64) -> FrameReport {
        let mut report = FrameReport::default();
        let mut animations = std::mem::take(&mut self.animations);

        for running in &mut animations {
            match self.get_mut(running.node) {
                Some(element) => {
                    element.text = running.animation.frame(now_ms).text;
                    report.written += 1;
                }
                None => running.animation.abandon(),
            }
            if running.animation.is_complete() {
                report.completed += 1;
            }
        }

        animations.retain(|r| !r.animation.is_complete());
        self.animations = animations;

        report.toasts_removed = self.toasts.tick(now_ms);
        report
    }
}

impl Notifier for Page {
    fn show_toast(&mut self, message: &str, severity: Severity) {
        self.ensure_toast_container();
        self.toasts.push(message, severity);
    }
}

impl ChartSurface for Page {
    fn has_canvas(&self, canvas_id: &str) -> bool {
        self.element_by_id(canvas_id).is_some()
    }

    /// Drawing onto a canvas that already holds a chart replaces it.
    fn draw(&mut self, canvas_id: &str, chart: ChartConfig) {
        if let Some(element) = self.by_id_mut(canvas_id) {
            element.chart = Some(chart);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
