/// Toast lifecycle bookkeeping.
///
/// Each toast moves through `Showing → Shown → Hiding` and is removed from
/// its container once the hide transition has run. Transitions are advanced
/// by [`ToastStack::tick`] with the current frame time, so the whole lifecycle
/// can be driven by a manual clock.
///
/// | Phase   | Leaves after                    | Next      |
/// |---------|---------------------------------|-----------|
/// | Showing | [`FADE_MS`]                     | Shown     |
/// | Shown   | autohide delay (or `dismiss`)   | Hiding    |
/// | Hiding  | [`FADE_MS`]                     | removed   |
use super::Severity;

/// Duration of the show and hide fade transitions, in milliseconds.
pub const FADE_MS: f64 = 150.0;

/// Default time a fully shown toast stays up before hiding itself.
pub const DEFAULT_AUTOHIDE_MS: f64 = 5000.0;

/// Identifier of a toast within its stack. Never reused.
pub type ToastId = u64;

/// Where a toast is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Showing,
    Shown,
    Hiding,
}

/// A dismissible alert inside the toast container.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub severity: Severity,
    pub phase: ToastPhase,
    /// Frame time at which the current phase started. `None` until the next
    /// frame picks the toast up.
    phase_started_ms: Option<f64>,
}

impl Toast {
    /// Class list of the toast element.
    pub fn class_name(&self) -> String {
        format!(
            "toast align-items-center text-white {} border-0",
            self.severity.background_class()
        )
    }

    /// ARIA role of the toast element.
    pub fn role(&self) -> &'static str {
        "alert"
    }

    fn enter(&mut self, phase: ToastPhase, now_ms: Option<f64>) {
        self.phase = phase;
        self.phase_started_ms = now_ms;
    }
}

/// The live toasts of one container, oldest first.
#[derive(Debug, Clone)]
pub struct ToastStack {
    toasts: Vec<Toast>,
    next_id: ToastId,
    autohide_ms: Option<f64>,
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new(Some(DEFAULT_AUTOHIDE_MS))
    }
}

impl ToastStack {
    /// Create an empty stack. `autohide_ms = None` keeps toasts up until they
    /// are dismissed.
    pub fn new(autohide_ms: Option<f64>) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
            autohide_ms,
        }
    }

    /// Append a toast and start its show transition.
    pub fn push(&mut self, message: &str, severity: Severity) -> ToastId {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            message: message.to_string(),
            severity,
            phase: ToastPhase::Showing,
            phase_started_ms: None,
        });
        id
    }

    /// Start hiding a toast, as its close button does.
    ///
    /// Returns `false` if the toast is unknown or already hiding.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        match self.toasts.iter_mut().find(|t| t.id == id) {
            Some(toast) if toast.phase != ToastPhase::Hiding => {
                toast.enter(ToastPhase::Hiding, None);
                true
            }
            _ => false,
        }
    }

    /// Advance every toast to frame time `now_ms`.
    ///
    /// Returns the ids of toasts whose hide transition completed; they are no
    /// longer in the stack.
    pub fn tick(&mut self, now_ms: f64) -> Vec<ToastId> {
        let autohide_ms = self.autohide_ms;
        let mut removed = Vec::new();

        for toast in &mut self.toasts {
            let Some(started) = toast.phase_started_ms else {
                toast.phase_started_ms = Some(now_ms);
                continue;
            };
            let elapsed = now_ms - started;

            match toast.phase {
                ToastPhase::Showing if elapsed >= FADE_MS => {
                    toast.enter(ToastPhase::Shown, Some(now_ms));
                }
                ToastPhase::Shown => {
                    if let Some(delay) = autohide_ms
                        && elapsed >= delay
                    {
                        toast.enter(ToastPhase::Hiding, Some(now_ms));
                    }
                }
                ToastPhase::Hiding if elapsed >= FADE_MS => removed.push(toast.id),
                _ => {}
            }
        }

        self.toasts.retain(|t| !removed.contains(&t.id));
        removed
    }

    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// The most recently pushed toast still in the stack.
    pub fn last(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
