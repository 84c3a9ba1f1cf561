use parallel_timeline_protocol::TimeWindow;

/// Who holds the authoritative time window.
///
/// The engine always computes the proposed next window. An internal owner
/// commits it on the spot; an external owner ignores the commit and waits for
/// the caller to feed the accepted window back through [`ExternalView::sync`].
pub trait ViewportOwner {
    fn is_external(&self) -> bool;
    fn current(&self) -> TimeWindow;
    fn commit(&mut self, view: TimeWindow);
}

/// Uncontrolled mode: the engine owns the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InternalView {
    view: TimeWindow,
}

impl InternalView {
    /// Starts from `default_view`, or `{0, 60000}` when none is given.
    pub fn new(default_view: Option<TimeWindow>) -> Self {
        Self {
            view: default_view.unwrap_or(TimeWindow::FALLBACK),
        }
    }
}

impl Default for InternalView {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ViewportOwner for InternalView {
    fn is_external(&self) -> bool {
        false
    }

    fn current(&self) -> TimeWindow {
        self.view
    }

    fn commit(&mut self, view: TimeWindow) {
        self.view = view;
    }
}

/// Controlled mode: the caller owns the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalView {
    view: TimeWindow,
}

impl ExternalView {
    pub fn new(view: TimeWindow) -> Self {
        Self { view }
    }

    /// Feed back the window the caller decided to show.
    pub fn sync(&mut self, view: TimeWindow) {
        self.view = view;
    }
}

impl ViewportOwner for ExternalView {
    fn is_external(&self) -> bool {
        true
    }

    fn current(&self) -> TimeWindow {
        self.view
    }

    fn commit(&mut self, _view: TimeWindow) {}
}
