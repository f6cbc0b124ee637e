//! View rendering for the gallery.
//!
//! [`ViewRenderer`] keeps a one-to-one mapping between record ids and rendered
//! cards and owns the full-size viewer (modal) state. It has no state of its
//! own beyond that mirror: everything it draws comes from the store.
//!
//! Drawing is delegated to a [`Surface`]. The browser build implements it on
//! top of the DOM; [`HeadlessSurface`] keeps the same state in memory.

use std::time::Duration;

use crate::model::{ImageId, ImageRecord};

/// Default duration of the card and modal exit transitions.
pub const DEFAULT_EXIT_TRANSITION: Duration = Duration::from_millis(300);

/// Content of the full-size image viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    /// Image payload (data URI)
    pub data: String,
    /// File name shown in the header
    pub name: String,
    /// Caption panel text; None omits the panel
    pub caption: Option<String>,
}

impl ModalView {
    /// Build a modal view, omitting the caption panel for an empty caption.
    pub fn new(data: impl Into<String>, name: impl Into<String>, caption: &str) -> Self {
        Self {
            data: data.into(),
            name: name.into(),
            caption: (!caption.is_empty()).then(|| caption.to_string()),
        }
    }
}

/// Something the gallery can be drawn onto.
pub trait Surface {
    /// Append a card for `record` to the end of the grid.
    fn append_card(&mut self, record: &ImageRecord);

    /// Remove the card for `id`, running an exit transition of `transition` first.
    fn remove_card(&mut self, id: &ImageId, transition: Duration);

    /// Remove all cards immediately.
    fn clear_cards(&mut self);

    /// Show the empty-state placeholder (and hide the grid) or the reverse.
    fn set_empty_state(&mut self, empty: bool);

    /// Show the modal viewer, replacing any content already shown.
    fn show_modal(&mut self, modal: &ModalView);

    /// Hide the modal viewer, running an exit transition of `transition` first.
    fn hide_modal(&mut self, transition: Duration);
}

/// Projects store contents onto a [`Surface`].
#[derive(Debug)]
pub struct ViewRenderer<V: Surface> {
    surface: V,
    /// Ids of rendered cards, in grid order
    cards: Vec<ImageId>,
    modal: Option<ModalView>,
    exit_transition: Duration,
}

impl<V: Surface> ViewRenderer<V> {
    /// Create a renderer with the default exit transition.
    pub fn new(surface: V) -> Self {
        Self::with_exit_transition(surface, DEFAULT_EXIT_TRANSITION)
    }

    /// Create a renderer with a custom exit transition.
    pub fn with_exit_transition(surface: V, exit_transition: Duration) -> Self {
        Self {
            surface,
            cards: Vec::new(),
            modal: None,
            exit_transition,
        }
    }

    /// The surface being drawn on.
    pub fn surface(&self) -> &V {
        &self.surface
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut V {
        &mut self.surface
    }

    /// Ids of the rendered cards, in grid order.
    pub fn card_ids(&self) -> &[ImageId] {
        &self.cards
    }

    /// Check if a card is rendered for `id`.
    pub fn has_card(&self, id: &ImageId) -> bool {
        self.cards.contains(id)
    }

    /// Append a card for `record`.
    ///
    /// A record that already has a card is skipped.
    pub fn append_card(&mut self, record: &ImageRecord) {
        if self.has_card(&record.id) {
            log::debug!("Card for {} already rendered", record.id);
            return;
        }
        self.surface.append_card(record);
        self.cards.push(record.id.clone());
    }

    /// Remove the card for `id`. Returns whether a card was rendered for it.
    pub fn remove_card(&mut self, id: &ImageId) -> bool {
        let Some(index) = self.cards.iter().position(|card| card == id) else {
            return false;
        };
        self.cards.remove(index);
        self.surface.remove_card(id, self.exit_transition);
        true
    }

    /// Rebuild the whole grid from `records`.
    pub fn render_all(&mut self, records: &[ImageRecord]) {
        self.surface.clear_cards();
        self.cards.clear();
        for record in records {
            self.append_card(record);
        }
        self.sync_empty_state(records.len());
        log::debug!("Rendered {} cards", self.cards.len());
    }

    /// Show the empty state iff the collection has no records.
    pub fn sync_empty_state(&mut self, len: usize) {
        self.surface.set_empty_state(len == 0);
    }

    /// Open the full-size viewer.
    pub fn open_modal(&mut self, data: &str, name: &str, caption: &str) {
        let modal = ModalView::new(data, name, caption);
        self.surface.show_modal(&modal);
        self.modal = Some(modal);
    }

    /// Close the full-size viewer. Returns false if it wasn't open.
    pub fn close_modal(&mut self) -> bool {
        if self.modal.take().is_none() {
            return false;
        }
        self.surface.hide_modal(self.exit_transition);
        true
    }

    /// Check if the viewer is open.
    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// Content of the open viewer, if any.
    pub fn modal(&self) -> Option<&ModalView> {
        self.modal.as_ref()
    }
}

/// In-memory surface that tracks what would be on screen.
///
/// Exit transitions complete instantly.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    /// Cards in grid order
    pub cards: Vec<ImageRecord>,
    /// Whether the empty-state placeholder is visible
    pub empty_state_visible: bool,
    /// The visible modal, if any
    pub modal: Option<ModalView>,
}

impl HeadlessSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for HeadlessSurface {
    fn append_card(&mut self, record: &ImageRecord) {
        self.cards.push(record.clone());
    }

    fn remove_card(&mut self, id: &ImageId, _transition: Duration) {
        self.cards.retain(|card| &card.id != id);
    }

    fn clear_cards(&mut self) {
        self.cards.clear();
    }

    fn set_empty_state(&mut self, empty: bool) {
        self.empty_state_visible = empty;
    }

    fn show_modal(&mut self, modal: &ModalView) {
        self.modal = Some(modal.clone());
    }

    fn hide_modal(&mut self, _transition: Duration) {
        self.modal = None;
    }
}
