//! The gallery controller.
//!
//! [`Gallery`] owns one [`ImageStore`] and one [`ViewRenderer`] and is the
//! only thing the presentation layer talks to. It is passed explicitly to
//! every event handler that needs it; there is no global instance.

use crate::error::GalleryError;
use crate::keybindings::{GalleryAction, KeyBindings, KeyOutcome, KeyPress};
use crate::model::{ImageId, ImageRecord};
use crate::persistence::PersistenceAdapter;
use crate::storage::KeyValueStorage;
use crate::store::ImageStore;
use crate::view::{Surface, ViewRenderer};

/// Image store plus the view derived from it.
#[derive(Debug)]
pub struct Gallery<S: KeyValueStorage, V: Surface> {
    store: ImageStore<S>,
    renderer: ViewRenderer<V>,
    keybindings: KeyBindings,
}

impl<S: KeyValueStorage, V: Surface> Gallery<S, V> {
    /// Create a gallery from a store and renderer and draw the store's contents.
    pub fn new(store: ImageStore<S>, renderer: ViewRenderer<V>) -> Self {
        let mut gallery = Self {
            store,
            renderer,
            keybindings: KeyBindings::default(),
        };
        gallery.render_all();
        gallery
    }

    /// Hydrate from persisted data and draw it.
    pub fn open(persistence: PersistenceAdapter<S>, renderer: ViewRenderer<V>) -> Self {
        let gallery = Self::new(ImageStore::load(persistence), renderer);
        log::info!("🖼️ Gallery ready with {} images", gallery.store.len());
        gallery
    }

    /// Replace the keybindings.
    pub fn with_keybindings(mut self, keybindings: KeyBindings) -> Self {
        self.keybindings = keybindings;
        self
    }

    /// The image store.
    pub fn store(&self) -> &ImageStore<S> {
        &self.store
    }

    /// The view renderer.
    pub fn renderer(&self) -> &ViewRenderer<V> {
        &self.renderer
    }

    /// The surface being drawn on.
    pub fn surface(&self) -> &V {
        self.renderer.surface()
    }

    /// Redraw every card from the store.
    pub fn render_all(&mut self) {
        self.renderer.render_all(self.store.list());
    }

    /// Add a newly ingested record and append its card.
    pub fn add(&mut self, record: ImageRecord) -> Result<(), GalleryError> {
        let id = record.id.clone();
        self.store.add(record)?;
        if let Some(record) = self.store.get(&id) {
            self.renderer.append_card(record);
        }
        self.renderer.sync_empty_state(self.store.len());
        Ok(())
    }

    /// Update a caption. Unknown ids are ignored.
    pub fn update_caption(&mut self, id: &ImageId, caption: impl Into<String>) -> bool {
        self.store.update_caption(id, caption)
    }

    /// Delete a record and remove its card. Unknown ids are ignored.
    pub fn delete(&mut self, id: &ImageId) -> bool {
        let removed = self.store.delete(id);
        if removed {
            self.renderer.remove_card(id);
            self.renderer.sync_empty_state(self.store.len());
        }
        removed
    }

    /// Open the viewer for a record, showing its current caption.
    pub fn open_viewer(&mut self, id: &ImageId) -> bool {
        let Some(record) = self.store.get(id) else {
            return false;
        };
        self.renderer
            .open_modal(&record.data, &record.name, &record.caption);
        true
    }

    /// Close the viewer. Returns false if it wasn't open.
    pub fn close_viewer(&mut self) -> bool {
        self.renderer.close_modal()
    }

    /// React to a key press.
    pub fn handle_key(&mut self, press: &KeyPress) -> KeyOutcome {
        match self.keybindings.action_for(press) {
            Some(GalleryAction::CloseViewer) => {
                let handled = self.close_viewer();
                KeyOutcome {
                    handled,
                    prevent_default: handled,
                }
            }
            Some(GalleryAction::Undo) => {
                log::trace!("Undo is not available");
                KeyOutcome {
                    handled: false,
                    prevent_default: true,
                }
            }
            None => KeyOutcome::default(),
        }
    }
}
