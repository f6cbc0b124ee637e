//! Browser DOM surface (WASM only).
//!
//! Draws cards into the `#gallery` grid, toggles `#emptyState`, and builds the
//! full-size viewer on demand. Text is always set as text content, never as
//! markup. Event handling lives in the `wasm` module and works by delegation,
//! so cards carry no listeners of their own.

use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlTextAreaElement};

use crate::error::GalleryError;
use crate::model::{ImageId, ImageRecord};
use crate::view::{ModalView, Surface};

/// Element id of the card grid.
pub const GRID_ID: &str = "gallery";
/// Element id of the empty-state placeholder.
pub const EMPTY_STATE_ID: &str = "emptyState";
/// Element id of the upload drop zone.
pub const UPLOAD_AREA_ID: &str = "uploadArea";
/// Element id of the hidden file input.
pub const FILE_INPUT_ID: &str = "fileInput";

/// Attribute carrying a card's record id.
pub const CARD_ID_ATTRIBUTE: &str = "data-id";

/// Delay before the viewer gets its `show` class, so the CSS transition runs.
const MODAL_SHOW_DELAY_MS: i32 = 10;

const EXIT_KEYFRAMES: &str = "
@keyframes fadeOut {
    from { opacity: 1; transform: scale(1); }
    to { opacity: 0; transform: scale(0.8); }
}";

pub(crate) fn js_error(value: JsValue) -> GalleryError {
    GalleryError::Dom(format!("{:?}", value))
}

/// Look up an element by id.
pub(crate) fn element_by_id(document: &Document, id: &str) -> Result<HtmlElement, GalleryError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| GalleryError::Dom(format!("missing element #{}", id)))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| GalleryError::Dom(format!("#{} is not an HTML element", id)))
}

/// Record id of the card containing `element`, if any.
pub(crate) fn card_id_of(element: &Element) -> Option<ImageId> {
    element
        .closest(".image-card")
        .ok()
        .flatten()
        .and_then(|card| card.get_attribute(CARD_ID_ATTRIBUTE))
        .map(ImageId::from)
}

/// Run `callback` after `delay`.
fn after(delay: Duration, callback: impl FnOnce() + 'static) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let callback = Closure::once_into_js(callback);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        i32::try_from(delay.as_millis()).unwrap_or(i32::MAX),
    )?;
    Ok(())
}

/// Surface that draws into the page.
#[derive(Debug)]
pub struct DomSurface {
    document: Document,
    grid: HtmlElement,
    empty_state: HtmlElement,
    modal: Option<Element>,
}

impl DomSurface {
    /// Attach to the gallery elements of `document`.
    pub fn attach(document: &Document) -> Result<Self, GalleryError> {
        let surface = Self {
            document: document.clone(),
            grid: element_by_id(document, GRID_ID)?,
            empty_state: element_by_id(document, EMPTY_STATE_ID)?,
            modal: None,
        };
        surface.install_keyframes().map_err(js_error)?;
        Ok(surface)
    }

    fn install_keyframes(&self) -> Result<(), JsValue> {
        let Some(head) = self.document.head() else {
            return Ok(());
        };
        let style = self.document.create_element("style")?;
        style.set_text_content(Some(EXIT_KEYFRAMES));
        head.append_child(&style)?;
        Ok(())
    }

    fn create(&self, tag: &str, class: &str) -> Result<Element, JsValue> {
        let element = self.document.create_element(tag)?;
        if !class.is_empty() {
            element.set_class_name(class);
        }
        Ok(element)
    }

    fn create_text(&self, tag: &str, class: &str, text: &str) -> Result<Element, JsValue> {
        let element = self.create(tag, class)?;
        element.set_text_content(Some(text));
        Ok(element)
    }

    fn find_card(&self, id: &ImageId) -> Option<Element> {
        let selector = format!("[{}=\"{}\"]", CARD_ID_ATTRIBUTE, id);
        self.grid.query_selector(&selector).ok().flatten()
    }

    fn build_card(&self, record: &ImageRecord) -> Result<Element, JsValue> {
        let card = self.create("div", "image-card")?;
        card.set_attribute(CARD_ID_ATTRIBUTE, record.id.as_str())?;

        let container = self.create("div", "image-container")?;
        let image: HtmlImageElement = self.create("img", "")?.unchecked_into();
        image.set_src(&record.data);
        image.set_alt(&record.name);
        image.style().set_property("cursor", "pointer")?;
        container.append_child(&image)?;

        let actions = self.create("div", "image-actions")?;
        let delete = self.create_text("button", "action-btn", "🗑️")?;
        delete.set_attribute("title", "Delete image")?;
        actions.append_child(&delete)?;
        container.append_child(&actions)?;
        card.append_child(&container)?;

        let info = self.create("div", "image-info")?;
        let caption: HtmlTextAreaElement = self.create("textarea", "caption-input")?.unchecked_into();
        caption.set_placeholder("Write a caption for this image...");
        caption.set_value(&record.caption);
        info.append_child(&caption)?;

        let meta = self.create("div", "image-meta")?;
        meta.append_child(&self.create_text("span", "image-size", &record.size_label)?)?;
        meta.append_child(&self.create_text("span", "", &record.date_label)?)?;
        info.append_child(&meta)?;
        card.append_child(&info)?;

        Ok(card)
    }

    fn build_modal(&self, modal: &ModalView) -> Result<Element, JsValue> {
        let root = self.create("div", "image-modal")?;
        root.append_child(&self.create("div", "modal-overlay")?)?;

        let content = self.create("div", "modal-content")?;
        let header = self.create("div", "modal-header")?;
        header.append_child(&self.create_text("h3", "", &modal.name)?)?;
        header.append_child(&self.create_text("button", "modal-close", "✕")?)?;
        content.append_child(&header)?;

        let container = self.create("div", "modal-image-container")?;
        let image: HtmlImageElement = self.create("img", "modal-image")?.unchecked_into();
        image.set_src(&modal.data);
        image.set_alt(&modal.name);
        container.append_child(&image)?;
        content.append_child(&container)?;

        if let Some(caption) = &modal.caption {
            content.append_child(&self.create_text("div", "modal-caption", caption)?)?;
        }

        root.append_child(&content)?;
        Ok(root)
    }

    fn try_show_modal(&mut self, modal: &ModalView) -> Result<(), JsValue> {
        if let Some(previous) = self.modal.take() {
            previous.remove();
        }

        let root = self.build_modal(modal)?;
        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?;
        body.append_child(&root)?;

        let shown = root.clone();
        after(Duration::from_millis(MODAL_SHOW_DELAY_MS as u64), move || {
            let _ = shown.class_list().add_1("show");
        })?;

        self.modal = Some(root);
        Ok(())
    }

    fn set_display(element: &HtmlElement, value: &str) {
        if let Err(e) = element.style().set_property("display", value) {
            log::warn!("Failed to set display: {:?}", e);
        }
    }
}

impl Surface for DomSurface {
    fn append_card(&mut self, record: &ImageRecord) {
        let result = self
            .build_card(record)
            .and_then(|card| self.grid.append_child(&card).map(|_| ()));
        if let Err(e) = result {
            log::warn!("Failed to render card for '{}': {:?}", record.name, e);
        }
    }

    fn remove_card(&mut self, id: &ImageId, transition: Duration) {
        let Some(card) = self.find_card(id) else {
            return;
        };

        if let Some(card) = card.dyn_ref::<HtmlElement>() {
            let animation = format!("fadeOut {}s ease", transition.as_secs_f32());
            let _ = card.style().set_property("animation", &animation);
        }

        let detached = card.clone();
        if after(transition, move || detached.remove()).is_err() {
            card.remove();
        }
    }

    fn clear_cards(&mut self) {
        self.grid.set_inner_html("");
    }

    fn set_empty_state(&mut self, empty: bool) {
        Self::set_display(&self.empty_state, if empty { "block" } else { "none" });
        Self::set_display(&self.grid, if empty { "none" } else { "grid" });
    }

    fn show_modal(&mut self, modal: &ModalView) {
        if let Err(e) = self.try_show_modal(modal) {
            log::warn!("Failed to open image viewer: {:?}", e);
        }
    }

    fn hide_modal(&mut self, transition: Duration) {
        let Some(modal) = self.modal.take() else {
            return;
        };

        let _ = modal.class_list().remove_1("show");
        let detached = modal.clone();
        if after(transition, move || detached.remove()).is_err() {
            modal.remove();
        }
    }
}
