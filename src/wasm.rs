//! Browser entry point and event wiring (WASM only).
//!
//! The gallery is shared between event handlers as an `Rc<RefCell<_>>` that
//! each handler captures explicitly. Handlers never hold a borrow across an
//! await; a handler that finds the gallery busy drops its event and logs it.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, DragEvent, Element, Event, EventTarget, FileList, HtmlInputElement,
    HtmlTextAreaElement, KeyboardEvent,
};

use crate::config::GalleryConfig;
use crate::dom::{self, DomSurface, FILE_INPUT_ID, GRID_ID, UPLOAD_AREA_ID, card_id_of, js_error};
use crate::error::GalleryError;
use crate::gallery::Gallery;
use crate::ingest::{BrowserSpawner, IngestionPipeline};
use crate::keybindings::KeyPress;
use crate::logging;
use crate::persistence::PersistenceAdapter;
use crate::storage::LocalStorage;
use crate::view::ViewRenderer;

type SharedGallery = Rc<RefCell<Gallery<LocalStorage, DomSurface>>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = GalleryConfig::load_from_local_storage().unwrap_or_default();
    logging::init(config.log_level.to_level_filter());

    if let Err(e) = mount(&config) {
        log::error!("Failed to start gallery: {}", e);
    }
}

fn mount(config: &GalleryConfig) -> Result<(), GalleryError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| GalleryError::Dom("No document available".to_string()))?;

    let persistence = PersistenceAdapter::with_key(LocalStorage::open()?, config.storage_key.clone());
    let renderer =
        ViewRenderer::with_exit_transition(DomSurface::attach(&document)?, config.exit_transition());
    let gallery: SharedGallery = Rc::new(RefCell::new(
        Gallery::open(persistence, renderer).with_keybindings(config.keybindings.clone()),
    ));
    let pipeline = Rc::new(config.ingestion_pipeline());

    wire_upload(&document, &gallery, &pipeline)?;
    wire_cards(&document, &gallery)?;
    wire_viewer(&document, &gallery)?;
    wire_keyboard(&document, &gallery)?;

    log::info!("🖼️ Gallery mounted");
    Ok(())
}

/// Add a listener that lives for the rest of the page.
fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), GalleryError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(js_error)?;
    closure.forget(); // Leak the closure to keep it alive
    Ok(())
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// Run `f` with the gallery, unless another handler is using it.
fn with_gallery(gallery: &SharedGallery, f: impl FnOnce(&mut Gallery<LocalStorage, DomSurface>)) {
    match gallery.try_borrow_mut() {
        Ok(mut gallery) => f(&mut gallery),
        Err(_) => log::warn!("Gallery busy, event dropped"),
    }
}

fn ingest_files(files: FileList, gallery: &SharedGallery, pipeline: &IngestionPipeline) {
    let files: Vec<web_sys::File> = (0..files.length()).filter_map(|i| files.get(i)).collect();
    let gallery = gallery.clone();
    pipeline.ingest(files, &BrowserSpawner, move |record| {
        with_gallery(&gallery, |gallery| {
            if let Err(e) = gallery.add(record) {
                log::warn!("Could not add image: {}", e);
            }
        });
    });
}

fn wire_upload(
    document: &Document,
    gallery: &SharedGallery,
    pipeline: &Rc<IngestionPipeline>,
) -> Result<(), GalleryError> {
    let upload_area = dom::element_by_id(document, UPLOAD_AREA_ID)?;
    let file_input: HtmlInputElement = dom::element_by_id(document, FILE_INPUT_ID)?
        .dyn_into()
        .map_err(|_| GalleryError::Dom("#fileInput is not an input".to_string()))?;
    file_input.set_accept("image/*");
    file_input.set_multiple(true);

    {
        let file_input = file_input.clone();
        listen(&upload_area, "click", move |_| file_input.click())?;
    }

    {
        let gallery = gallery.clone();
        let pipeline = pipeline.clone();
        let input = file_input.clone();
        listen(&file_input, "change", move |_| {
            if let Some(files) = input.files() {
                ingest_files(files, &gallery, &pipeline);
            }
            // Allow selecting the same file again
            input.set_value("");
        })?;
    }

    {
        let area = upload_area.clone();
        listen(&upload_area, "dragover", move |event| {
            event.prevent_default();
            let _ = area.class_list().add_1("dragover");
        })?;
    }

    {
        let area = upload_area.clone();
        listen(&upload_area, "dragleave", move |_| {
            let _ = area.class_list().remove_1("dragover");
        })?;
    }

    {
        let area = upload_area.clone();
        let gallery = gallery.clone();
        let pipeline = pipeline.clone();
        listen(&upload_area, "drop", move |event| {
            event.prevent_default();
            let _ = area.class_list().remove_1("dragover");
            let files = event
                .dyn_ref::<DragEvent>()
                .and_then(DragEvent::data_transfer)
                .and_then(|transfer| transfer.files());
            if let Some(files) = files {
                ingest_files(files, &gallery, &pipeline);
            }
        })?;
    }

    Ok(())
}

fn wire_cards(document: &Document, gallery: &SharedGallery) -> Result<(), GalleryError> {
    let grid = dom::element_by_id(document, GRID_ID)?;

    {
        let gallery = gallery.clone();
        listen(&grid, "click", move |event| {
            let Some(target) = event_element(&event) else {
                return;
            };
            let Some(id) = card_id_of(&target) else {
                return;
            };

            let on_delete = target.closest(".action-btn").ok().flatten().is_some();
            let on_image = target.tag_name().eq_ignore_ascii_case("img");

            with_gallery(&gallery, |gallery| {
                if on_delete {
                    gallery.delete(&id);
                } else if on_image {
                    gallery.open_viewer(&id);
                }
            });
        })?;
    }

    {
        let gallery = gallery.clone();
        listen(&grid, "change", move |event| {
            let Some(target) = event_element(&event) else {
                return;
            };
            let Some(input) = target.dyn_ref::<HtmlTextAreaElement>() else {
                return;
            };
            if !input.class_list().contains("caption-input") {
                return;
            }
            if let Some(id) = card_id_of(&target) {
                let caption = input.value();
                with_gallery(&gallery, |gallery| {
                    gallery.update_caption(&id, caption);
                });
            }
        })?;
    }

    Ok(())
}

fn wire_viewer(document: &Document, gallery: &SharedGallery) -> Result<(), GalleryError> {
    let gallery = gallery.clone();
    listen(document, "click", move |event| {
        let Some(target) = event_element(&event) else {
            return;
        };
        let on_overlay = target.class_list().contains("modal-overlay");
        let on_close = target.closest(".modal-close").ok().flatten().is_some();
        if on_overlay || on_close {
            with_gallery(&gallery, |gallery| {
                gallery.close_viewer();
            });
        }
    })
}

fn wire_keyboard(document: &Document, gallery: &SharedGallery) -> Result<(), GalleryError> {
    let gallery = gallery.clone();
    listen(document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let press = KeyPress {
            key: event.key(),
            ctrl: event.ctrl_key(),
        };
        with_gallery(&gallery, |gallery| {
            if gallery.handle_key(&press).prevent_default {
                event.prevent_default();
            }
        });
    })
}
