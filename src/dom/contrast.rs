// ============================================================================
// CONTRAST (DOM) - Implementación de navegador de la superficie de contraste
// ============================================================================
// elementFromPoint + getComputedStyle, todo síncrono. Si algo falla se
// devuelve `None` y el punto cuenta como claro.
// ============================================================================

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;
use crate::dom::{document, get_element_by_id, set_attribute, set_inline_style, window};
use crate::models::{EdgeSpan, ProbedElement, Rgba};
use crate::utils::constants::CAROUSEL_SELECTOR;
use crate::viewmodels::contrast_viewmodel::{ContrastSurface, PassScheduler};

/// Máximo de ancestros a recorrer buscando un fondo opaco
const MAX_BACKGROUND_DEPTH: usize = 12;

pub struct BrowserContrastSurface {
    overlay_id: String,
}

impl BrowserContrastSurface {
    pub fn new(overlay_id: &str) -> Self {
        Self {
            overlay_id: overlay_id.to_string(),
        }
    }

    fn overlay(&self) -> Option<Element> {
        get_element_by_id(&self.overlay_id)
    }

    fn computed_background(element: &Element) -> Option<Rgba> {
        let style = window()?.get_computed_style(element).ok()??;
        let raw = style.get_property_value("background-color").ok()?;
        Rgba::parse_css(&raw)
    }

    /// Primer fondo no transparente desde el elemento hacia arriba
    fn effective_background(element: &Element) -> Option<Rgba> {
        let mut current = Some(element.clone());
        let mut depth = 0;
        while let Some(node) = current {
            if depth >= MAX_BACKGROUND_DEPTH {
                break;
            }
            if let Some(color) = Self::computed_background(&node) {
                if !color.is_transparent() {
                    return Some(color);
                }
            }
            current = node.parent_element();
            depth += 1;
        }
        None
    }
}

impl ContrastSurface for BrowserContrastSurface {
    fn overlay_top_edge(&self) -> Option<EdgeSpan> {
        let rect = self.overlay()?.get_bounding_client_rect();
        Some(EdgeSpan {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
        })
    }

    fn set_overlay_hidden(&self, hidden: bool) {
        let Some(overlay) = self.overlay() else {
            return;
        };
        let (visibility, pointer_events) = if hidden {
            (Some("hidden"), Some("none"))
        } else {
            (None, None)
        };
        if let Err(e) = set_inline_style(&overlay, "visibility", visibility)
            .and_then(|_| set_inline_style(&overlay, "pointer-events", pointer_events))
        {
            log::warn!("⚠️ [CONTRAST] No se pudo cambiar la visibilidad del overlay: {:?}", e);
        }
    }

    fn probe(&self, x: f64, y: f64) -> Option<ProbedElement> {
        let element = document()?.element_from_point(x as f32, y as f32)?;

        let classes = element
            .get_attribute("class")
            .map(|raw| raw.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let dark_marker = element
            .get_attribute("data-bg")
            .map_or(false, |value| value.eq_ignore_ascii_case("dark"));
        let in_carousel = matches!(element.closest(CAROUSEL_SELECTOR), Ok(Some(_)));

        Some(ProbedElement {
            tag_name: element.tag_name().to_ascii_uppercase(),
            classes,
            dark_marker,
            in_carousel,
            background: Self::effective_background(&element),
        })
    }

    fn apply_icons(&self, light_icons: bool) {
        if let Some(overlay) = self.overlay() {
            if let Err(e) = set_attribute(&overlay, "data-icons", if light_icons { "light" } else { "dark" }) {
                log::warn!("⚠️ [CONTRAST] No se pudo marcar los iconos: {:?}", e);
            }
        }
    }
}

/// requestAnimationFrame + setTimeout
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserPassScheduler;

impl PassScheduler for BrowserPassScheduler {
    fn next_frame(&self, callback: Box<dyn FnOnce()>) -> bool {
        let Some(win) = window() else {
            return false;
        };
        let closure = Closure::once_into_js(move || callback());
        match win.request_animation_frame(closure.unchecked_ref()) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("⚠️ [CONTRAST] requestAnimationFrame falló: {:?}", e);
                false
            }
        }
    }

    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        // Timeout suelto: se ejecuta una vez y el navegador lo libera
        Timeout::new(delay_ms, move || callback()).forget();
    }
}
