// ============================================================================
// CONTRAST VIEWMODEL - Iconos claros u oscuros según el fondo de la barra
// ============================================================================
// Cada pasada: ocultar overlay → muestrear 3 puntos del borde superior →
// restaurar overlay → iconos claros si al menos 2 de 3 puntos son oscuros.
// Sin estado entre pasadas; un falso positivo solo cuesta contraste.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;
use crate::config::ContrastConfig;
use crate::models::{ContrastSample, EdgeSpan, ProbedElement, Shade};
use crate::state::ReactiveState;
use crate::utils::constants::{DARK_CLASS_TOKENS, MEDIA_TAGS};

/// Acceso al DOM necesario para una pasada
pub trait ContrastSurface {
    /// `None` si el overlay no está montado: la pasada se salta
    fn overlay_top_edge(&self) -> Option<EdgeSpan>;

    /// Ocultar (visibility + pointer-events) o restaurar el overlay
    fn set_overlay_hidden(&self, hidden: bool);

    /// Elemento más arriba en ese punto del viewport
    fn probe(&self, x: f64, y: f64) -> Option<ProbedElement>;

    fn apply_icons(&self, light_icons: bool);
}

/// Planificación de pasadas diferidas
pub trait PassScheduler {
    /// Próximo animation frame. `false` si no se pudo programar
    /// (el callback no se ejecutará nunca).
    fn next_frame(&self, callback: Box<dyn FnOnce()>) -> bool;

    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>);
}

fn has_dark_class(classes: &[String]) -> bool {
    classes.iter().any(|class| {
        DARK_CLASS_TOKENS.iter().any(|token| {
            class == token
                || class
                    .strip_prefix(token)
                    .map_or(false, |rest| rest.starts_with('/'))
        })
    })
}

/// Clasificar el elemento bajo un punto
pub fn classify(element: &ProbedElement, luminance_threshold: f64) -> Shade {
    let is_media = MEDIA_TAGS
        .iter()
        .any(|tag| element.tag_name.eq_ignore_ascii_case(tag));

    if is_media || element.in_carousel || element.dark_marker || has_dark_class(&element.classes) {
        return Shade::Dark;
    }

    match element.background {
        Some(color) if !color.is_transparent() && color.luminance() < luminance_threshold => Shade::Dark,
        _ => Shade::Light,
    }
}

/// Una pasada completa sobre la superficie
pub fn sample_pass(surface: &dyn ContrastSurface, config: &ContrastConfig) -> Option<ContrastSample> {
    let edge = surface.overlay_top_edge()?;

    surface.set_overlay_hidden(true);
    let shades: Vec<Shade> = config
        .sample_fractions
        .iter()
        .map(|fraction| {
            let (x, y) = edge.point_at(*fraction);
            surface
                .probe(x, y)
                .map(|element| classify(&element, config.luminance_threshold))
                .unwrap_or(Shade::Light)
        })
        .collect();
    surface.set_overlay_hidden(false);

    let dark = shades.iter().filter(|shade| **shade == Shade::Dark).count();
    Some(ContrastSample {
        light_icons: dark >= config.dark_votes_needed,
        shades,
    })
}

#[derive(Clone)]
pub struct BackgroundContrastSampler {
    inner: Rc<ContrastInner>,
}

struct ContrastInner {
    surface: Rc<dyn ContrastSurface>,
    scheduler: Rc<dyn PassScheduler>,
    config: ContrastConfig,
    /// Guard del scroll: como mucho una pasada por frame
    frame_pending: Cell<bool>,
    light_icons: ReactiveState<bool>,
}

impl BackgroundContrastSampler {
    pub fn new(surface: Rc<dyn ContrastSurface>, scheduler: Rc<dyn PassScheduler>, config: ContrastConfig) -> Self {
        Self {
            inner: Rc::new(ContrastInner {
                surface,
                scheduler,
                config,
                frame_pending: Cell::new(false),
                light_icons: ReactiveState::new(false),
            }),
        }
    }

    pub fn light_icons(&self) -> bool {
        self.inner.light_icons.get()
    }

    pub fn light_icons_state(&self) -> ReactiveState<bool> {
        self.inner.light_icons.clone()
    }

    /// Pasada inmediata
    pub fn sample_now(&self) -> Option<ContrastSample> {
        let Some(sample) = sample_pass(self.inner.surface.as_ref(), &self.inner.config) else {
            log::debug!("🎨 [CONTRAST] Overlay no montado, pasada omitida");
            return None;
        };

        self.inner.surface.apply_icons(sample.light_icons);
        if self.inner.light_icons.get() != sample.light_icons {
            log::debug!(
                "🎨 [CONTRAST] Iconos {} ({} de {} puntos oscuros)",
                if sample.light_icons { "claros" } else { "oscuros" },
                sample.dark_count(),
                sample.shades.len()
            );
            self.inner.light_icons.set(sample.light_icons);
        }
        Some(sample)
    }

    /// Scroll: como mucho una pasada por animation frame
    pub fn on_scroll(&self) {
        if self.inner.frame_pending.replace(true) {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let scheduled = self.inner.scheduler.next_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.frame_pending.set(false);
                BackgroundContrastSampler { inner }.sample_now();
            }
        }));
        if !scheduled {
            // sin frame no hay quien libere el guard
            self.inner.frame_pending.set(false);
        }
    }

    /// Resize: pasada directa, sin throttle
    pub fn on_resize(&self) {
        self.sample_now();
    }

    /// Cambio de ruta: pasada directa + re-muestreos para imágenes tardías
    pub fn on_route_change(&self) {
        self.sample_now();
        for delay_ms in self.inner.config.settle_delays_ms.iter().copied() {
            let weak = Rc::downgrade(&self.inner);
            self.inner.scheduler.after(
                delay_ms,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        BackgroundContrastSampler { inner }.sample_now();
                    }
                }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rgba;
    use crate::test_support::{FakeSurface, ManualScheduler};

    fn edge() -> EdgeSpan {
        EdgeSpan { left: 0.0, top: 760.0, width: 400.0 }
    }

    fn plain(background: Rgba) -> ProbedElement {
        ProbedElement {
            tag_name: "DIV".to_string(),
            background: Some(background),
            ..ProbedElement::default()
        }
    }

    fn dark() -> Option<ProbedElement> {
        Some(plain(Rgba::opaque(20, 20, 20)))
    }

    fn light() -> Option<ProbedElement> {
        Some(plain(Rgba::opaque(250, 250, 250)))
    }

    fn sampler_over(elements: Vec<Option<ProbedElement>>) -> (Rc<FakeSurface>, Rc<ManualScheduler>, BackgroundContrastSampler) {
        let surface = Rc::new(FakeSurface::with_elements(edge(), elements));
        let scheduler = Rc::new(ManualScheduler::default());
        let sampler = BackgroundContrastSampler::new(surface.clone(), scheduler.clone(), ContrastConfig::default());
        (surface, scheduler, sampler)
    }

    #[test]
    fn media_and_carousels_count_as_dark() {
        let img = ProbedElement { tag_name: "IMG".into(), ..ProbedElement::default() };
        let video = ProbedElement { tag_name: "video".into(), ..ProbedElement::default() };
        let slide = ProbedElement { tag_name: "DIV".into(), in_carousel: true, ..ProbedElement::default() };

        assert_eq!(classify(&img, 128.0), Shade::Dark);
        assert_eq!(classify(&video, 128.0), Shade::Dark);
        assert_eq!(classify(&slide, 128.0), Shade::Dark);
    }

    #[test]
    fn dark_class_heuristic() {
        let tagged = |class: &str| ProbedElement {
            tag_name: "SECTION".into(),
            classes: vec!["p-4".into(), class.into()],
            background: Some(Rgba::opaque(255, 255, 255)),
            ..ProbedElement::default()
        };

        assert_eq!(classify(&tagged("bg-black"), 128.0), Shade::Dark);
        assert_eq!(classify(&tagged("bg-black/60"), 128.0), Shade::Dark);
        assert_eq!(classify(&tagged("bg-gray-900"), 128.0), Shade::Dark);
        assert_eq!(classify(&tagged("bg-blackish"), 128.0), Shade::Light);
        assert_eq!(classify(&tagged("text-black"), 128.0), Shade::Light);
    }

    #[test]
    fn luminance_threshold_decides_plain_backgrounds() {
        assert_eq!(classify(&plain(Rgba::opaque(127, 127, 127)), 128.0), Shade::Dark);
        assert_eq!(classify(&plain(Rgba::opaque(128, 128, 128)), 128.0), Shade::Light);
        // un transparente no aporta nada
        assert_eq!(classify(&plain(Rgba { r: 0, g: 0, b: 0, a: 0.0 }), 128.0), Shade::Light);
        assert_eq!(classify(&ProbedElement::default(), 128.0), Shade::Light);
    }

    #[test]
    fn two_of_three_dark_points_switch_to_light_icons() {
        let (_surface, _scheduler, sampler) = sampler_over(vec![dark(), light(), dark()]);
        let sample = sampler.sample_now().unwrap();
        assert_eq!(sample.shades, vec![Shade::Dark, Shade::Light, Shade::Dark]);
        assert!(sample.light_icons);
        assert!(sampler.light_icons());
    }

    #[test]
    fn one_of_three_dark_points_keeps_dark_icons() {
        let (_surface, _scheduler, sampler) = sampler_over(vec![light(), light(), dark()]);
        let sample = sampler.sample_now().unwrap();
        assert!(!sample.light_icons);
        assert!(!sampler.light_icons());
    }

    #[test]
    fn samples_top_edge_with_overlay_hidden_then_restores_it() {
        let (surface, _scheduler, sampler) = sampler_over(vec![light(), light(), light()]);

        sampler.sample_now();

        assert_eq!(*surface.probes.borrow(), vec![(100.0, 760.0), (200.0, 760.0), (300.0, 760.0)]);
        assert_eq!(*surface.hidden_during_probe.borrow(), vec![true, true, true]);
        assert!(!surface.hidden.get());
        assert_eq!(*surface.applied.borrow(), vec![false]);
    }

    #[test]
    fn missing_overlay_skips_pass() {
        let surface = Rc::new(FakeSurface::default());
        let sampler = BackgroundContrastSampler::new(
            surface.clone(),
            Rc::new(ManualScheduler::default()),
            ContrastConfig::default(),
        );

        assert!(sampler.sample_now().is_none());
        assert!(surface.probes.borrow().is_empty());
        assert!(surface.applied.borrow().is_empty());
    }

    #[test]
    fn empty_points_count_as_light() {
        let (_surface, _scheduler, sampler) = sampler_over(vec![None, dark(), None]);
        assert!(!sampler.sample_now().unwrap().light_icons);
    }

    #[test]
    fn scroll_bursts_schedule_one_pass_per_frame() {
        let (surface, scheduler, sampler) = sampler_over(vec![dark(), dark(), dark()]);

        sampler.on_scroll();
        sampler.on_scroll();
        sampler.on_scroll();
        assert_eq!(scheduler.frames.borrow().len(), 1);
        assert!(surface.probes.borrow().is_empty());

        scheduler.run_frames();
        assert_eq!(surface.probes.borrow().len(), 3);
        assert!(sampler.light_icons());

        // el guard se libera al ejecutar el frame
        sampler.on_scroll();
        assert_eq!(scheduler.frames.borrow().len(), 1);
    }

    #[test]
    fn route_change_samples_now_and_after_settle_delays() {
        let (surface, scheduler, sampler) = sampler_over(vec![light(), light(), light()]);

        sampler.on_route_change();
        assert_eq!(surface.probes.borrow().len(), 3);
        assert_eq!(scheduler.delays(), vec![100, 500, 1000]);

        // la imagen de cabecera termina de cargar
        *surface.elements.borrow_mut() = vec![dark(), dark(), light()];
        scheduler.run_delayed();

        assert_eq!(surface.probes.borrow().len(), 12);
        assert!(sampler.light_icons());
    }

    #[test]
    fn icon_subscribers_hear_only_real_changes() {
        let (surface, _scheduler, sampler) = sampler_over(vec![dark(), dark(), light()]);
        let heard = Rc::new(std::cell::RefCell::new(Vec::new()));
        {
            let heard = heard.clone();
            sampler.light_icons_state().subscribe(move |light| heard.borrow_mut().push(*light));
        }

        sampler.sample_now();
        sampler.sample_now();
        *surface.elements.borrow_mut() = vec![light(), light(), light()];
        sampler.sample_now();

        assert_eq!(*heard.borrow(), vec![true, false]);
        assert_eq!(surface.applied.borrow().len(), 3);
    }

    #[test]
    fn unscheduled_frame_releases_scroll_guard() {
        let (surface, scheduler, sampler) = sampler_over(vec![dark(), dark(), dark()]);

        scheduler.refuse_frames.set(true);
        sampler.on_scroll();
        assert!(scheduler.frames.borrow().is_empty());

        scheduler.refuse_frames.set(false);
        sampler.on_scroll();
        assert_eq!(scheduler.frames.borrow().len(), 1);

        scheduler.run_frames();
        assert_eq!(surface.probes.borrow().len(), 3);
    }

    #[test]
    fn resize_is_not_throttled() {
        let (surface, scheduler, sampler) = sampler_over(vec![light(), light(), light()]);
        sampler.on_scroll();
        sampler.on_resize();
        sampler.on_resize();

        assert_eq!(surface.probes.borrow().len(), 6);
        assert_eq!(scheduler.frames.borrow().len(), 1);
    }
}
