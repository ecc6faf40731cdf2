// ============================================================================
// CONTRASTE - Muestras del fondo bajo la barra de navegación
// ============================================================================

/// Color CSS ya computado por el navegador (`rgb(...)` / `rgba(...)`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parsear el formato de `getComputedStyle(...).backgroundColor`
    pub fn parse_css(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("transparent") {
            return Some(Self { r: 0, g: 0, b: 0, a: 0.0 });
        }

        let inner = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))?
            .strip_suffix(')')?;

        let parts: Vec<&str> = inner
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect();

        if parts.len() < 3 {
            return None;
        }

        let channel = |raw: &str| raw.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
        let alpha = match parts.get(3) {
            Some(raw) => match raw.strip_suffix('%') {
                Some(percent) => percent.parse::<f32>().ok()? / 100.0,
                None => raw.parse::<f32>().ok()?,
            },
            None => 1.0,
        };

        Some(Self {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
            a: alpha.clamp(0.0, 1.0),
        })
    }

    /// Luminancia percibida ITU-R BT.601 (0..255)
    pub fn luminance(&self) -> f64 {
        0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

/// Lo que hay debajo de un punto muestreado
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbedElement {
    /// En mayúsculas, como `Element.tagName`
    pub tag_name: String,
    pub classes: Vec<String>,
    /// `data-bg="dark"` en el elemento
    pub dark_marker: bool,
    /// Dentro de un carrusel de fotos
    pub in_carousel: bool,
    /// Primer fondo opaco subiendo por los ancestros
    pub background: Option<Rgba>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Dark,
    Light,
}

/// Borde superior del overlay en coordenadas de viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSpan {
    pub left: f64,
    pub top: f64,
    pub width: f64,
}

impl EdgeSpan {
    pub fn point_at(&self, fraction: f64) -> (f64, f64) {
        (self.left + self.width * fraction, self.top)
    }
}

/// Resultado de una pasada (se recalcula desde cero cada vez)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContrastSample {
    pub shades: Vec<Shade>,
    pub light_icons: bool,
}

impl ContrastSample {
    pub fn dark_count(&self) -> usize {
        self.shades.iter().filter(|shade| **shade == Shade::Dark).count()
    }
}
