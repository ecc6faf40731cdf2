/// URL base del backend si no se define `BACKEND_URL` al compilar
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Todas las rutas de la API cuelgan de aquí
pub const API_PREFIX: &str = "/api";

/// Clave de localStorage donde el login guarda el JWT
pub const TOKEN_STORAGE_KEY: &str = "token";

// GPS
pub const POSITION_MAX_AGE_MS: u32 = 30_000;
pub const WATCH_TIMEOUT_MS: u32 = 30_000;
pub const ONE_SHOT_TIMEOUT_MS: u32 = 10_000;

// Feed de cruces / notificaciones
pub const FEED_POLL_INTERVAL_MS: u32 = 30_000;
pub const BOUNCE_DURATION_MS: u32 = 400;
pub const BADGE_ELEMENT_ID: &str = "notification-badge";

// Contraste de la barra de navegación
pub const OVERLAY_ELEMENT_ID: &str = "bottom-nav";
pub const SAMPLE_FRACTIONS: [f64; 3] = [0.25, 0.5, 0.75];
pub const LUMINANCE_THRESHOLD: f64 = 128.0;
pub const DARK_VOTES_NEEDED: usize = 2;
pub const ROUTE_SETTLE_DELAYS_MS: [u32; 3] = [100, 500, 1000];

/// Tags que se consideran fondo oscuro/cargado por defecto
pub const MEDIA_TAGS: [&str; 4] = ["IMG", "VIDEO", "PICTURE", "CANVAS"];

/// Clases de fondo oscuro (también con opacidad, p.ej. `bg-black/60`)
pub const DARK_CLASS_TOKENS: [&str; 8] = [
    "bg-black",
    "bg-lookup-black",
    "bg-dark",
    "bg-gray-800",
    "bg-gray-900",
    "bg-neutral-900",
    "bg-zinc-900",
    "bg-slate-900",
];

pub const CAROUSEL_SELECTOR: &str = "[data-carousel], .carousel";

// Eventos de ventana que emite el resto de la app
pub const LOGIN_EVENT: &str = "lookup:login";
pub const LOGOUT_EVENT: &str = "lookup:logout";
pub const LOGGED_OUT_EVENT: &str = "lookup:logged-out";
pub const ROUTE_CHANGE_EVENT: &str = "lookup:route-change";

// Eventos que emite este módulo (el valor se lee con los getters exportados)
pub const CROSSINGS_UPDATED_EVENT: &str = "lookup:crossings";
pub const ICONS_CHANGED_EVENT: &str = "lookup:icons";
