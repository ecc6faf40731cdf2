use std::env;
use std::fs;
use std::path::Path;

/// Variables que `AppConfig::from_env()` lee con `option_env!`
const CONFIG_KEYS: [&str; 6] = [
    "BACKEND_URL",
    "ENABLE_LOGGING",
    "POSITION_MAX_AGE_MS",
    "WATCH_TIMEOUT_MS",
    "ONE_SHOT_TIMEOUT_MS",
    "FEED_POLL_INTERVAL_MS",
];

fn main() {
    // Cargar variables de entorno desde .env si existe
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                // Ignorar comentarios y líneas vacías
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                // Parsear KEY=VALUE
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    if !CONFIG_KEYS.contains(&key) {
                        println!("cargo:warning=.env: variable '{}' ignorada", key);
                        continue;
                    }

                    // Solo configurar si no está ya definida
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    }

    // Recompilar si cambia la configuración
    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
}
