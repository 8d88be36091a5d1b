//! Zentrale Konfiguration der Spline-Engine.
//!
//! `SplineOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Distanztabellen ─────────────────────────────────────────────────

/// Stützstellen pro Segment-Distanztabelle.
pub const DISTANCE_TABLE_SAMPLES: usize = 16;

// ── Suche ───────────────────────────────────────────────────────────

/// Abbruch-Intervallbreite der Nächster-Punkt-Bisektion (lokaler Parameter).
pub const CLOSEST_POINT_TOLERANCE: f32 = 0.0001;
/// Projizierte Distanzen, die weniger als dieser Wert auseinanderliegen, gelten bei der
/// Strahl-Suche als gleich; dann entscheidet die echte 3D-Distanz.
pub const RAY_TIE_TOLERANCE: f32 = 0.001;

// ── Vorrücken ───────────────────────────────────────────────────────

/// Obergrenze der Schritte in `advance_to_world_distance`.
pub const ADVANCE_MAX_ITERATIONS: usize = 1000;
/// Zulässiger Fehler der Luftlinie in `advance_to_world_distance` (Welteinheiten).
pub const ADVANCE_TOLERANCE: f32 = 0.001;

// ── Abtastung ───────────────────────────────────────────────────────

/// Obergrenze der Abstände in `sample_evenly`, unabhängig vom gewünschten Abstand.
pub const MAX_EVEN_SAMPLES: usize = 10_000;

// ── Nodes ───────────────────────────────────────────────────────────

/// Automatik-Tangentenlänge für neu erzeugte Nodes (Split).
pub const DEFAULT_AUTO_TANGENT_LENGTH: f32 = crate::core::DEFAULT_AUTO_TANGENT_LENGTH;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Engine-Optionen.
/// Wird als `spline_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SplineOptions {
    // ── Distanztabellen ─────────────────────────────────────────
    /// Stützstellen pro Segment (mindestens 2)
    #[serde(default = "default_distance_table_samples")]
    pub distance_table_samples: usize,

    // ── Suche ───────────────────────────────────────────────────
    /// Abbruch-Intervallbreite der Bisektion
    #[serde(default = "default_closest_point_tolerance")]
    pub closest_point_tolerance: f32,
    /// Gleichstands-Toleranz der projizierten Distanz bei Strahl-Abfragen
    #[serde(default = "default_ray_tie_tolerance")]
    pub ray_tie_tolerance: f32,

    // ── Vorrücken ───────────────────────────────────────────────
    /// Maximale Schrittanzahl
    #[serde(default = "default_advance_max_iterations")]
    pub advance_max_iterations: usize,
    /// Zulässiger Luftlinien-Fehler
    #[serde(default = "default_advance_tolerance")]
    pub advance_tolerance: f32,

    // ── Abtastung ───────────────────────────────────────────────
    /// Maximale Abstandsanzahl bei gleichmäßiger Abtastung
    #[serde(default = "default_max_even_samples")]
    pub max_even_samples: usize,

    // ── Nodes ───────────────────────────────────────────────────
    /// Automatik-Tangentenlänge für Split-Nodes
    #[serde(default = "default_auto_tangent_length")]
    pub default_auto_tangent_length: f32,
}

impl Default for SplineOptions {
    fn default() -> Self {
        Self {
            distance_table_samples: DISTANCE_TABLE_SAMPLES,
            closest_point_tolerance: CLOSEST_POINT_TOLERANCE,
            ray_tie_tolerance: RAY_TIE_TOLERANCE,
            advance_max_iterations: ADVANCE_MAX_ITERATIONS,
            advance_tolerance: ADVANCE_TOLERANCE,
            max_even_samples: MAX_EVEN_SAMPLES,
            default_auto_tangent_length: DEFAULT_AUTO_TANGENT_LENGTH,
        }
    }
}

// Serde-Defaults für Abwärtskompatibilität unvollständiger TOML-Dateien
fn default_distance_table_samples() -> usize {
    DISTANCE_TABLE_SAMPLES
}

fn default_closest_point_tolerance() -> f32 {
    CLOSEST_POINT_TOLERANCE
}

fn default_ray_tie_tolerance() -> f32 {
    RAY_TIE_TOLERANCE
}

fn default_advance_max_iterations() -> usize {
    ADVANCE_MAX_ITERATIONS
}

fn default_advance_tolerance() -> f32 {
    ADVANCE_TOLERANCE
}

fn default_max_even_samples() -> usize {
    MAX_EVEN_SAMPLES
}

fn default_auto_tangent_length() -> f32 {
    DEFAULT_AUTO_TANGENT_LENGTH
}

impl SplineOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<SplineOptions>(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts.sanitized()
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("spline_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("spline_editor.toml")
    }

    /// Klemmt unsinnige Werte aus Dateien in den gültigen Bereich.
    pub fn sanitized(mut self) -> Self {
        if self.distance_table_samples < 2 {
            log::warn!(
                "distance_table_samples = {} ist zu klein, verwende 2",
                self.distance_table_samples
            );
            self.distance_table_samples = 2;
        }
        self.closest_point_tolerance = self.closest_point_tolerance.max(f32::EPSILON);
        self.ray_tie_tolerance = self.ray_tie_tolerance.max(0.0);
        self.advance_max_iterations = self.advance_max_iterations.max(1);
        self.advance_tolerance = self.advance_tolerance.max(f32::EPSILON);
        self.max_even_samples = self.max_even_samples.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let opts: SplineOptions =
            toml::from_str("distance_table_samples = 32\n").expect("gültiges TOML");

        assert_eq!(opts.distance_table_samples, 32);
        assert_eq!(opts.advance_max_iterations, ADVANCE_MAX_ITERATIONS);
        assert_eq!(opts.ray_tie_tolerance, RAY_TIE_TOLERANCE);
        assert_eq!(opts.max_even_samples, MAX_EVEN_SAMPLES);
    }

    #[test]
    fn test_toml_roundtrip_keeps_values() {
        let opts = SplineOptions {
            closest_point_tolerance: 0.01,
            advance_max_iterations: 12,
            ..SplineOptions::default()
        };

        let text = toml::to_string_pretty(&opts).expect("serialisierbar");
        let parsed: SplineOptions = toml::from_str(&text).expect("parsebar");

        assert_eq!(parsed, opts);
    }

    #[test]
    fn test_sanitized_clamps_sample_count() {
        let opts = SplineOptions {
            distance_table_samples: 0,
            advance_max_iterations: 0,
            ..SplineOptions::default()
        }
        .sanitized();

        assert_eq!(opts.distance_table_samples, 2);
        assert_eq!(opts.advance_max_iterations, 1);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("spline_editor_missing_options.toml");
        let _ = std::fs::remove_file(&path);

        assert_eq!(SplineOptions::load_from_file(&path), SplineOptions::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join("spline_editor_options_roundtrip.toml");
        let opts = SplineOptions {
            distance_table_samples: 24,
            ..SplineOptions::default()
        };

        opts.save_to_file(&path).expect("schreibbar");
        let loaded = SplineOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, opts);
    }
}
