// [crates/meshtag-models/src/progress.rs]
//
// =================================================================
// APARATO: PROGRESS REPORT (V1.0)
// CLASIFICACION: DOMAIN MODELS (ESTRATO L2)
// RESPONSABILIDAD: TELEMETRIA DE AVANCE DE UNA BUSQUEDA EN CURSO
// =================================================================

use serde::{Deserialize, Serialize};

use crate::resume::ResumeType;

/// Intervalo minimo, en milisegundos, entre dos emisiones sucesivas de
/// [`ProgressReport`] durante una misma fase.
pub const MIN_EMIT_INTERVAL_MILLIS: u64 = 200;

/// Reporte de avance emitido periodicamente por el orquestador de busqueda.
///
/// `checked` es monotonamente creciente dentro de una misma fase; `total`
/// es `None` cuando el tamano del espacio de candidatos no es conocido de
/// antemano (por ejemplo, mientras se autoajusta el tamano de lote del
/// backend acelerado).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Fase actualmente en progreso.
    pub phase: ResumeType,
    /// Numero de candidatos ya verificados dentro de la fase actual.
    pub checked: u64,
    /// Tamano total del espacio de candidatos de la fase, si se conoce.
    pub total: Option<u64>,
    /// Candidatos verificados por segundo, promediado desde el inicio de
    /// la fase (analogo a `average_computational_efficiency` en H/ms).
    pub rate_per_second: f64,
    /// Tiempo estimado restante, en segundos, si `total` es conocido.
    pub eta_seconds: Option<f64>,
}

impl ProgressReport {
    /// Construye un reporte de avance, calculando `rate_per_second` y
    /// `eta_seconds` a partir de los contadores crudos.
    #[must_use]
    pub fn new(
        phase: ResumeType,
        checked: u64,
        total: Option<u64>,
        elapsed_seconds: f64,
    ) -> Self {
        let rate_per_second = if elapsed_seconds > 0.0 {
            checked as f64 / elapsed_seconds
        } else {
            0.0
        };

        let eta_seconds = match total {
            Some(total) if rate_per_second > 0.0 && total > checked => {
                Some((total - checked) as f64 / rate_per_second)
            }
            _ => None,
        };

        Self {
            phase,
            checked,
            total,
            rate_per_second,
            eta_seconds,
        }
    }
}
