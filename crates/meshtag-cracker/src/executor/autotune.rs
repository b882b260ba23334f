// [crates/meshtag-cracker/src/executor/autotune.rs]
//
// =================================================================
// APARATO: BATCH SIZE AUTOTUNER (V1.0)
// CLASIFICACION: DOMAIN STRATEGY (ESTRATO L2)
// RESPONSABILIDAD: SINTONIZACION DE UNA SOLA PASADA DEL TAMANO DE LOTE GPU
//
// Mide el tiempo de pared del primer despacho a tamano completo, escala
// por T_objetivo / t, redondea a la potencia de dos mas cercana sin bajar
// del tamano inicial, y congela para el resto del crackeo. Un solo ajuste
// adaptativo, nunca re-sintonizado.
// =================================================================

use std::time::Duration;

/// Duracion objetivo por defecto, en milisegundos, para el primer despacho
/// del backend acelerado, cuando quien invoca el motor no especifica
/// `gpu_dispatch_ms` en sus opciones.
pub const DEFAULT_TARGET_DISPATCH_MILLIS: u64 = 1000;

/// Sintonizador de tamano de lote de una sola pasada.
///
/// Observa la duracion del primer despacho a `initial_size` y calcula un
/// nuevo tamano escalado a la duracion objetivo; una vez congelado, ya no
/// cambia, sin importar cuantas observaciones adicionales se le pasen.
#[derive(Debug, Clone, Copy)]
pub struct BatchSizeTuner {
    current_size: usize,
    frozen: bool,
    target_millis: f64,
}

impl BatchSizeTuner {
    /// Construye un sintonizador arrancando en `initial_size`, con la
    /// duracion objetivo por defecto ([`DEFAULT_TARGET_DISPATCH_MILLIS`]).
    #[must_use]
    pub fn new(initial_size: usize) -> Self {
        Self::with_target_millis(initial_size, DEFAULT_TARGET_DISPATCH_MILLIS)
    }

    /// Construye un sintonizador arrancando en `initial_size`, con una
    /// duracion objetivo configurable (`gpu_dispatch_ms` en las opciones
    /// de busqueda).
    #[must_use]
    pub fn with_target_millis(initial_size: usize, target_millis: u64) -> Self {
        Self {
            current_size: initial_size,
            frozen: false,
            target_millis: target_millis as f64,
        }
    }

    /// Tamano de lote actual (inicial, o ya ajustado y congelado).
    #[must_use]
    pub fn current_size(&self) -> usize {
        self.current_size
    }

    /// `true` si el tamano ya fue ajustado y no cambiara mas.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Registra la duracion de un despacho. Solo la primera observacion
    /// tiene efecto: escala el tamano actual por `objetivo / observado`,
    /// redondea a la potencia de dos mas cercana sin bajar del tamano
    /// inicial, y congela el sintonizador.
    pub fn observe(&mut self, elapsed: Duration) {
        if self.frozen {
            return;
        }

        let observed_millis = elapsed.as_secs_f64() * 1000.0;

        if observed_millis > 0.0 {
            let scale = self.target_millis / observed_millis;
            let scaled = (self.current_size as f64 * scale).round().max(1.0) as usize;
            let nearest = nearest_power_of_two(scaled);
            let floor = self.current_size.max(1).next_power_of_two();
            self.current_size = nearest.max(floor);
        }

        self.frozen = true;
    }
}

fn nearest_power_of_two(value: usize) -> usize {
    if value <= 1 {
        return 1;
    }
    let lower = 1usize << (usize::BITS - 1 - value.leading_zeros());
    let upper = lower.saturating_mul(2);
    if value - lower <= upper - value {
        lower
    } else {
        upper
    }
}
