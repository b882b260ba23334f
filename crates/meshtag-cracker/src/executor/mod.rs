// [crates/meshtag-cracker/src/executor/mod.rs]
//
// =================================================================
// APARATO: BATCH EXECUTOR CONTRACT (V1.0)
// CLASIFICACION: DOMAIN STRATEGY (ESTRATO L2)
// RESPONSABILIDAD: CONTRATO COMUN DE LOS BACKENDS DE FUERZA BRUTA
//
// Un solo contrato, dos backends intercambiables: portable (CPU, siempre
// disponible) y acelerado (GPU, oportunista). El orquestador (Fase C) no
// sabe ni le importa cual de los dos esta detras del trait.
// =================================================================

/// Backend auto-ajustable de GPU (`wgpu`).
pub mod accelerator;
/// Sintonizacion automatica del tamano de lote del backend acelerado.
pub mod autotune;
/// Backend portable (CPU, asistido por `rayon` dentro de cada lote).
pub mod portable;

use meshtag_models::{BackendUsed, Packet};

use crate::errors::CrackerError;

/// Tamano de lote fijo del backend portable, sin auto-ajuste.
///
/// Sintonizado para la localidad de cache de un lote de derivaciones de
/// llave y verificaciones de tag sobre CPU.
pub const PORTABLE_BATCH_SIZE: usize = 1024;

/// Ejecutor por lotes: recibe un conjunto de nombres de sala candidatos ya
/// decodificados y devuelve los que superan el filtro de hash de canal y
/// el tag de verificacion de 2 bytes.
///
/// La verificacion fina (descifrado y filtros de plausibilidad) ocurre
/// fuera del ejecutor, sobre el puñado de candidatos que ya pasaron estos
/// dos filtros baratos.
pub trait BatchExecutor {
    /// Evalua un lote de candidatos contra un paquete, devolviendo los
    /// nombres de sala que superan hash de canal y tag.
    ///
    /// # Errors
    ///
    /// Retorna [`CrackerError::AcceleratorUnavailable`] si el backend
    /// acelerado falla durante el despacho de este lote.
    fn execute_batch(
        &mut self,
        candidates: &[String],
        packet: &Packet,
    ) -> Result<Vec<String>, CrackerError>;

    /// Identifica que backend produjo los resultados de este ejecutor.
    fn backend(&self) -> BackendUsed;

    /// Tamano de lote actualmente en uso (puede cambiar tras el primer
    /// lote en el backend acelerado, ver [`autotune`]).
    fn batch_size(&self) -> usize;
}
