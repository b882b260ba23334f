// [crates/meshtag-cracker/src/errors.rs]
// =================================================================
// APARATO: CRACKER ERRORS
// RESPONSABILIDAD: CATALOGO DE FALLOS DEL MOTOR DE BUSQUEDA
// =================================================================

use thiserror::Error;

/// Errores que puede producir el motor de busqueda.
///
/// El triaje de tres vias (entrada invalida / fallo de backend / agotado sin
/// exito) se preserva en la forma publica de [`meshtag_models::CrackResult`]:
/// las variantes de entrada invalida y de fallo de backend se convierten en
/// `CrackResult.error`; un agotamiento sin exito no es un [`CrackerError`].
#[derive(Error, Debug)]
pub enum CrackerError {
    /// Los datos del paquete no pudieron interpretarse.
    #[error(transparent)]
    InvalidPacket(#[from] meshtag_models::ModelError),

    /// La entrada hexadecimal no pudo decodificarse a bytes.
    #[error(transparent)]
    InvalidHex(#[from] meshtag_crypto::CryptoError),

    /// El backend acelerado por GPU no pudo inicializarse o fallo durante
    /// el despacho de un lote.
    #[error("fallo de backend acelerado: {0}")]
    AcceleratorUnavailable(String),

    /// No se pudo descargar o leer una lista de palabras.
    #[error("fallo al cargar la lista de palabras: {0}")]
    WordlistLoadFailed(String),
}
