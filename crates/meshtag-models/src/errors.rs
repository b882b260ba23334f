// [crates/meshtag-models/src/errors.rs]
// =================================================================
// APARATO: MODEL ERRORS
// RESPONSABILIDAD: CATALOGO DE FALLOS DE VALIDACION DE DOMINIO
// =================================================================

use thiserror::Error;

/// Errores de validacion de los tipos de dominio.
#[derive(Error, Debug)]
pub enum ModelError {
    /// El nombre de sala contiene un glifo fuera del alfabeto permitido
    /// (`a-z0-9` como glifos de frontera, mas `-` como glifo interior).
    #[error("glifo invalido '{0}' en la posicion {1} del nombre de sala")]
    InvalidGlyph(char, usize),

    /// El nombre de sala esta vacio.
    #[error("el nombre de sala no puede estar vacio")]
    EmptyRoomName,

    /// El nombre de sala comienza o termina con el glifo interior `-`.
    #[error("el nombre de sala no puede empezar ni terminar con '-'")]
    DashAtBoundary,

    /// El paquete recibido es mas corto que el encabezado minimo
    /// (1 byte de hash de canal + 2 bytes de tag).
    #[error("paquete demasiado corto: se recibieron {0} bytes, se requieren al menos 3")]
    PacketTooShort(usize),
}
