// [crates/meshtag-models/src/lib.rs]

#![deny(missing_docs)]

//! # APARATO: MODELS STRATUM ROOT
//! CLASIFICACION: DOMAIN MODELS (ESTRATO L2)
//! RESPONSABILIDAD: DEFINICION DE TIPOS COMPARTIDOS DEL DOMINIO DE CRACKEO
//!
//! Unica fuente de verdad para los tipos de datos que cruzan las fronteras
//! entre el motor de busqueda y quien lo invoca: nombres de sala validados,
//! el layout de bytes de un paquete, el indice de diccionario, cursores de
//! reanudacion, reportes de avance, opciones de configuracion y la forma
//! de un resultado de crackeo.

/// Indice de diccionario bucketizado por hash de canal.
pub mod dictionary;
/// Catalogo de errores de validacion de dominio.
pub mod errors;
/// Superficie de configuracion de una operacion de crackeo.
pub mod options;
/// Layout de bytes de un paquete group-text cifrado.
pub mod packet;
/// Reportes de avance periodicos de una busqueda en curso.
pub mod progress;
/// Nombres de sala validados sobre el alfabeto de dos niveles.
pub mod room_name;
/// Cursores opacos de reanudacion entre fases de busqueda.
pub mod resume;
/// Forma de salida de una operacion de crackeo.
pub mod result;

pub use crate::dictionary::{DictionaryIndex, IndexedWord, BUCKET_COUNT};
pub use crate::errors::ModelError;
pub use crate::options::{CrackOptions, PreferredBackend};
pub use crate::packet::Packet;
pub use crate::progress::{ProgressReport, MIN_EMIT_INTERVAL_MILLIS};
pub use crate::resume::{ResumeCursor, ResumeType};
pub use crate::result::{BackendUsed, CrackResult};
pub use crate::room_name::{RoomName, BOUNDARY_ALPHABET, INTERIOR_ALPHABET, PUBLIC_ROOM_NAME};

pub use meshtag_crypto::DecryptedFrame;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certify_stratum_visibility() {
        let _room_name_id = std::any::TypeId::of::<RoomName>();
        let _packet_id = std::any::TypeId::of::<Packet>();
        let _result_id = std::any::TypeId::of::<CrackResult>();
    }
}
