// [crates/meshtag-models/src/resume.rs]
//
// =================================================================
// APARATO: RESUME CURSOR (V1.0)
// CLASIFICACION: DOMAIN MODELS (ESTRATO L2)
// RESPONSABILIDAD: PUNTO DE REANUDACION ENTRE FASES DE BUSQUEDA
// =================================================================

use serde::{Deserialize, Serialize};

/// Identifica de cual de las tres fases proviene un [`ResumeCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeType {
    /// Fase A: la unica sala publica conocida.
    PublicRoom,
    /// Fase B: barrido del indice de diccionario.
    Dictionary,
    /// Fase C: enumeracion de fuerza bruta.
    BruteForce,
}

/// Cursor opaco que permite reanudar una busqueda exactamente despues del
/// ultimo candidato verificado, sin reprocesarlo ni saltarse el siguiente.
///
/// `room_name` porta el valor de nombre de sala en si (no un indice interno
/// del enumerador), para que quien invoca el motor pueda construir o
/// inspeccionar un cursor sin tener acceso al estado interno de
/// `meshtag-cracker`: un cursor de fuerza bruta se resuelve de vuelta a un
/// indice global a traves de `room_name_to_global_index` en el enumerador,
/// y un cursor de diccionario se resuelve buscando el valor por igualdad
/// dentro del bucket correspondiente. Una cadena vacia en un cursor de
/// fuerza bruta significa "nada verificado todavia en esta fase".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeCursor {
    /// Fase desde la que se debe reanudar.
    pub phase: ResumeType,
    /// Nombre de sala del ultimo candidato ya verificado (o encontrado).
    /// La reanudacion continua estrictamente *despues* de este valor.
    pub room_name: String,
}

impl ResumeCursor {
    /// Construye un cursor para reanudar despues de `room_name` dentro de
    /// la fase dada.
    #[must_use]
    pub fn after(phase: ResumeType, room_name: impl Into<String>) -> Self {
        Self {
            phase,
            room_name: room_name.into(),
        }
    }
}
