// [crates/meshtag-models/src/room_name.rs]
//
// =================================================================
// APARATO: ROOM NAME (V1.0)
// CLASIFICACION: DOMAIN MODELS (ESTRATO L2)
// RESPONSABILIDAD: VALIDACION DEL ALFABETO DE NOMBRES DE SALA
// =================================================================

use crate::errors::ModelError;

/// Glifos de frontera: validos en la primera y ultima posicion de un
/// nombre de sala (36 simbolos: `a-z0-9`).
pub const BOUNDARY_ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Glifos interiores: validos en posiciones intermedias (37 simbolos: los
/// 36 de frontera mas `-`).
pub const INTERIOR_ALPHABET: &[u8; 37] = b"abcdefghijklmnopqrstuvwxyz0123456789-";

/// Nombre de la unica sala publica conocida por el protocolo, probada
/// siempre primero (Fase A). Es una constante fija del protocolo, no una
/// opcion configurable por quien invoca el motor: su forma (corchetes
/// dobles mas un espacio) la mantiene fuera del espacio enumerable por
/// [`BOUNDARY_ALPHABET`]/[`INTERIOR_ALPHABET`], asi que nunca colisiona con
/// un candidato de fuerza bruta.
pub const PUBLIC_ROOM_NAME: &str = "[[public room]]";

/// Un nombre de sala validado, de longitud arbitraria, sobre el alfabeto
/// de dos niveles (frontera / interior) del protocolo.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomName(String);

impl RoomName {
    /// Valida y envuelve una cadena candidata como un nombre de sala.
    ///
    /// # Errors
    ///
    /// Retorna [`ModelError::EmptyRoomName`] si `candidate` esta vacio,
    /// [`ModelError::InvalidGlyph`] si contiene un caracter fuera del
    /// alfabeto permitido para su posicion, o [`ModelError::DashAtBoundary`]
    /// si el primer o ultimo caracter es `-`.
    pub fn new(candidate: impl Into<String>) -> Result<Self, ModelError> {
        let candidate = candidate.into();
        if candidate.is_empty() {
            return Err(ModelError::EmptyRoomName);
        }

        let chars: Vec<char> = candidate.chars().collect();
        let last = chars.len() - 1;
        for (index, ch) in chars.iter().enumerate() {
            let allowed: &[u8] = if index == 0 || index == last {
                BOUNDARY_ALPHABET
            } else {
                INTERIOR_ALPHABET
            };
            if !ch.is_ascii() || !allowed.contains(&(*ch as u8)) {
                return Err(ModelError::InvalidGlyph(*ch, index));
            }
        }

        if chars[0] == '-' || chars[last] == '-' {
            return Err(ModelError::DashAtBoundary);
        }

        Ok(Self(candidate))
    }

    /// Vista de cadena del nombre de sala validado.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
