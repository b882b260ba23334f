// [crates/meshtag-models/src/result.rs]
//
// =================================================================
// APARATO: CRACK RESULT (V1.0)
// CLASIFICACION: DOMAIN MODELS (ESTRATO L2)
// RESPONSABILIDAD: FORMA DE SALIDA PUBLICA DE UNA OPERACION DE CRACKEO
// =================================================================

use crate::resume::ResumeCursor;

/// Backend de ejecucion que efectivamente produjo un [`CrackResult`].
///
/// Analogo a `hardware_acceleration_signature` en el reporte de auditoria
/// del linaje minero: permite a quien llama distinguir una corrida
/// acelerada por GPU de una corrida de respaldo escalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendUsed {
    /// El resultado (o el ultimo progreso reportado) provino del backend
    /// acelerado por GPU.
    Gpu,
    /// El resultado provino del backend portable (CPU).
    Cpu,
}

impl std::fmt::Display for BackendUsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gpu => f.write_str("gpu"),
            Self::Cpu => f.write_str("cpu"),
        }
    }
}

/// Resultado de una operacion de crackeo completa, cancelada, o fallida.
#[derive(Debug, Clone)]
pub struct CrackResult {
    /// Nombre de sala recuperado, si la busqueda tuvo exito.
    pub room_name: Option<String>,
    /// Llave AES-128 derivada del nombre de sala recuperado.
    pub key: Option<[u8; 16]>,
    /// Cuerpo del mensaje descifrado, si la busqueda tuvo exito.
    pub message: Option<Vec<u8>>,
    /// Timestamp Unix embebido en el mensaje descifrado.
    pub timestamp: Option<u32>,
    /// Numero total de candidatos verificados a lo largo de la busqueda.
    pub checked: u64,
    /// Mensaje de error legible, si la busqueda fallo (entrada invalida o
    /// fallo de backend). Ausente para una busqueda agotada sin exito.
    pub error: Option<String>,
    /// Cursor de reanudacion si la busqueda fue cancelada o agoto su
    /// presupuesto sin encontrar una coincidencia.
    pub resume_cursor: Option<ResumeCursor>,
    /// Backend que produjo este resultado.
    pub backend_used: BackendUsed,
}

impl CrackResult {
    /// Construye un resultado exitoso.
    ///
    /// `resume_cursor` siempre se establece, incluso en exito: apunta al
    /// propio nombre de sala encontrado, para que una reanudacion posterior
    /// (por ejemplo, tras verificar que el mensaje ya fue procesado) pueda
    /// continuar estrictamente despues de el sin reprocesarlo.
    #[must_use]
    pub fn found(
        room_name: String,
        key: [u8; 16],
        message: Vec<u8>,
        timestamp: u32,
        checked: u64,
        backend_used: BackendUsed,
        resume_cursor: ResumeCursor,
    ) -> Self {
        Self {
            room_name: Some(room_name),
            key: Some(key),
            message: Some(message),
            timestamp: Some(timestamp),
            checked,
            error: None,
            resume_cursor: Some(resume_cursor),
            backend_used,
        }
    }

    /// Construye un resultado de busqueda agotada sin coincidencia.
    ///
    /// `resume_cursor` apunta al final del espacio explorado; reanudar a
    /// partir de el simplemente vuelve a agotarse de inmediato, pero el
    /// contrato publico exige que el campo este presente en toda salida,
    /// exitosa o no.
    #[must_use]
    pub fn exhausted(checked: u64, backend_used: BackendUsed, resume_cursor: ResumeCursor) -> Self {
        Self {
            room_name: None,
            key: None,
            message: None,
            timestamp: None,
            checked,
            error: None,
            resume_cursor: Some(resume_cursor),
            backend_used,
        }
    }

    /// Construye un resultado de busqueda cancelada, portando un cursor
    /// de reanudacion.
    #[must_use]
    pub fn cancelled(checked: u64, resume_cursor: ResumeCursor, backend_used: BackendUsed) -> Self {
        Self {
            room_name: None,
            key: None,
            message: None,
            timestamp: None,
            checked,
            error: None,
            resume_cursor: Some(resume_cursor),
            backend_used,
        }
    }

    /// Construye un resultado de fallo, con un mensaje de error legible.
    #[must_use]
    pub fn failed(error: impl Into<String>, checked: u64, backend_used: BackendUsed) -> Self {
        Self {
            room_name: None,
            key: None,
            message: None,
            timestamp: None,
            checked,
            error: Some(error.into()),
            resume_cursor: None,
            backend_used,
        }
    }
}
