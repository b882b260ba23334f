// [crates/meshtag-models/src/options.rs]
//
// =================================================================
// APARATO: CRACK OPTIONS (V1.0)
// CLASIFICACION: DOMAIN MODELS (ESTRATO L2)
// RESPONSABILIDAD: SUPERFICIE DE CONFIGURACION DE UNA BUSQUEDA
//
// Superficie de configuracion plana con un `Default` razonable, en el
// mismo estilo que `WorkOrder`/`SearchStrategy`: sin un framework de
// configuracion aparte, solo un struct con valores por defecto sensatos.
// =================================================================

use crate::resume::ResumeCursor;

/// Backend de ejecucion preferido para la fase de fuerza bruta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredBackend {
    /// Usa el backend acelerado por GPU si esta disponible, con fallback
    /// automatico al backend portable.
    Auto,
    /// Fuerza el backend portable (CPU), util para pruebas deterministas.
    PortableOnly,
}

impl Default for PreferredBackend {
    fn default() -> Self {
        Self::Auto
    }
}

/// Opciones de configuracion de una operacion de crackeo.
///
/// La Fase A no aparece aqui: siempre prueba el nombre de sala publica fijo
/// del protocolo (`meshtag_models::PUBLIC_ROOM_NAME`), nunca uno provisto
/// por quien invoca el motor.
#[derive(Debug, Clone)]
pub struct CrackOptions {
    /// Backend de ejecucion preferido para la Fase C.
    pub preferred_backend: PreferredBackend,
    /// Ventana de tolerancia, en segundos, alrededor del tiempo actual
    /// dentro de la cual un timestamp descifrado se considera plausible.
    /// Por defecto, 30 dias (`2_592_000` segundos).
    pub timestamp_window_seconds: i64,
    /// Longitud minima de nombre de sala a explorar en la Fase C.
    pub starting_length: usize,
    /// Longitud maxima de nombre de sala a explorar en la Fase C.
    pub max_room_name_length: usize,
    /// Si la Fase B (barrido de diccionario) se ejecuta. Desactivarla salta
    /// directamente de la Fase A a la Fase C.
    pub use_dictionary: bool,
    /// Si el filtro de ventana de timestamp de la cadena de filtros esta
    /// activo.
    pub use_timestamp_filter: bool,
    /// Si el filtro de verosimilitud UTF-8 de la cadena de filtros esta
    /// activo.
    pub use_utf8_filter: bool,
    /// Duracion objetivo, en milisegundos, del primer despacho del backend
    /// acelerado; gobierna a que tamano de lote se auto-ajusta
    /// [`crate::progress`]-adjacent `BatchSizeTuner`. Por defecto, `1000`.
    pub gpu_dispatch_ms: u64,
    /// Cursor de reanudacion, si esta operacion continua una busqueda
    /// previamente cancelada o agotada.
    pub resume_from: Option<ResumeCursor>,
}

impl Default for CrackOptions {
    fn default() -> Self {
        Self {
            preferred_backend: PreferredBackend::default(),
            timestamp_window_seconds: 2_592_000,
            starting_length: 1,
            max_room_name_length: 8,
            use_dictionary: true,
            use_timestamp_filter: true,
            use_utf8_filter: true,
            gpu_dispatch_ms: 1000,
            resume_from: None,
        }
    }
}
