// [crates/meshtag-models/src/dictionary.rs]
//
// =================================================================
// APARATO: DICTIONARY INDEX (V1.0)
// CLASIFICACION: DOMAIN MODELS (ESTRATO L2)
// RESPONSABILIDAD: ESTRUCTURA DE DATOS DEL INDICE DE DICCIONARIO BUCKETIZADO
//
// El indice en si es una estructura de datos pasiva; la logica de
// construccion y consulta vive en el motor de busqueda (meshtag-cracker),
// que es quien sabe como el hash de canal guia el bucket relevante.
// =================================================================

/// Una palabra de diccionario ya normalizada y lista para ser probada
/// como candidato de nombre de sala.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedWord {
    /// Texto normalizado (minusculas, recortado, validado contra el alfabeto).
    pub word: String,
    /// Bucket (0-255) al que pertenece, derivado de su hash de canal esperado.
    pub bucket: u8,
}

/// Numero de buckets del indice de diccionario: uno por cada valor posible
/// de hash de canal de un byte.
pub const BUCKET_COUNT: usize = 256;

/// Indice de diccionario particionado en 256 buckets por hash de canal,
/// construido en un solo barrido lineal sobre la lista de palabras fuente.
#[derive(Debug, Clone, Default)]
pub struct DictionaryIndex {
    buckets: Vec<Vec<IndexedWord>>,
}

impl DictionaryIndex {
    /// Crea un indice vacio con los 256 buckets ya reservados.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            buckets: vec![Vec::new(); BUCKET_COUNT],
        }
    }

    /// Inserta una palabra ya indexada en su bucket correspondiente.
    pub fn insert(&mut self, word: IndexedWord) {
        let bucket = word.bucket as usize;
        self.buckets[bucket].push(word);
    }

    /// Devuelve las palabras almacenadas en un bucket dado.
    #[must_use]
    pub fn bucket(&self, bucket: u8) -> &[IndexedWord] {
        &self.buckets[bucket as usize]
    }

    /// Numero total de palabras indexadas a traves de todos los buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// `true` si el indice no contiene ninguna palabra.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Itera sobre todas las palabras indexadas, bucket por bucket, en
    /// orden ascendente de bucket y orden de insercion dentro de cada uno.
    pub fn iter(&self) -> impl Iterator<Item = &IndexedWord> {
        self.buckets.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_index_has_256_buckets_and_zero_words() {
        let index = DictionaryIndex::empty();
        assert_eq!(index.len(), 0);
        assert!(index.is_empty());
        assert!(index.bucket(255).is_empty());
    }

    #[test]
    fn insert_places_word_in_its_declared_bucket() {
        let mut index = DictionaryIndex::empty();
        index.insert(IndexedWord {
            word: "general".to_string(),
            bucket: 7,
        });
        assert_eq!(index.bucket(7).len(), 1);
        assert_eq!(index.len(), 1);
    }
}
