// [crates/meshtag-cracker/src/enumerator.rs]
//
// =================================================================
// APARATO: CANDIDATE ENUMERATOR (V1.0)
// CLASIFICACION: DOMAIN STRATEGY (ESTRATO L2)
// RESPONSABILIDAD: INDEXACION BIYECTIVA DEL ESPACIO DE NOMBRES DE SALA
//
// Enumera el espacio de nombres de sala candidatos para la fase de fuerza
// bruta mediante una indexacion de radix mixto sobre un alfabeto de dos
// niveles: 36 glifos de frontera (a-z0-9) en la primera y ultima posicion,
// 37 glifos interiores (frontera + '-') en las posiciones intermedias.
// =================================================================

use meshtag_models::{BOUNDARY_ALPHABET, INTERIOR_ALPHABET};

/// Cuenta cuantos nombres de sala existen para una longitud dada, bajo la
/// convencion de producto simple documentada: `36` para `L = 1`,
/// `36 * 37^(L-2) * 36` para `L >= 2`.
///
/// Esta convencion sobrecuenta: algunos indices en el rango `[0, total)`
/// decodifican a cadenas que contienen `--` (dos glifos interiores `-`
/// adyacentes), que el protocolo no permite. [`index_to_room_name`] retorna
/// `None` para esos indices en lugar de intentar remapearlos, preservando
/// un conteo simple a costa de "huecos" documentados en el espacio de
/// indices.
#[must_use]
pub fn count_names_for_length(length: usize) -> u64 {
    match length {
        0 => 0,
        1 => 36,
        _ => {
            let interior_positions = (length - 2) as u32;
            36 * 37u64.pow(interior_positions) * 36
        }
    }
}

/// Decodifica un indice de radix mixto, dentro del rango de `length`, a su
/// nombre de sala candidato.
///
/// Retorna `None` si `index` esta fuera de `[0, count_names_for_length(length))`
/// o si decodifica a una cadena con `--` adyacente (ver la nota de
/// sobrecuenta en [`count_names_for_length`]).
#[must_use]
pub fn index_to_room_name(index: u64, length: usize) -> Option<String> {
    let total = count_names_for_length(length);
    if length == 0 || index >= total {
        return None;
    }

    if length == 1 {
        return Some((BOUNDARY_ALPHABET[index as usize] as char).to_string());
    }

    // Radixes en orden de significancia decreciente: frontera, interiores, frontera.
    let mut radixes = Vec::with_capacity(length);
    radixes.push(36u64);
    radixes.extend(std::iter::repeat(37u64).take(length - 2));
    radixes.push(36u64);

    let mut digits = vec![0u64; length];
    let mut remaining = index;
    for i in (0..length).rev() {
        digits[i] = remaining % radixes[i];
        remaining /= radixes[i];
    }

    let mut name = String::with_capacity(length);
    name.push(BOUNDARY_ALPHABET[digits[0] as usize] as char);
    for &digit in &digits[1..length - 1] {
        name.push(INTERIOR_ALPHABET[digit as usize] as char);
    }
    name.push(BOUNDARY_ALPHABET[digits[length - 1] as usize] as char);

    if name.contains("--") {
        return None;
    }

    Some(name)
}

/// Inversa de [`index_to_room_name`]: recupera el indice de radix mixto de
/// `name` dentro del espacio de su propia longitud.
///
/// Retorna `None` si `name` no esta formado enteramente por glifos del
/// alfabeto permitido en cada posicion (frontera / interior) o si esta
/// vacio. No valida contra `--` explicitamente: una cadena con guiones
/// adyacentes nunca aparece como salida de [`index_to_room_name`], pero si
/// se le pasa una de todas formas aqui se decodifica igual, ya que el
/// propio radix mixto no distingue ese caso (ver la nota de sobrecuenta).
#[must_use]
pub fn room_name_to_index(name: &str) -> Option<u64> {
    let chars: Vec<char> = name.chars().collect();
    let length = chars.len();
    if length == 0 {
        return None;
    }

    let glyph_digit = |ch: char, alphabet: &[u8]| -> Option<u64> {
        if !ch.is_ascii() {
            return None;
        }
        alphabet.iter().position(|&b| b == ch as u8).map(|p| p as u64)
    };

    if length == 1 {
        return glyph_digit(chars[0], BOUNDARY_ALPHABET);
    }

    let mut radixes = Vec::with_capacity(length);
    radixes.push(36u64);
    radixes.extend(std::iter::repeat(37u64).take(length - 2));
    radixes.push(36u64);

    let last = length - 1;
    let mut index = 0u64;
    for (position, &ch) in chars.iter().enumerate() {
        let alphabet: &[u8] = if position == 0 || position == last {
            BOUNDARY_ALPHABET
        } else {
            INTERIOR_ALPHABET
        };
        let digit = glyph_digit(ch, alphabet)?;
        index = index * radixes[position] + digit;
    }

    Some(index)
}

/// Combina [`room_name_to_index`] con [`cumulative_offset_before`] para
/// recuperar el indice global (a traves de todas las longitudes) de `name`.
#[must_use]
pub fn room_name_to_global_index(name: &str) -> Option<u64> {
    let length = name.chars().count();
    let local = room_name_to_index(name)?;
    Some(cumulative_offset_before(length) + local)
}

/// Indice global de inicio del espacio de candidatos de longitud `length`
/// dentro de la enumeracion concatenada de todas las longitudes desde `1`
/// hasta `length - 1`.
#[must_use]
pub fn cumulative_offset_before(length: usize) -> u64 {
    (1..length).map(count_names_for_length).sum()
}

/// Descompone un indice global (que abarca todas las longitudes desde `1`
/// hasta `max_length`) en su longitud y su indice local dentro de ella.
///
/// Retorna `None` si `global_index` excede el espacio total hasta
/// `max_length`.
#[must_use]
pub fn global_index_to_length_and_local(
    global_index: u64,
    max_length: usize,
) -> Option<(usize, u64)> {
    let mut remaining = global_index;
    for length in 1..=max_length {
        let count = count_names_for_length(length);
        if remaining < count {
            return Some((length, remaining));
        }
        remaining -= count;
    }
    None
}

/// Tamano total del espacio de fuerza bruta abarcando todas las longitudes
/// desde `1` hasta `max_length`, inclusive.
#[must_use]
pub fn total_space_size(max_length: usize) -> u64 {
    (1..=max_length).map(count_names_for_length).sum()
}
