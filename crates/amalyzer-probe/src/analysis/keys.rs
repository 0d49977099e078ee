/// Marcador para tonalidad desconocida.
pub const UNKNOWN_KEY: &str = "???";
pub const UNKNOWN_KEY_INDEX: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNotation {
    /// Rueda Camelot (`8B`, `5A`...).
    pub camelot: &'static str,
    /// Open Key (`1d`, `1m`...).
    pub open_key: &'static str,
}

const fn k(camelot: &'static str, open_key: &'static str) -> KeyNotation {
    KeyNotation { camelot, open_key }
}

/// Índices 0..12 mayores, 12..24 menores, ambos por quintas ascendentes desde Do.
/// La columna Open Key de los menores arranca en `1m` y no sigue a la Camelot;
/// es la convención que ya llevan los tags escritos y se mantiene tal cual.
pub const KEY_TABLE: [KeyNotation; 24] = [
    k("8B", "1d"),
    k("9B", "2d"),
    k("10B", "3d"),
    k("11B", "4d"),
    k("12B", "5d"),
    k("1B", "6d"),
    k("2B", "7d"),
    k("3B", "8d"),
    k("4B", "9d"),
    k("5B", "10d"),
    k("6B", "11d"),
    k("7B", "12d"),
    k("5A", "1m"),
    k("6A", "2m"),
    k("7A", "3m"),
    k("8A", "4m"),
    k("9A", "5m"),
    k("10A", "6m"),
    k("11A", "7m"),
    k("12A", "8m"),
    k("1A", "9m"),
    k("2A", "10m"),
    k("3A", "11m"),
    k("4A", "12m"),
];

pub fn is_valid_key_index(index: i32) -> bool {
    (0..KEY_TABLE.len() as i32).contains(&index)
}

/// Traduce un índice de tonalidad a sus dos notaciones; fuera de rango da `("???", "???")`.
pub fn notate(index: i32) -> (&'static str, &'static str) {
    if is_valid_key_index(index) {
        let n = KEY_TABLE[index as usize];
        (n.camelot, n.open_key)
    } else {
        (UNKNOWN_KEY, UNKNOWN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_valid_index_maps_to_its_row() {
        let camelot = [
            "8B", "9B", "10B", "11B", "12B", "1B", "2B", "3B", "4B", "5B", "6B", "7B", "5A", "6A", "7A", "8A",
            "9A", "10A", "11A", "12A", "1A", "2A", "3A", "4A",
        ];
        for (i, expected) in camelot.iter().enumerate() {
            let (a, b) = notate(i as i32);
            assert_eq!(a, *expected);
            let suffix = if i < 12 { "d" } else { "m" };
            assert_eq!(b, format!("{}{}", i % 12 + 1, suffix));
            // determinista
            assert_eq!(notate(i as i32), (a, b));
        }
    }

    #[test]
    fn out_of_range_is_unknown() {
        for i in [-1, -2, 24, 25, 1000, i32::MIN, i32::MAX] {
            assert_eq!(notate(i), (UNKNOWN_KEY, UNKNOWN_KEY));
        }
    }
}
