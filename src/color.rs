//! color.rs
//! Normaliza colores escritos "como sea" en la BD (`#abc`, `255,0,0`, `ff8800`...)
//! a un hex `#RGB` / `#RRGGBB`. Nunca falla: lo que no se entiende cae al fallback.

use std::num::IntErrorKind;

/// Intentos en orden; el primero que devuelve `Some` gana.
const INTENTOS: [fn(&str) -> Option<String>; 3] = [hex_literal, triplete_rgb, hex_sin_almohadilla];

pub fn sanitize_color(valor: Option<&str>, fallback: &str) -> String {
    let Some(s) = valor.map(str::trim).filter(|s| !s.is_empty()) else {
        return fallback.to_string();
    };
    INTENTOS.iter().find_map(|intento| intento(s)).unwrap_or_else(|| fallback.to_string())
}

/// `#abc` o `#aabbcc`: se devuelve tal cual.
fn hex_literal(s: &str) -> Option<String> {
    let n = s.chars().count();
    (s.starts_with('#') && (n == 4 || n == 7)).then(|| s.to_string())
}

/// `r,g,b` o `r;g;b`. Solo se prueba el primer separador presente (',' antes que ';').
fn triplete_rgb(s: &str) -> Option<String> {
    let sep = [',', ';'].into_iter().find(|c| s.contains(*c))?;
    let mut partes = s.split(sep).map(canal_rgb);
    let mut canal = || partes.next().flatten();
    let (r, g, b) = (canal()?, canal()?, canal()?);
    Some(format!("#{r:02x}{g:02x}{b:02x}"))
}

/// Entero recortado a [0, 255]; los que no caben en i64 tambien se recortan.
fn canal_rgb(p: &str) -> Option<u8> {
    let v = match p.trim().parse::<i64>() {
        Ok(v) => v,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => 255,
            IntErrorKind::NegOverflow => 0,
            _ => return None,
        },
    };
    Some(v.clamp(0, 255) as u8)
}

// Sin validar digitos: "zzzzzz" -> "#zzzzzz".
fn hex_sin_almohadilla(s: &str) -> Option<String> {
    let n = s.chars().count();
    (n == 3 || n == 6).then(|| format!("#{s}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::COLOR_DEFAULT;

    fn san(s: Option<&str>) -> String { sanitize_color(s, COLOR_DEFAULT) }

    #[test]
    fn hex_con_almohadilla_pasa_tal_cual() {
        assert_eq!(san(Some("#fff")), "#fff");
        assert_eq!(san(Some("  #A1B2C3 ")), "#A1B2C3");
    }

    #[test]
    fn triplete_se_convierte_y_se_recorta() {
        assert_eq!(san(Some("255,0,0")), "#ff0000");
        assert_eq!(san(Some("300,-10,0")), "#ff0000");
        assert_eq!(san(Some("0; 128 ;255")), "#0080ff");
        assert_eq!(san(Some("1,2,3,4")), "#010203");
        assert_eq!(san(Some("99999999999999999999,0,0")), "#ff0000");
        assert_eq!(san(Some("0,-99999999999999999999,255")), "#0000ff");
    }

    #[test]
    fn triplete_invalido_cae_a_las_reglas_siguientes() {
        // "1,2" no tiene tres canales y mide 3 => hex desnudo
        assert_eq!(san(Some("1,2")), "#1,2");
        assert_eq!(san(Some("a,b,c")), COLOR_DEFAULT);
        // con ',' presente no se prueba ';'
        assert_eq!(san(Some("x,1;2;3")), COLOR_DEFAULT);
    }

    #[test]
    fn hex_desnudo_sin_validar() {
        assert_eq!(san(Some("zzzzzz")), "#zzzzzz");
        assert_eq!(san(Some("f80")), "#f80");
    }

    #[test]
    fn vacio_o_ausente_da_fallback() {
        assert_eq!(san(None), COLOR_DEFAULT);
        assert_eq!(san(Some("")), COLOR_DEFAULT);
        assert_eq!(san(Some("   ")), COLOR_DEFAULT);
        assert_eq!(san(Some("rojo")), COLOR_DEFAULT);
        assert_eq!(sanitize_color(Some("#1234"), "#000"), "#000");
        // "#12" mide 3: pasa por hex desnudo
        assert_eq!(san(Some("#12")), "##12");
    }
}
