//! Text folding for label comparisons.

/// Upper-cases `value` and strips the accents found in Spanish labels, so
/// `Defunción`, `DEFUNCION` and `defuncion` compare equal.
pub fn fold_upper(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| match ch {
            'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => 'A',
            'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
            'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            'ñ' | 'Ñ' => 'N',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::fold_upper;

    #[test]
    fn folds_case_and_accents() {
        assert_eq!(fold_upper(" Defunción "), "DEFUNCION");
        assert_eq!(fold_upper("Álvaro Obregón"), "ALVARO OBREGON");
        assert_eq!(fold_upper("Peña"), "PENA");
    }
}
