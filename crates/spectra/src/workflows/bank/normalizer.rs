/// Normalize a spreadsheet-authored label: strip the BOM, trim, and collapse
/// runs of whitespace. Case is preserved since spectrum keys are
/// display-facing.
pub(crate) fn normalize_label(raw: &str) -> String {
    let stripped = raw.trim_start_matches('\u{feff}');
    let mut normalized = String::with_capacity(stripped.len());
    let mut previous_space = false;

    for character in stripped.trim().chars() {
        if character.is_whitespace() {
            if !previous_space {
                normalized.push(' ');
            }
            previous_space = true;
        } else {
            normalized.push(character);
            previous_space = false;
        }
    }

    normalized
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(raw: &str) -> String {
    normalize_label(raw)
}
