use crate::db::core::PairTable;

/// Parses a contact-pair list of the form `"2-0, 3-3, 0-2"`: one
/// `top-bottom` pair per column, zero for an unoccupied position.
pub fn parse(text: &str) -> Result<PairTable, String> {
    let mut table = PairTable::default();

    for (i, entry) in text.split(',').enumerate() {
        let entry = entry.trim();
        let (top, bottom) = entry
            .split_once('-')
            .ok_or_else(|| format!("column {}: expected 'top-bottom', got '{}'", i, entry))?;

        let top: u32 = top
            .trim()
            .parse()
            .map_err(|_| format!("column {}: invalid top label '{}'", i, top.trim()))?;
        let bottom: u32 = bottom
            .trim()
            .parse()
            .map_err(|_| format!("column {}: invalid bottom label '{}'", i, bottom.trim()))?;

        table.top.push(top);
        table.bottom.push(bottom);
    }

    if table.top.is_empty() {
        return Err("empty contact list".to_string());
    }
    Ok(table)
}

/// Inverse of [`parse`], used when writing generated instances.
pub fn format_pairs(table: &PairTable) -> String {
    table
        .top
        .iter()
        .zip(&table.bottom)
        .map(|(t, b)| format!("{}-{}", t, b))
        .collect::<Vec<_>>()
        .join(",")
}
