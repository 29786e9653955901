//! Expansion of diagnosis code lists with numeric ranges.

/// Largest number of codes a single range entry may expand to.
pub const MAX_RANGE_LEN: u64 = 1000;

/// Expand one normalized code-list entry into the prefixes it stands for.
///
/// A plain entry (`d10`) is returned as is. A range `<prefix><start>-<end>`
/// takes the width of `<end>` as the width of the numeric suffix:
/// `c15-26` yields `c15`, `c16`, ..., `c26` and `c151-9` yields `c151` to
/// `c159`. Both bounds must be digits and `start <= end`.
pub fn expand_code_entry(entry: &str) -> Result<Vec<String>, String> {
    let Some((head, end)) = entry.split_once('-') else {
        return Ok(vec![entry.to_string()]);
    };

    let width = end.len();
    if width == 0 || !end.bytes().all(|b| b.is_ascii_digit()) {
        return Err("range end must be numeric".to_string());
    }
    if head.len() < width {
        return Err("range start is shorter than range end".to_string());
    }
    let (prefix, start) = head.split_at(head.len() - width);
    if !start.bytes().all(|b| b.is_ascii_digit()) {
        return Err("range start must be numeric".to_string());
    }

    let first: u64 = start.parse().map_err(|_| "range start out of bounds".to_string())?;
    let last: u64 = end.parse().map_err(|_| "range end out of bounds".to_string())?;
    if first > last {
        return Err(format!("range start {start} is after range end {end}"));
    }
    if last - first >= MAX_RANGE_LEN {
        return Err(format!("range spans more than {MAX_RANGE_LEN} codes"));
    }

    Ok((first..=last)
        .map(|n| format!("{prefix}{n:0width$}"))
        .collect())
}

/// Expand every entry of a normalized code list, keeping list order.
pub fn expand_code_list<S: AsRef<str>>(entries: &[S]) -> Result<Vec<String>, (String, String)> {
    let mut codes = Vec::new();
    for entry in entries {
        let entry = entry.as_ref();
        let expanded = expand_code_entry(entry).map_err(|message| (entry.to_string(), message))?;
        codes.extend(expanded);
    }
    Ok(codes)
}
