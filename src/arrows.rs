use crate::position::Position;

/// Render the source lines covered by `start..end` with a row of carets under
/// the span on each line.
pub fn string_with_arrows(text: &str, start: &Position, end: &Position) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut line_start = chars[..start.index.min(chars.len())]
        .iter()
        .rposition(|&c| c == '\n')
        .map_or(0, |i| i + 1);

    let line_count = end.line.saturating_sub(start.line) + 1;
    let mut rows = Vec::with_capacity(line_count);

    for i in 0..line_count {
        let line_end = chars[line_start..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(chars.len(), |offset| line_start + offset);
        let line: String = chars[line_start..line_end].iter().collect();

        let col_start = if i == 0 { start.column } else { 0 };
        let col_end = if i == line_count - 1 {
            end.column
        } else {
            line_end - line_start
        };
        let width = col_end.saturating_sub(col_start).max(1);

        rows.push(format!("{}\n{}{}", line, " ".repeat(col_start), "^".repeat(width)));
        line_start = (line_end + 1).min(chars.len());
    }

    rows.join("\n").replace('\t', "")
}
