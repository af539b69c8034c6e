/// Terminal width MOTD paragraphs are filled to.
pub const WRAP_WIDTH: usize = 80;

/// Refill every blank-line separated paragraph to `width` columns.
///
/// Whitespace inside a paragraph (including single newlines) collapses to one space, so hand-wrapped
/// text files come out evenly filled. Words longer than `width` get a line of their own.
pub fn wrap_paragraphs(text: &str, width: usize) -> String {
    text.split("\n\n")
        .map(|p| fill(p, width))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn fill(paragraph: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();

    for word in paragraph.split_whitespace() {
        let needed = if cur.is_empty() { word.len() } else { cur.len() + 1 + word.len() };
        if needed > width && !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
        }
        if !cur.is_empty() {
            cur.push(' ');
        }
        cur.push_str(word);
    }
    if !cur.is_empty() {
        lines.push(cur);
    }

    lines.join("\n")
}
