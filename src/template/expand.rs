// src/template/expand.rs

//! Per-file expansion of an argument template.

/// Placeholders standing for the staged file path.
pub const FILE_PLACEHOLDERS: [&str; 2] = ["$file", "{file}"];

/// Placeholder standing for the batch timestamp.
pub const STAMP_PLACEHOLDER: &str = "$dt";

const CONJUNCTION: char = '+';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    File,
    Stamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Text(&'a str),
    Slot(Placeholder),
    Join,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Space(&'a str),
    Word(&'a str),
}

/// Expand `template` for one staged `file`, using `stamp` for `$dt`.
///
/// Pure and total: any input string produces an output string.
///
/// Words (runs of non-whitespace outside double quotes) are expanded
/// independently:
///
/// - A word in which a placeholder touches a `+` is a conjunction: its
///   placeholders are replaced by their raw values, every `+` is removed,
///   and the whole word is emitted as one double-quoted argument. If the
///   word already contains a double quote the user is quoting it
///   themselves and no extra quotes are added.
/// - Any other word gets plain substitution: `$file` and `{file}` become
///   `"<path>"`, `$dt` becomes the stamp, and stray `+` characters are
///   dropped.
///
/// Substituted values are never rescanned, so a path containing `+` or
/// `$dt` is inserted verbatim. Whitespace between words is preserved.
pub fn expand(template: &str, file: &str, stamp: &str) -> String {
    let mut out = String::with_capacity(template.len() + 2 * file.len() + stamp.len());

    for segment in segments(template) {
        match segment {
            Segment::Space(space) => out.push_str(space),
            Segment::Word(word) => expand_word(word, file, stamp, &mut out),
        }
    }

    out
}

fn expand_word(word: &str, file: &str, stamp: &str, out: &mut String) {
    let pieces = pieces(word);

    let conjoined = pieces.iter().enumerate().any(|(i, piece)| {
        matches!(piece, Piece::Slot(_))
            && (matches!(pieces.get(i + 1), Some(Piece::Join))
                || (i > 0 && pieces[i - 1] == Piece::Join))
    });

    if conjoined {
        let quote = !word.contains('"');
        if quote {
            out.push('"');
        }
        for piece in &pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Slot(slot) => out.push_str(raw_value(*slot, file, stamp)),
                Piece::Join => {}
            }
        }
        if quote {
            out.push('"');
        }
        return;
    }

    for piece in &pieces {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Slot(Placeholder::File) => {
                out.push('"');
                out.push_str(file);
                out.push('"');
            }
            Piece::Slot(Placeholder::Stamp) => out.push_str(stamp),
            Piece::Join => {}
        }
    }
}

fn raw_value<'a>(slot: Placeholder, file: &'a str, stamp: &'a str) -> &'a str {
    match slot {
        Placeholder::File => file,
        Placeholder::Stamp => stamp,
    }
}

/// Split a template into alternating whitespace and word runs. Whitespace
/// inside double quotes belongs to the surrounding word.
fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut current: Option<bool> = None;

    for (i, c) in template.char_indices() {
        let is_space = !in_quotes && c.is_whitespace();
        if c == '"' {
            in_quotes = !in_quotes;
        }
        if let Some(prev) = current {
            if prev != is_space {
                segments.push(segment(&template[start..i], prev));
                start = i;
            }
        }
        current = Some(is_space);
    }

    if let Some(prev) = current {
        segments.push(segment(&template[start..], prev));
    }

    segments
}

fn segment(slice: &str, is_space: bool) -> Segment<'_> {
    if is_space {
        Segment::Space(slice)
    } else {
        Segment::Word(slice)
    }
}

fn pieces(word: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < word.len() {
        let rest = &word[i..];
        let matched = if rest.starts_with(CONJUNCTION) {
            Some((Piece::Join, CONJUNCTION.len_utf8()))
        } else if let Some(p) = FILE_PLACEHOLDERS.iter().find(|p| rest.starts_with(*p)) {
            Some((Piece::Slot(Placeholder::File), p.len()))
        } else if rest.starts_with(STAMP_PLACEHOLDER) {
            Some((Piece::Slot(Placeholder::Stamp), STAMP_PLACEHOLDER.len()))
        } else {
            None
        };

        match matched {
            Some((piece, len)) => {
                if text_start < i {
                    pieces.push(Piece::Text(&word[text_start..i]));
                }
                pieces.push(piece);
                i += len;
                text_start = i;
            }
            None => {
                i += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if text_start < word.len() {
        pieces.push(Piece::Text(&word[text_start..]));
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "/a/b.txt";
    const STAMP: &str = "123";

    #[test]
    fn plain_placeholders_are_quoted_file_and_bare_stamp() {
        assert_eq!(expand("$file", FILE, STAMP), "\"/a/b.txt\"");
        assert_eq!(expand("{file}", FILE, STAMP), "\"/a/b.txt\"");
        assert_eq!(expand("--at $dt", FILE, STAMP), "--at 123");
    }

    #[test]
    fn stamp_joined_to_file_is_one_quoted_unit() {
        assert_eq!(expand("$dt+$file", FILE, STAMP), "\"123/a/b.txt\"");
        assert_eq!(expand("$file+$dt", FILE, STAMP), "\"/a/b.txt123\"");
    }

    #[test]
    fn conjunction_only_touches_its_own_word() {
        assert_eq!(
            expand("-i $file -o $file+.out", FILE, STAMP),
            "-i \"/a/b.txt\" -o \"/a/b.txt.out\""
        );
    }

    #[test]
    fn literal_before_placeholder_joins_too() {
        assert_eq!(expand("backup_+{file}", FILE, STAMP), "\"backup_/a/b.txt\"");
        assert_eq!(expand("out_+$dt+.log", FILE, STAMP), "\"out_123.log\"");
    }

    #[test]
    fn stray_plus_without_placeholder_is_dropped() {
        assert_eq!(expand("a+b $file", FILE, STAMP), "ab \"/a/b.txt\"");
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        assert_eq!(expand("--version", FILE, STAMP), "--version");
        assert_eq!(expand("", FILE, STAMP), "");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let odd = "/x/c++/$dt/{file}";
        assert_eq!(expand("$file", odd, STAMP), "\"/x/c++/$dt/{file}\"");
        assert_eq!(expand("$file+.bak", odd, STAMP), "\"/x/c++/$dt/{file}.bak\"");
    }

    #[test]
    fn whitespace_between_words_is_preserved() {
        assert_eq!(expand("a  \t$file", FILE, STAMP), "a  \t\"/a/b.txt\"");
    }

    #[test]
    fn user_quoted_conjunction_is_not_double_quoted() {
        assert_eq!(expand("\"$file+.bak\"", FILE, STAMP), "\"/a/b.txt.bak\"");
    }

    #[test]
    fn quoted_whitespace_stays_inside_one_word() {
        assert_eq!(
            expand("-m \"note $dt+x\"", FILE, STAMP),
            "-m \"note 123x\""
        );
    }
}
