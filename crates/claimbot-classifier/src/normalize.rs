// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text cleanup applied before any pattern matching.

/// Characters that render as nothing but break substring and regex matches.
const INVISIBLE: &[char] = &[
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{2060}', // word joiner
    '\u{FEFF}', // byte order mark
    '\u{FE0F}', // emoji variation selector
];

/// Strip invisible characters, fold line breaks into single spaces, trim.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_break = false;

    for c in text.chars() {
        if INVISIBLE.contains(&c) {
            continue;
        }
        if c == '\n' || c == '\r' {
            pending_break = true;
            continue;
        }
        if pending_break {
            if !out.is_empty() && !out.ends_with(' ') && c != ' ' {
                out.push(' ');
            }
            pending_break = false;
        }
        out.push(c);
    }

    out.trim().to_string()
}
