//! Minimal TeX markup for axis labels and titles.
//!
//! There is no TeX engine behind the renderer, so `usetex=True` renders the
//! common math markup users put in labels (`$\tau_{eq}$`, `$N^{2}$`) as
//! Unicode text in a serif face instead.

/// Commands rendered as a single Unicode character.
const SYMBOLS: &[(&str, &str)] = &[
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("epsilon", "ε"),
    ("lambda", "λ"),
    ("mu", "μ"),
    ("nu", "ν"),
    ("pi", "π"),
    ("rho", "ρ"),
    ("sigma", "σ"),
    ("tau", "τ"),
    ("phi", "φ"),
    ("omega", "ω"),
    ("Delta", "Δ"),
    ("Sigma", "Σ"),
    ("Omega", "Ω"),
    ("cdot", "·"),
    ("times", "×"),
    ("pm", "±"),
    ("approx", "≈"),
    ("sim", "∼"),
    ("leq", "≤"),
    ("geq", "≥"),
    ("langle", "⟨"),
    ("rangle", "⟩"),
];

const SUPERSCRIPTS: &[(char, char)] = &[
    ('0', '⁰'),
    ('1', '¹'),
    ('2', '²'),
    ('3', '³'),
    ('4', '⁴'),
    ('5', '⁵'),
    ('6', '⁶'),
    ('7', '⁷'),
    ('8', '⁸'),
    ('9', '⁹'),
    ('+', '⁺'),
    ('-', '⁻'),
    ('n', 'ⁿ'),
];

const SUBSCRIPTS: &[(char, char)] = &[
    ('0', '₀'),
    ('1', '₁'),
    ('2', '₂'),
    ('3', '₃'),
    ('4', '₄'),
    ('5', '₅'),
    ('6', '₆'),
    ('7', '₇'),
    ('8', '₈'),
    ('9', '₉'),
    ('+', '₊'),
    ('-', '₋'),
];

/// Render TeX markup in `text` as plain Unicode.
///
/// `$` delimiters are dropped and known commands become symbols. Unknown
/// commands (font switches such as `\mathrm`) vanish, leaving their argument.
/// `^`/`_` groups use Unicode super/subscripts where they exist, otherwise the
/// group is kept with its marker.
pub fn render(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => {}
            '\\' => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if !n.is_ascii_alphabetic() {
                        break;
                    }
                    name.push(n);
                    chars.next();
                }
                if name.is_empty() {
                    // escaped character such as \% or \$
                    if let Some(n) = chars.next() {
                        out.push(n);
                    }
                    continue;
                }
                if let Some((_, sym)) = SYMBOLS.iter().find(|(cmd, _)| *cmd == name) {
                    out.push_str(sym);
                }
            }
            '^' | '_' => {
                let group = read_group(&mut chars);
                let table = if c == '^' { SUPERSCRIPTS } else { SUBSCRIPTS };
                match map_all(&group, table) {
                    Some(mapped) => out.push_str(&mapped),
                    None => {
                        out.push(c);
                        out.push_str(&render(&group));
                    }
                }
            }
            '{' | '}' => {}
            other => out.push(other),
        }
    }
    out
}

fn read_group(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    match chars.next() {
        Some('{') => {
            let mut depth = 1;
            let mut group = String::new();
            for c in chars.by_ref() {
                match c {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                group.push(c);
            }
            group
        }
        Some(c) => c.to_string(),
        None => String::new(),
    }
}

fn map_all(group: &str, table: &[(char, char)]) -> Option<String> {
    group
        .chars()
        .map(|c| table.iter().find(|(from, _)| *from == c).map(|(_, to)| *to))
        .collect()
}
