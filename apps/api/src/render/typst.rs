//! Typst markup for a `RenderDocument`.
//!
//! Every piece of profile text goes through `escape` before it lands in markup, so a
//! résumé line like `C# / .NET` or `#1 in sales` cannot inject Typst syntax.

use std::fmt;

use crate::render::{Block, RenderDocument};

const ACCENT: &str = "#6B46C1";
const MUTED: &str = "#6B7280";

const PREAMBLE: &str = r##"#set page(paper: "a4", margin: 2cm)
#set text(font: "Helvetica", size: 9pt)
#set par(justify: false)
#show heading.where(level: 2): it => block(above: 1.2em, below: 0.6em)[
  #text(size: 12pt, weight: "bold", fill: rgb("#6B46C1"), upper(it.body))
]
"##;

/// Characters with markup meaning in Typst content mode.
const SPECIAL: &[char] = &[
    '\\', '#', '$', '*', '_', '`', '<', '>', '@', '[', ']', '~', '/', '=', '-', '+', '"', '\'',
];

/// Escapes Typst markup characters and folds line breaks into spaces.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\r' | '\n' => out.push(' '),
            c if SPECIAL.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

pub fn to_typst(doc: &RenderDocument) -> String {
    TypstSource(doc).to_string()
}

/// `Display` adapter so every write propagates through `fmt::Result`.
struct TypstSource<'a>(&'a RenderDocument);

impl fmt::Display for TypstSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.0;
        f.write_str(PREAMBLE)?;
        writeln!(
            f,
            "\n#text(size: 18pt, weight: \"bold\", fill: rgb(\"{ACCENT}\"))[{}] \\",
            escape(&doc.name)
        )?;
        writeln!(f, "#text(size: 12pt)[{}] \\", escape(&doc.headline))?;
        writeln!(f, "#text(fill: rgb(\"{MUTED}\"))[{}]", escape(&doc.contact))?;
        writeln!(f, "#line(length: 100%, stroke: 0.8pt + rgb(\"{ACCENT}\"))")?;

        for section in &doc.sections {
            writeln!(f, "\n== {}\n", escape(&section.title))?;
            for block in &section.blocks {
                write_block(f, block)?;
            }
        }
        Ok(())
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &Block) -> fmt::Result {
    match block {
        Block::Paragraph { text } => writeln!(f, "{}\n", escape(text)),
        Block::Labeled { label, text } => {
            writeln!(f, "*{}:* {} \\", escape(label), escape(text))
        }
        Block::Bullets { items } => write_bullets(f, items),
        Block::Entry {
            title,
            subtitle,
            details,
            bullets,
        } => {
            writeln!(f, "*{}* \\", escape(title))?;
            writeln!(f, "#text(fill: rgb(\"{MUTED}\"))[{}] \\", escape(subtitle))?;
            for detail in details {
                writeln!(f, "{} \\", escape(detail))?;
            }
            write_bullets(f, bullets)?;
            writeln!(f)
        }
    }
}

fn write_bullets(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    for item in items {
        writeln!(f, "- {}", escape(item))?;
    }
    Ok(())
}
