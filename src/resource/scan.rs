//! Static reference scanning for Ext-style JavaScript classes.
//!
//! This is pattern matching over source text, not a parser. It finds the
//! class a file defines and the class names it mentions in `extend`,
//! `controller`, `model`, `requires` and `uses`.

use std::sync::LazyLock;

use regex::Regex;

static DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Ext\.define\s*?\(\s*?['"](.*?)['"]"#).unwrap());

static SINGLE_REFS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    ["extend", "controller", "model"]
        .map(|key| Regex::new(&format!(r#"{key}\s*?:\s*?['"](.*?)['"]"#)).unwrap())
});

static LIST_REFS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    ["requires", "uses"].map(|key| Regex::new(&format!(r"(?s){key}\s*?:\s*?\[(.*?)\]")).unwrap())
});

static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"['"](.*?)['"]"#).unwrap());

/// What one source file declares and refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRefs {
    /// Class defined by the file. Only the first `Ext.define` counts.
    pub defines: Option<String>,
    /// Referenced class names, in discovery order, possibly repeated.
    pub references: Vec<String>,
}

/// Scan `source` for its class definition and references.
pub fn scan(source: &str) -> SourceRefs {
    let defines = DEFINE.captures(source).map(|caps| caps[1].to_owned());

    let mut references = Vec::new();
    for re in SINGLE_REFS.iter() {
        references.extend(re.captures_iter(source).map(|caps| caps[1].to_owned()));
    }
    for re in LIST_REFS.iter() {
        for list in re.captures_iter(source) {
            references.extend(QUOTED.captures_iter(&list[1]).map(|caps| caps[1].to_owned()));
        }
    }

    SourceRefs {
        defines,
        references,
    }
}
