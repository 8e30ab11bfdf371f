use crate::transcript::ActualOutputMap;

pub const DECL_PREFIX: &str = "func ";
pub const OUTPUT_MARKER: &str = "// Output:";
pub const DECL_CLOSE: &str = "}";
pub const OUTPUT_LINE_PREFIX: &str = "\t// ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteState<'a> {
    SeekDecl,
    SeekMarker { id: &'a str, output: &'a str },
    SeekClose { id: &'a str, output: &'a str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub content: String,
    pub modified: bool,
    pub rewritten: Vec<String>,
    /// Declaration still open when the file ended.
    pub unterminated: Option<String>,
}

pub fn rewrite_source(text: &str, outputs: &ActualOutputMap) -> RewriteOutcome {
    let mut lines: Vec<String> = Vec::new();
    let mut rewritten = Vec::new();
    let mut state = RewriteState::SeekDecl;

    for line in text.split('\n') {
        state = match state {
            RewriteState::SeekDecl => {
                lines.push(line.to_string());
                match lookup_declaration(line, outputs) {
                    Some((id, output)) => RewriteState::SeekMarker { id, output },
                    None => RewriteState::SeekDecl,
                }
            }
            RewriteState::SeekMarker { id, output } => {
                lines.push(line.to_string());
                if line.trim() == OUTPUT_MARKER {
                    RewriteState::SeekClose { id, output }
                } else {
                    RewriteState::SeekMarker { id, output }
                }
            }
            RewriteState::SeekClose { id, output } => {
                if line != DECL_CLOSE {
                    RewriteState::SeekClose { id, output }
                } else {
                    lines.extend(format_output_block(output));
                    lines.push(line.to_string());
                    rewritten.push(id.to_string());
                    RewriteState::SeekDecl
                }
            }
        };
    }

    let unterminated = match state {
        RewriteState::SeekDecl => None,
        RewriteState::SeekMarker { id, .. } | RewriteState::SeekClose { id, .. } => {
            Some(id.to_string())
        }
    };

    RewriteOutcome {
        content: lines.join("\n"),
        modified: !rewritten.is_empty(),
        rewritten,
        unterminated,
    }
}

/// Looks up the identifier of a `func ` line in `outputs`, returning the
/// borrowed key and captured output.
pub fn lookup_declaration<'a>(
    line: &str,
    outputs: &'a ActualOutputMap,
) -> Option<(&'a str, &'a str)> {
    let id = declaration_identifier(line)?;
    outputs
        .get_key_value(id)
        .map(|(key, output)| (key.as_str(), output.as_str()))
}

pub fn declaration_identifier(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(DECL_PREFIX)?;
    Some(rest.split('(').next().unwrap_or(rest))
}

pub fn format_output_block(output: &str) -> impl Iterator<Item = String> + '_ {
    output
        .split('\n')
        .map(|line| format!("{OUTPUT_LINE_PREFIX}{line}"))
}
