//! Post-render guard against leftover template syntax

const MARKERS: [&str; 2] = ["{{", "}}"];

/// First line of `rendered` still containing `{{` or `}}`, trimmed
pub fn find_leftover(rendered: &str) -> Option<&str> {
    rendered
        .lines()
        .find(|line| MARKERS.iter().any(|m| line.contains(m)))
        .map(str::trim)
}
