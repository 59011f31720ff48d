use std::path::Path;

/// Log lines that only report which scratch files were read or written.
const NOISE_PREFIXES: [&str; 4] = [
    "Reading model section",
    "Reading data section",
    "Writing basic solution",
    "Writing MIP solution",
];

/// A scratch file and the user-facing label it stands for.
#[derive(Debug, Clone, Copy)]
pub struct Relabel<'a> {
    pub path: &'a Path,
    /// "Model 'diet'" or "Data 'week1'".
    pub label: &'a str,
}

/// Drop noise lines and replace scratch file paths with user-facing names,
/// so `/tmp/.../model.mod:12: error` reads `Model 'diet' line 12: error`.
pub fn present_log(log: &str, relabels: &[Relabel<'_>]) -> String {
    let mut presented = String::with_capacity(log.len());
    for line in log.lines() {
        if NOISE_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
            continue;
        }
        let mut line = line.to_string();
        for relabel in relabels {
            let path = relabel.path.display().to_string();
            if path.is_empty() {
                continue;
            }
            line = line.replace(&format!("{}:", path), &format!("{} line ", relabel.label));
            line = line.replace(&path, relabel.label);
        }
        presented.push_str(&line);
        presented.push('\n');
    }
    presented
}
