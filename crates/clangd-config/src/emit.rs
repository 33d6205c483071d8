//! Minimal YAML emitter for the two-list `CompileFlags` shape.
//!
//! Only handles `CompileFlags: { Add: [str], Remove: [str] }`. Every value
//! is written as a double-quoted scalar so flags such as `-I/a b` or
//! `-D"X"` survive a round trip through any YAML reader.

use crate::model::ProjectConfig;
use crate::COMPILE_FLAGS_KEY;

/// Render a config as `.clangd` YAML.
///
/// Empty lists are omitted. When both are empty the root maps to `{}`.
pub fn render(config: &ProjectConfig) -> String {
    let mut out = String::new();
    out.push_str(COMPILE_FLAGS_KEY);
    out.push(':');

    if config.is_empty() {
        out.push_str(" {}\n");
        return out;
    }

    out.push('\n');
    write_list(&mut out, "Add", &config.add);
    write_list(&mut out, "Remove", &config.remove);
    out
}

fn write_list(out: &mut String, key: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }

    out.push_str("  ");
    out.push_str(key);
    out.push_str(":\n");

    for value in values {
        out.push_str("    - ");
        out.push_str(&quote(value));
        out.push('\n');
    }
}

/// Quote a string as a YAML double-quoted scalar.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04X}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(add: &[&str], remove: &[&str]) -> ProjectConfig {
        ProjectConfig {
            add: add.iter().map(|s| s.to_string()).collect(),
            remove: remove.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_both_lists() {
        let rendered = render(&config(&["-I/path/one", "-I/path/two"], &["-some-flag"]));
        assert_eq!(
            rendered,
            "CompileFlags:\n  Add:\n    - \"-I/path/one\"\n    - \"-I/path/two\"\n  Remove:\n    - \"-some-flag\"\n"
        );
    }

    #[test]
    fn test_render_omits_empty_add() {
        let rendered = render(&config(&[], &["-Wno-foo"]));
        assert!(!rendered.contains("Add:"));
        assert!(rendered.contains("  Remove:\n    - \"-Wno-foo\"\n"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&ProjectConfig::default()), "CompileFlags: {}\n");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("-DNAME=\"x\""), "\"-DNAME=\\\"x\\\"\"");
        assert_eq!(quote("C:\\inc"), "\"C:\\\\inc\"");
        assert_eq!(quote("a\tb"), "\"a\\tb\"");
    }

    #[test]
    fn test_rendered_output_is_valid_yaml() {
        #[derive(serde::Deserialize)]
        struct Root {
            #[serde(rename = "CompileFlags")]
            compile_flags: ProjectConfig,
        }

        let original = config(
            &["-I/opt/my lib/include", "-I/usr/include"],
            &["-DQUOTE=\"q\"", "-W*", "C:\\path"],
        );
        let parsed: Root = serde_yaml::from_str(&render(&original)).unwrap();
        assert_eq!(parsed.compile_flags, original);
    }

    #[test]
    fn test_empty_output_is_valid_yaml() {
        let value: serde_yaml::Value = serde_yaml::from_str(&render(&ProjectConfig::default())).unwrap();
        let flags = value.get("CompileFlags").unwrap();
        assert!(flags.as_mapping().unwrap().is_empty());
    }
}
