//! Canonical rendering of targets back to manifest text.
//!
//! Output is stable: one attribute per line, single-quoted strings,
//! trailing commas, dependencies in declaration order. Rendering then
//! re-parsing a manifest yields the same targets.

use crate::core::target::{Target, TargetKind};

/// Render a full manifest from its targets.
pub fn render_build_file(targets: &[Target]) -> String {
    let mut out = String::new();
    for (i, target) in targets.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_target(&mut out, target);
    }
    out
}

/// Render a manifest with a leading comment header.
pub fn render_build_file_with_header(header: &str, targets: &[Target]) -> String {
    let mut out = String::new();
    for line in header.lines() {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&render_build_file(targets));
    out
}

fn render_target(out: &mut String, target: &Target) {
    out.push_str(target.kind.declaration_form());
    out.push_str("(\n");
    push_attr_str(out, "name", &target.address.name());

    if let Some(ref entry_point) = target.entry_point {
        push_attr_str(out, "entry_point", entry_point);
    }

    if target.kind == TargetKind::Binary && target.sources.len() == 1 {
        push_attr_str(out, "source", &target.sources[0]);
    } else if !target.sources.is_empty() {
        push_attr_list(out, "sources", &target.sources);
    }

    if !target.dependencies.is_empty() {
        let specs: Vec<String> = target
            .dependencies
            .iter()
            .map(|d| d.spec.clone())
            .collect();
        push_attr_list(out, "dependencies", &specs);
    }

    if !target.tags.is_empty() {
        push_attr_list(out, "tags", &target.tags);
    }

    out.push_str(")\n");
}

fn push_attr_str(out: &mut String, attr: &str, value: &str) {
    out.push_str(&format!("  {} = '{}',\n", attr, value));
}

fn push_attr_list<S: AsRef<str>>(out: &mut String, attr: &str, values: &[S]) {
    out.push_str(&format!("  {} = [\n", attr));
    for value in values {
        out.push_str(&format!("    '{}',\n", value.as_ref()));
    }
    out.push_str("  ],\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::address::Address;
    use crate::syntax::parser::parse_build_file;

    #[test]
    fn test_render_aggregate() {
        let target = Target::new(
            Address::parse("service/http:lib").unwrap(),
            TargetKind::Alias,
        )
        .with_dependencies(["service/http/src/main/java:lib", "3rdparty:com.google.guava.guava"])
        .unwrap();

        let text = render_build_file(&[target]);
        assert_eq!(
            text,
            "target(\n  name = 'lib',\n  dependencies = [\n    'service/http/src/main/java:lib',\n    '3rdparty:com.google.guava.guava',\n  ],\n)\n"
        );
    }

    #[test]
    fn test_render_parse_round_trip() {
        let original = parse_build_file(
            "squarepants",
            r#"
python_library(
  name = 'lib',
  sources = ['a.py', 'b.py'],
  dependencies = [':util'],
)
python_tests(
  name = 'test',
  sources = ['test_a.py'],
  dependencies = [':lib'],
  tags = ['unit'],
)
"#,
        )
        .unwrap();

        let rendered = render_build_file(&original);
        let reparsed = parse_build_file("squarepants", &rendered).unwrap();

        assert_eq!(original.len(), reparsed.len());
        for (a, b) in original.iter().zip(&reparsed) {
            assert_eq!(a.address, b.address);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.sources, b.sources);
            assert_eq!(a.tags, b.tags);
            assert_eq!(
                a.dep_addresses().collect::<Vec<_>>(),
                b.dep_addresses().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_render_with_header() {
        let target = Target::new(Address::parse("m:lib").unwrap(), TargetKind::Alias);
        let text = render_build_file_with_header("generated by pomwright\ndo not edit", &[target]);
        assert!(text.starts_with("# generated by pomwright\n# do not edit\n\n"));
    }

    #[test]
    fn test_render_binary_single_source() {
        let target = Target::new(Address::parse("tools:fmt").unwrap(), TargetKind::Binary)
            .with_sources(["fmt.py"]);
        let text = render_build_file(&[target]);
        assert!(text.contains("source = 'fmt.py',"));
        let reparsed = parse_build_file("tools", &text).unwrap();
        assert_eq!(reparsed[0].sources, vec!["fmt.py"]);
    }
}
