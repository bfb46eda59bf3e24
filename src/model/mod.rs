//! Request-scoped model of a single Ant build file.
//!
//! The model is rebuilt from the document text on every completion request
//! and dropped when the request finishes. It records only what completion
//! needs: the project header, target declarations, and property names.
//! Malformed input degrades to whatever was recognized before the damage.

pub mod scan;

use scan::{Tag, TagEvent};

/// Attributes of the `<project>` root element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: Option<String>,
    pub default_target: Option<String>,
    pub basedir: Option<String>,
}

/// A `<target>` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub description: Option<String>,
    pub depends: Vec<String>,
    /// Byte span from the opening tag to the matching close (or text end).
    pub span: (usize, usize),
}

/// Semantic model of one build file.
#[derive(Clone, Debug, Default)]
pub struct AntModel {
    project: Option<ProjectInfo>,
    targets: Vec<Target>,
    properties: Vec<String>,
}

impl AntModel {
    /// Build a model from build file text. Never fails; unrecognizable
    /// input simply contributes nothing.
    pub fn parse(text: &str) -> Self {
        let mut model = AntModel::default();
        // Indices into model.targets for <target> elements still open.
        let mut open_targets: Vec<usize> = Vec::new();

        for event in scan::tags(text) {
            match event {
                TagEvent::Open(tag) => {
                    model.record(&tag, false, &mut open_targets, text.len());
                }
                TagEvent::SelfClose(tag) => {
                    model.record(&tag, true, &mut open_targets, text.len());
                }
                TagEvent::Close { name, start } => {
                    if name.eq_ignore_ascii_case("target")
                        && let Some(idx) = open_targets.pop()
                    {
                        let end = text[start..].find('>').map_or(text.len(), |i| start + i + 1);
                        model.targets[idx].span.1 = end;
                    }
                }
                TagEvent::Skip { .. } => {}
            }
        }

        model
    }

    fn record(&mut self, tag: &Tag<'_>, self_closing: bool, open_targets: &mut Vec<usize>, text_len: usize) {
        match tag.name.to_ascii_lowercase().as_str() {
            "project" => {
                if self.project.is_none() {
                    self.project = Some(ProjectInfo {
                        name: tag.attr("name").map(str::to_string),
                        default_target: tag.attr("default").map(str::to_string),
                        basedir: tag.attr("basedir").map(str::to_string),
                    });
                }
            }
            "target" => {
                if let Some(name) = tag.attr("name") {
                    self.targets.push(Target {
                        name: name.to_string(),
                        description: tag.attr("description").map(str::to_string),
                        depends: split_depends(tag.attr("depends").unwrap_or("")),
                        span: (tag.start, if self_closing { tag.end } else { text_len }),
                    });
                    if !self_closing {
                        open_targets.push(self.targets.len() - 1);
                    }
                }
            }
            "property" => {
                if let Some(name) = tag.attr("name")
                    && !name.is_empty()
                    && !self.properties.iter().any(|p| p == name)
                {
                    self.properties.push(name.to_string());
                }
            }
            _ => {}
        }
    }

    pub fn project(&self) -> Option<&ProjectInfo> {
        self.project.as_ref()
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Names of properties defined with `<property name=...>`.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }
}

fn split_depends(depends: &str) -> Vec<String> {
    depends
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILD: &str = r#"<?xml version="1.0"?>
<project name="demo" default="dist" basedir=".">
  <property name="src.dir" value="src"/>
  <property name="build.dir" value="build"/>

  <target name="init" description="Create directories">
    <mkdir dir="${build.dir}"/>
  </target>

  <target name="compile" depends="init">
    <javac srcdir="${src.dir}" destdir="${build.dir}"/>
  </target>

  <target name="dist" depends="init, compile" description="Build distribution"/>
</project>
"#;

    #[test]
    fn test_project_header() {
        let model = AntModel::parse(BUILD);
        let project = model.project().unwrap();
        assert_eq!(project.name.as_deref(), Some("demo"));
        assert_eq!(project.default_target.as_deref(), Some("dist"));
        assert_eq!(project.basedir.as_deref(), Some("."));
    }

    #[test]
    fn test_targets_and_depends() {
        let model = AntModel::parse(BUILD);
        let names: Vec<_> = model.targets().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["init", "compile", "dist"]);

        assert_eq!(model.target("compile").unwrap().depends, vec!["init"]);
        assert_eq!(
            model.target("dist").unwrap().depends,
            vec!["init", "compile"]
        );
        assert_eq!(
            model.target("init").unwrap().description.as_deref(),
            Some("Create directories")
        );
    }

    #[test]
    fn test_target_spans_cover_body() {
        let model = AntModel::parse(BUILD);
        let init = model.target("init").unwrap();
        let body = &BUILD[init.span.0..init.span.1];
        assert!(body.starts_with("<target name=\"init\""));
        assert!(body.ends_with("</target>"));

        // Self-closing target span is just the tag itself.
        let dist = model.target("dist").unwrap();
        assert!(BUILD[dist.span.0..dist.span.1].ends_with("/>"));
    }

    #[test]
    fn test_properties_deduplicated_in_order() {
        let model = AntModel::parse(BUILD);
        assert_eq!(model.properties(), ["src.dir", "build.dir"]);

        let twice = r#"<project><property name="a"/><property name="a"/></project>"#;
        assert_eq!(AntModel::parse(twice).properties(), ["a"]);
    }

    #[test]
    fn test_truncated_input_keeps_earlier_declarations() {
        let truncated = &BUILD[..BUILD.find("<javac").unwrap()];
        let model = AntModel::parse(truncated);
        assert_eq!(model.project().unwrap().name.as_deref(), Some("demo"));
        assert_eq!(model.targets().len(), 2);
        // The unclosed target's span runs to the end of the text.
        assert_eq!(model.target("compile").unwrap().span.1, truncated.len());
    }

    #[test]
    fn test_empty_and_non_xml_input() {
        assert!(AntModel::parse("").targets().is_empty());
        let model = AntModel::parse("just some prose, no tags");
        assert!(model.project().is_none());
        assert!(model.properties().is_empty());
    }
}
