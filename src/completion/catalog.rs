//! Process-wide catalog of Ant tasks and structural elements.
//!
//! The catalog is built lazily on first use and shared for the lifetime of
//! the process. Construction parses the embedded description table; any
//! defect in that table is unrecoverable because the completion processor
//! cannot run without the catalog.

use std::collections::BTreeMap;

use once_cell::sync::OnceCell;

use crate::error::{AntLsError, AntLsResult, CatalogError};

/// What kind of value an attribute expects, used to pick value proposals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueHint {
    /// Free-form value, nothing to propose.
    None,
    /// true/false style flag.
    Boolean,
    /// A single target name from the current build file.
    Target,
    /// Comma-separated list of target names.
    TargetList,
    /// A property name from the current build file.
    Property,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// An executable task such as `javac` or `echo`.
    Task,
    /// A structural or nested element such as `target` or `fileset`.
    Structural,
}

/// An attribute accepted by an element.
#[derive(Clone, Copy, Debug)]
pub struct AttrDef {
    pub name: &'static str,
    pub hint: ValueHint,
}

const fn attr(name: &'static str) -> AttrDef {
    AttrDef {
        name,
        hint: ValueHint::None,
    }
}

const fn attr_with(name: &'static str, hint: ValueHint) -> AttrDef {
    AttrDef { name, hint }
}

#[derive(Debug)]
struct ElementSpec {
    name: &'static str,
    kind: ElementKind,
    attributes: &'static [AttrDef],
    nested: &'static [&'static str],
    /// Whether any task may appear as a child (targets and the project root).
    allows_tasks: bool,
}

/// A catalog entry: the static element definition plus its description from
/// the embedded table.
#[derive(Debug)]
pub struct ElementDef {
    spec: &'static ElementSpec,
    description: Option<String>,
}

impl ElementDef {
    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn kind(&self) -> ElementKind {
        self.spec.kind
    }

    pub fn attributes(&self) -> &'static [AttrDef] {
        self.spec.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrDef> {
        self.spec
            .attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn nested(&self) -> &'static [&'static str] {
        self.spec.nested
    }

    pub fn allows_tasks(&self) -> bool {
        self.spec.allows_tasks
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Debug)]
pub struct TaskCatalog {
    elements: BTreeMap<&'static str, ElementDef>,
}

static CATALOG: OnceCell<TaskCatalog> = OnceCell::new();

impl TaskCatalog {
    /// The shared catalog instance, built on first call.
    ///
    /// Later calls return the same instance; concurrent first calls are
    /// serialized by the cell. A construction failure is returned to every
    /// caller and never retried within the process.
    pub fn global() -> AntLsResult<&'static TaskCatalog> {
        CATALOG
            .get_or_try_init(|| Self::load(DESCRIPTIONS))
            .map_err(AntLsError::Catalog)
    }

    /// Build a catalog from a description table.
    fn load(table: &str) -> Result<TaskCatalog, CatalogError> {
        let mut elements: BTreeMap<&'static str, ElementDef> = ELEMENTS
            .iter()
            .map(|spec| {
                (
                    spec.name,
                    ElementDef {
                        spec,
                        description: None,
                    },
                )
            })
            .collect();

        for (idx, line) in table.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, description)) = line.split_once('\t') else {
                return Err(CatalogError::MalformedEntry {
                    line: line_no,
                    entry: line.to_string(),
                });
            };
            let Some(def) = elements.get_mut(name) else {
                return Err(CatalogError::UnknownElement {
                    line: line_no,
                    name: name.to_string(),
                });
            };
            if def.description.is_some() {
                return Err(CatalogError::DuplicateEntry {
                    line: line_no,
                    name: name.to_string(),
                });
            }
            def.description = Some(description.trim().to_string());
        }

        Ok(TaskCatalog { elements })
    }

    /// Look up an element by tag name (case-insensitive, Ant convention).
    pub fn element(&self, name: &str) -> Option<&ElementDef> {
        let lower = name.to_ascii_lowercase();
        self.elements.get(lower.as_str())
    }

    /// All elements, name-sorted.
    pub fn elements(&self) -> impl Iterator<Item = &ElementDef> {
        self.elements.values()
    }

    /// All task elements, name-sorted.
    pub fn tasks(&self) -> impl Iterator<Item = &ElementDef> {
        self.elements
            .values()
            .filter(|def| def.kind() == ElementKind::Task)
    }
}

static DESCRIPTIONS: &str = include_str!("descriptions.tsv");

use ValueHint::{Boolean, Property, Target, TargetList};

static ELEMENTS: &[ElementSpec] = &[
    // Structural elements
    ElementSpec {
        name: "project",
        kind: ElementKind::Structural,
        attributes: &[attr("name"), attr_with("default", Target), attr("basedir")],
        nested: &["target", "description"],
        allows_tasks: true,
    },
    ElementSpec {
        name: "target",
        kind: ElementKind::Structural,
        attributes: &[
            attr("name"),
            attr_with("depends", TargetList),
            attr("description"),
            attr_with("if", Property),
            attr_with("unless", Property),
        ],
        nested: &[],
        allows_tasks: true,
    },
    ElementSpec {
        name: "description",
        kind: ElementKind::Structural,
        attributes: &[],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "fileset",
        kind: ElementKind::Structural,
        attributes: &[
            attr("dir"),
            attr("file"),
            attr("includes"),
            attr("excludes"),
            attr_with("casesensitive", Boolean),
            attr_with("defaultexcludes", Boolean),
        ],
        nested: &["include", "exclude", "patternset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "include",
        kind: ElementKind::Structural,
        attributes: &[
            attr("name"),
            attr_with("if", Property),
            attr_with("unless", Property),
        ],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "exclude",
        kind: ElementKind::Structural,
        attributes: &[
            attr("name"),
            attr_with("if", Property),
            attr_with("unless", Property),
        ],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "patternset",
        kind: ElementKind::Structural,
        attributes: &[attr("includes"), attr("excludes"), attr("id")],
        nested: &["include", "exclude"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "classpath",
        kind: ElementKind::Structural,
        attributes: &[attr("refid"), attr("path"), attr("location")],
        nested: &["pathelement", "fileset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "path",
        kind: ElementKind::Structural,
        attributes: &[attr("id"), attr("refid"), attr("path"), attr("location")],
        nested: &["pathelement", "fileset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "pathelement",
        kind: ElementKind::Structural,
        attributes: &[attr("path"), attr("location")],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "arg",
        kind: ElementKind::Structural,
        attributes: &[attr("value"), attr("line"), attr("file"), attr("path")],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "jvmarg",
        kind: ElementKind::Structural,
        attributes: &[attr("value"), attr("line")],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "env",
        kind: ElementKind::Structural,
        attributes: &[attr("key"), attr("value"), attr("path"), attr("file")],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "param",
        kind: ElementKind::Structural,
        attributes: &[attr("name"), attr("value")],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "src",
        kind: ElementKind::Structural,
        attributes: &[attr("path")],
        nested: &["pathelement"],
        allows_tasks: false,
    },
    // Tasks
    ElementSpec {
        name: "ant",
        kind: ElementKind::Task,
        attributes: &[
            attr("antfile"),
            attr("dir"),
            attr_with("target", Target),
            attr_with("inheritall", Boolean),
            attr_with("inheritrefs", Boolean),
        ],
        nested: &["property"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "antcall",
        kind: ElementKind::Task,
        attributes: &[attr_with("target", Target), attr_with("inheritall", Boolean)],
        nested: &["param"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "chmod",
        kind: ElementKind::Task,
        attributes: &[
            attr("file"),
            attr("dir"),
            attr("perm"),
            attr("includes"),
            attr("excludes"),
        ],
        nested: &["fileset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "concat",
        kind: ElementKind::Task,
        attributes: &[
            attr("destfile"),
            attr_with("append", Boolean),
            attr_with("fixlastline", Boolean),
        ],
        nested: &["fileset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "copy",
        kind: ElementKind::Task,
        attributes: &[
            attr("file"),
            attr("tofile"),
            attr("todir"),
            attr_with("overwrite", Boolean),
            attr_with("flatten", Boolean),
            attr_with("includeemptydirs", Boolean),
        ],
        nested: &["fileset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "delete",
        kind: ElementKind::Task,
        attributes: &[
            attr("file"),
            attr("dir"),
            attr_with("failonerror", Boolean),
            attr_with("quiet", Boolean),
            attr_with("includeemptydirs", Boolean),
        ],
        nested: &["fileset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "echo",
        kind: ElementKind::Task,
        attributes: &[
            attr("message"),
            attr("file"),
            attr_with("append", Boolean),
            attr("level"),
        ],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "exec",
        kind: ElementKind::Task,
        attributes: &[
            attr("executable"),
            attr("dir"),
            attr("os"),
            attr("output"),
            attr_with("failonerror", Boolean),
            attr_with("failifexecutionfails", Boolean),
            attr_with("spawn", Boolean),
        ],
        nested: &["arg", "env"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "fail",
        kind: ElementKind::Task,
        attributes: &[
            attr("message"),
            attr_with("if", Property),
            attr_with("unless", Property),
            attr("status"),
        ],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "jar",
        kind: ElementKind::Task,
        attributes: &[
            attr("destfile"),
            attr("basedir"),
            attr_with("compress", Boolean),
            attr_with("index", Boolean),
            attr("manifest"),
            attr("includes"),
            attr("excludes"),
        ],
        nested: &["fileset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "java",
        kind: ElementKind::Task,
        attributes: &[
            attr("classname"),
            attr("jar"),
            attr_with("fork", Boolean),
            attr_with("failonerror", Boolean),
            attr("maxmemory"),
            attr_with("spawn", Boolean),
            attr("dir"),
        ],
        nested: &["arg", "jvmarg", "classpath", "env"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "javac",
        kind: ElementKind::Task,
        attributes: &[
            attr("srcdir"),
            attr("destdir"),
            attr("classpath"),
            attr_with("debug", Boolean),
            attr_with("deprecation", Boolean),
            attr_with("optimize", Boolean),
            attr("source"),
            attr("target"),
            attr("encoding"),
            attr_with("includeantruntime", Boolean),
        ],
        nested: &["classpath", "src", "include", "exclude"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "javadoc",
        kind: ElementKind::Task,
        attributes: &[
            attr("sourcepath"),
            attr("destdir"),
            attr("packagenames"),
            attr("classpath"),
            attr("access"),
            attr_with("author", Boolean),
            attr_with("version", Boolean),
        ],
        nested: &["fileset", "classpath"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "mkdir",
        kind: ElementKind::Task,
        attributes: &[attr("dir")],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "move",
        kind: ElementKind::Task,
        attributes: &[
            attr("file"),
            attr("tofile"),
            attr("todir"),
            attr_with("overwrite", Boolean),
        ],
        nested: &["fileset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "property",
        kind: ElementKind::Task,
        attributes: &[
            attr("name"),
            attr("value"),
            attr("location"),
            attr("refid"),
            attr("file"),
            attr("url"),
            attr("environment"),
            attr("prefix"),
        ],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "replace",
        kind: ElementKind::Task,
        attributes: &[
            attr("file"),
            attr("dir"),
            attr("token"),
            attr("value"),
            attr("includes"),
            attr("excludes"),
        ],
        nested: &["fileset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "sleep",
        kind: ElementKind::Task,
        attributes: &[
            attr("hours"),
            attr("minutes"),
            attr("seconds"),
            attr("milliseconds"),
        ],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "touch",
        kind: ElementKind::Task,
        attributes: &[attr("file"), attr("datetime"), attr("millis")],
        nested: &["fileset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "tstamp",
        kind: ElementKind::Task,
        attributes: &[attr("prefix")],
        nested: &[],
        allows_tasks: false,
    },
    ElementSpec {
        name: "unzip",
        kind: ElementKind::Task,
        attributes: &[attr("src"), attr("dest"), attr_with("overwrite", Boolean)],
        nested: &["patternset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "war",
        kind: ElementKind::Task,
        attributes: &[
            attr("destfile"),
            attr("webxml"),
            attr("basedir"),
            attr_with("compress", Boolean),
        ],
        nested: &["fileset"],
        allows_tasks: false,
    },
    ElementSpec {
        name: "zip",
        kind: ElementKind::Task,
        attributes: &[
            attr("destfile"),
            attr("basedir"),
            attr("includes"),
            attr("excludes"),
            attr_with("compress", Boolean),
            attr_with("update", Boolean),
        ],
        nested: &["fileset"],
        allows_tasks: false,
    },
];
