//! Java source renderer.
//!
//! This module converts an [`Artifact`] into Java source text. Imports are
//! sorted and members keep the order the generator chose, so the same artifact
//! always renders to the same bytes.
//!
//! Types in the artifact's own package and in `java.lang` are referenced by
//! simple name without an import. When two referenced types share a simple
//! name, the first one encountered is imported and the others are written
//! fully qualified.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::artifact::{
    Annotation, AnnotationValue, Artifact, ArtifactKind, Method, Modifier, Statement,
};
use crate::type_ref::TypeRef;

/// Package whose types never need an import.
const IMPLICIT_PACKAGE: &str = "java.lang";

/// Render `artifact` as a Java compilation unit.
#[must_use]
pub fn render(artifact: &Artifact) -> String {
    JavaFile {
        artifact,
        imports: Imports::collect(artifact),
    }
    .to_string()
}

/// Relative path of the rendered file, e.g. `com/example/Foo.java`.
#[must_use]
pub fn relative_path(artifact: &Artifact) -> String {
    let dir = artifact.package.split('.').join("/");
    if dir.is_empty() {
        format!("{}.java", artifact.name)
    } else {
        format!("{dir}/{}.java", artifact.name)
    }
}

/// Simple-name resolution for one compilation unit.
struct Imports {
    own: TypeRef,
    by_simple_name: BTreeMap<String, TypeRef>,
}

impl Imports {
    fn collect(artifact: &Artifact) -> Self {
        let own = artifact.type_ref();
        let mut by_simple_name = BTreeMap::new();
        for referenced in artifact.referenced_types() {
            if referenced == &own || referenced.simple_name() == own.simple_name() {
                continue;
            }
            by_simple_name
                .entry(referenced.simple_name().to_owned())
                .or_insert_with(|| referenced.clone());
        }
        Self {
            own,
            by_simple_name,
        }
    }

    /// Name to write in source for `type_ref`.
    fn name(&self, type_ref: &TypeRef) -> String {
        let imported = self.by_simple_name.get(type_ref.simple_name()) == Some(type_ref);
        if type_ref == &self.own || imported {
            type_ref.simple_name().to_owned()
        } else {
            type_ref.qualified_name()
        }
    }

    /// Sorted import lines needed by the unit.
    fn lines(&self) -> Vec<String> {
        self.by_simple_name
            .values()
            .filter(|t| t.package() != self.own.package() && t.package() != IMPLICIT_PACKAGE)
            .map(TypeRef::qualified_name)
            .sorted()
            .collect()
    }
}

fn modifiers(mods: &[Modifier]) -> String {
    mods.iter().map(|m| format!("{} ", m.keyword())).collect()
}

/// Wrapper struct to display a whole compilation unit.
struct JavaFile<'a> {
    artifact: &'a Artifact,
    imports: Imports,
}

impl Display for JavaFile<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let artifact = self.artifact;
        let imports = &self.imports;
        writeln!(f, "package {};", artifact.package)?;
        writeln!(f)?;
        let lines = imports.lines();
        if !lines.is_empty() {
            for line in lines {
                writeln!(f, "import {line};")?;
            }
            writeln!(f)?;
        }
        for annotation in &artifact.annotations {
            writeln!(f, "{}", DisplayAnnotation { annotation, imports })?;
        }
        let keyword = match artifact.kind {
            ArtifactKind::Interface => "interface",
            ArtifactKind::Class => "class",
        };
        write!(
            f,
            "{}{keyword} {}",
            modifiers(&artifact.modifiers),
            artifact.name
        )?;
        if let Some(superclass) = &artifact.superclass {
            write!(f, " extends {}", imports.name(superclass))?;
        }
        if !artifact.interfaces.is_empty() {
            let verb = match artifact.kind {
                ArtifactKind::Interface => "extends",
                ArtifactKind::Class => "implements",
            };
            let names = artifact.interfaces.iter().map(|i| imports.name(i)).join(", ");
            write!(f, " {verb} {names}")?;
        }
        writeln!(f, " {{")?;

        let mut blocks: Vec<String> = Vec::new();
        if !artifact.fields.is_empty() {
            blocks.push(
                artifact
                    .fields
                    .iter()
                    .map(|field| {
                        format!(
                            "  {}{} {};\n",
                            modifiers(&field.modifiers),
                            imports.name(&field.type_ref),
                            field.name
                        )
                    })
                    .collect(),
            );
        }
        let in_interface = artifact.kind == ArtifactKind::Interface;
        blocks.extend(artifact.methods.iter().map(|method| {
            DisplayMethod {
                method,
                in_interface,
                imports,
            }
            .to_string()
        }));
        write!(f, "{}", blocks.join("\n"))?;
        writeln!(f, "}}")
    }
}

/// Wrapper struct to display an annotation.
struct DisplayAnnotation<'a> {
    annotation: &'a Annotation,
    imports: &'a Imports,
}

impl Display for DisplayAnnotation<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.imports.name(&self.annotation.type_ref))?;
        if self.annotation.members.is_empty() {
            return Ok(());
        }
        let members = self
            .annotation
            .members
            .iter()
            .map(|(name, value)| match value {
                AnnotationValue::Classes(classes) => {
                    let list = classes
                        .iter()
                        .map(|c| format!("{}.class", self.imports.name(c)))
                        .join(", ");
                    format!("{name} = {{{list}}}")
                }
            })
            .join(", ");
        write!(f, "({members})")
    }
}

/// Wrapper struct to display a method or constructor.
struct DisplayMethod<'a> {
    method: &'a Method,
    in_interface: bool,
    imports: &'a Imports,
}

impl Display for DisplayMethod<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let method = self.method;
        for annotation in &method.annotations {
            writeln!(
                f,
                "  {}",
                DisplayAnnotation {
                    annotation,
                    imports: self.imports,
                }
            )?;
        }
        // Interface methods without a body are implicitly public and abstract.
        let mods: Vec<Modifier> = if self.in_interface && method.body.is_none() {
            method
                .modifiers
                .iter()
                .copied()
                .filter(|m| !matches!(m, Modifier::Public | Modifier::Abstract))
                .collect()
        } else {
            method.modifiers.clone()
        };
        write!(f, "  {}", modifiers(&mods))?;
        if let Some(returns) = &method.returns {
            write!(f, "{} ", self.imports.name(returns))?;
        }
        let params = method
            .parameters
            .iter()
            .map(|p| format!("{} {}", self.imports.name(&p.type_ref), p.name))
            .join(", ");
        write!(f, "{}({params})", method.name)?;
        match &method.body {
            None => writeln!(f, ";"),
            Some(statements) => {
                writeln!(f, " {{")?;
                for statement in statements {
                    writeln!(
                        f,
                        "    {}",
                        DisplayStatement {
                            statement,
                            imports: self.imports,
                        }
                    )?;
                }
                writeln!(f, "  }}")
            }
        }
    }
}

/// Wrapper struct to display a body statement.
struct DisplayStatement<'a> {
    statement: &'a Statement,
    imports: &'a Imports,
}

impl Display for DisplayStatement<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.statement {
            Statement::ReturnNew {
                type_ref,
                arguments,
            } => write!(
                f,
                "return new {}({});",
                self.imports.name(type_ref),
                arguments.join(", ")
            ),
            Statement::ReturnDelegate { receiver, method } => {
                write!(f, "return {receiver}.{method}();")
            }
            Statement::AssignField { field, parameter } => {
                write!(f, "this.{field} = {parameter};")
            }
        }
    }
}
