//! Reading declared dependencies out of Maven POM descriptors.

use crate::core::{Coordinate, JarvaultError, JarvaultResult, LATEST};
use crate::di::DescriptorParser;
use quick_xml::events::Event;
use quick_xml::Reader;

const DEPENDENCY_PATH: [&str; 3] = ["project", "dependencies", "dependency"];

/// Scopes that are not needed at runtime by the consuming project
const SKIPPED_SCOPES: [&str; 2] = ["test", "provided"];

/// One-level POM reader.
///
/// Only `project/dependencies/dependency` is read: `dependencyManagement`,
/// profiles and plugin dependencies are ignored. `${...}` properties are not
/// interpolated; a placeholder version (or none) becomes `latest` and a
/// placeholder group is dropped so the index picks the group.
#[derive(Debug, Clone, Copy, Default)]
pub struct PomParser;

#[derive(Debug, Default)]
struct DeclaredDependency {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    classifier: Option<String>,
    scope: Option<String>,
    optional: Option<String>,
    kind: Option<String>,
}

impl DeclaredDependency {
    fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "groupId" => &mut self.group_id,
            "artifactId" => &mut self.artifact_id,
            "version" => &mut self.version,
            "classifier" => &mut self.classifier,
            "scope" => &mut self.scope,
            "optional" => &mut self.optional,
            "type" => &mut self.kind,
            _ => return,
        };
        *slot = Some(value);
    }

    fn into_coordinate(self) -> Option<Coordinate> {
        let artifact_id = self.artifact_id.filter(|a| !a.is_empty() && !is_placeholder(a))?;

        if self
            .scope
            .as_deref()
            .is_some_and(|s| SKIPPED_SCOPES.contains(&s))
        {
            return None;
        }
        if self.optional.as_deref() == Some("true") {
            return None;
        }
        if self.kind.as_deref().is_some_and(|t| t == "pom") {
            return None;
        }

        let group_id = self.group_id.filter(|g| !is_placeholder(g));
        let version = self
            .version
            .filter(|v| !v.is_empty() && !is_placeholder(v))
            .unwrap_or_else(|| LATEST.to_string());

        let mut coordinate = Coordinate::new(group_id.as_deref(), &artifact_id, &version);
        if let Some(classifier) = self.classifier.filter(|c| !c.is_empty() && !is_placeholder(c)) {
            coordinate = coordinate.with_classifier(&classifier);
        }
        Some(coordinate)
    }
}

fn is_placeholder(value: &str) -> bool {
    value.contains("${")
}

impl PomParser {
    pub fn parse(&self, document: &str) -> JarvaultResult<Vec<Coordinate>> {
        let mut reader = Reader::from_str(document);
        reader.config_mut().trim_text(true);

        let mut path: Vec<String> = Vec::new();
        let mut current: Option<DeclaredDependency> = None;
        let mut dependencies = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    path.push(name);
                    if path == DEPENDENCY_PATH {
                        current = Some(DeclaredDependency::default());
                    }
                }
                Ok(Event::End(_)) => {
                    if path == DEPENDENCY_PATH {
                        if let Some(coordinate) =
                            current.take().and_then(DeclaredDependency::into_coordinate)
                        {
                            dependencies.push(coordinate);
                        }
                    }
                    path.pop();
                }
                Ok(Event::Text(ref e)) => {
                    let in_dependency_field = path.len() == DEPENDENCY_PATH.len() + 1
                        && path[..DEPENDENCY_PATH.len()] == DEPENDENCY_PATH;
                    if let (true, Some(dependency)) = (in_dependency_field, current.as_mut()) {
                        let value = e
                            .unescape()
                            .map_err(|err| descriptor_error(&reader, err))?
                            .trim()
                            .to_string();
                        if let Some(field) = path.last() {
                            dependency.set(field, value);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(descriptor_error(&reader, e)),
                _ => {}
            }
        }

        Ok(dependencies)
    }
}

fn descriptor_error(reader: &Reader<&[u8]>, error: impl std::fmt::Display) -> JarvaultError {
    JarvaultError::Descriptor(format!(
        "Invalid descriptor at byte {}: {}",
        reader.buffer_position(),
        error
    ))
}

impl DescriptorParser for PomParser {
    fn extract_declared_dependencies(&self, document: &str) -> JarvaultResult<Vec<Coordinate>> {
        self.parse(document)
    }
}
