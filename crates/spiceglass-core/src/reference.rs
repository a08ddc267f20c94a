//! Reference strings for objects, subjects, and relationships
//!
//! SpiceDB addresses everything with compact colon/hash/at separated
//! strings: `user:picard` names an object, `starship_role:captain#user`
//! names a subject set, and `starship:enterprise#crew_member@user:picard`
//! names a relationship. The types here parse that grammar with `FromStr`
//! and write it back out with `Display`, so a value round-trips through
//! its canonical string form unchanged.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A typed object, e.g. `user:picard`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    object_type: String,
    object_id: String,
}

impl ObjectRef {
    /// Create an object reference from its type and id.
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
        }
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)
    }
}

impl FromStr for ObjectRef {
    type Err = Error;

    /// Parse `type:id`. The id keeps everything after the first colon.
    fn from_str(s: &str) -> Result<Self> {
        let (object_type, object_id) = s
            .split_once(':')
            .ok_or_else(|| Error::invalid_reference(format!("expected `type:id`, got `{s}`")))?;
        if object_type.is_empty() || object_id.is_empty() {
            return Err(Error::invalid_reference(format!(
                "expected `type:id`, got `{s}`"
            )));
        }
        Ok(Self::new(object_type, object_id))
    }
}

/// A subject, either a plain object (`user:picard`) or a set of subjects
/// reachable through a relation on an object (`starship_role:captain#user`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectRef {
    object: ObjectRef,
    relation: Option<String>,
}

impl SubjectRef {
    /// Create a direct subject with no relation.
    pub fn new(object: ObjectRef) -> Self {
        Self {
            object,
            relation: None,
        }
    }

    /// Create a subject narrowed to a relation on the object. An empty
    /// relation is treated as absent.
    pub fn with_relation(object: ObjectRef, relation: impl Into<String>) -> Self {
        let relation = relation.into();
        Self {
            object,
            relation: (!relation.is_empty()).then_some(relation),
        }
    }

    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    pub fn relation(&self) -> Option<&str> {
        self.relation.as_deref()
    }

    /// Whether this subject names a set of subjects (carries a relation)
    /// rather than a single object.
    pub fn is_indirect(&self) -> bool {
        self.relation.is_some()
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.relation {
            Some(relation) => write!(f, "{}#{}", self.object, relation),
            None => write!(f, "{}", self.object),
        }
    }
}

impl FromStr for SubjectRef {
    type Err = Error;

    /// Parse `type:id` or `type:id#relation`. A trailing `#` with nothing
    /// after it normalizes to a direct subject.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('#') {
            Some((object, relation)) => {
                Ok(Self::with_relation(object.parse::<ObjectRef>()?, relation))
            }
            None => Ok(Self::new(s.parse::<ObjectRef>()?)),
        }
    }
}

/// A relationship tuple: `resource#relation@subject`, e.g.
/// `starship:enterprise#crew_member@user:picard`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relationship {
    resource: ObjectRef,
    relation: String,
    subject: SubjectRef,
}

impl Relationship {
    pub fn new(resource: ObjectRef, relation: impl Into<String>, subject: SubjectRef) -> Self {
        Self {
            resource,
            relation: relation.into(),
            subject,
        }
    }

    pub fn resource(&self) -> &ObjectRef {
        &self.resource
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn subject(&self) -> &SubjectRef {
        &self.subject
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.resource, self.relation, self.subject)
    }
}

impl FromStr for Relationship {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (resource, relation, subject) = split_tuple(s)?;
        Ok(Self::new(
            resource.parse()?,
            relation,
            subject.parse()?,
        ))
    }
}

/// A permission to test: `resource#permission@subject`. Same grammar as
/// [`Relationship`], but the middle segment names a permission to check
/// rather than a relation to store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionQuery {
    resource: ObjectRef,
    permission: String,
    subject: SubjectRef,
}

impl PermissionQuery {
    pub fn new(resource: ObjectRef, permission: impl Into<String>, subject: SubjectRef) -> Self {
        Self {
            resource,
            permission: permission.into(),
            subject,
        }
    }

    pub fn resource(&self) -> &ObjectRef {
        &self.resource
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    pub fn subject(&self) -> &SubjectRef {
        &self.subject
    }
}

impl fmt::Display for PermissionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.resource, self.permission, self.subject)
    }
}

impl FromStr for PermissionQuery {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (resource, permission, subject) = split_tuple(s)?;
        Ok(Self::new(
            resource.parse()?,
            permission,
            subject.parse()?,
        ))
    }
}

/// Split `resource#relation@subject` into its three raw segments.
///
/// The subject is everything after the last `@`, and the relation sits
/// between the last `#` before that and the `@`. Splitting from the right
/// keeps `#` inside the subject segment available for subject relations,
/// as in `starship_system:phasers#role@starship_role:captain#user`.
fn split_tuple(s: &str) -> Result<(&str, &str, &str)> {
    let invalid =
        || Error::invalid_reference(format!("expected `resource#relation@subject`, got `{s}`"));
    let (left, subject) = s.rsplit_once('@').ok_or_else(invalid)?;
    let (resource, relation) = left.rsplit_once('#').ok_or_else(invalid)?;
    if relation.is_empty() || subject.is_empty() {
        return Err(invalid());
    }
    Ok((resource, relation, subject))
}
