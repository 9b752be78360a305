//! Per-type cache of declared members, looked up by exact name.
//!
//! A [`DeclaredMemberCache`] is built on demand for one queried type and answers
//! "which method/field/property/event named `n` does this type declare?" with at most
//! one member. Each member kind gets its own [`Dispenser`], allocated the first time
//! that kind is queried, so a type and a method may share a name without conflict.
//!
//! Cache instances do not preserve identity: two threads may each build a cache for
//! the same type and both are valid. Anything that needs one cache per type keeps its
//! own dispenser of caches (see [`MemberCacheRegistry`](crate::registry::MemberCacheRegistry)).
use crate::{
    dispenser::{Dispenser, DispenserStats},
    error::ReflectionError,
};
use enum_dispatch::enum_dispatch;
use std::{
    fmt::{self, Display, Formatter},
    sync::OnceLock,
};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Field,
    Property,
    Event,
}

impl Display for MemberKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemberKind::Method => "method",
            MemberKind::Field => "field",
            MemberKind::Property => "property",
            MemberKind::Event => "event",
        })
    }
}

#[enum_dispatch]
pub trait MemberInfo {
    fn name(&self) -> &str;
    fn kind(&self) -> MemberKind;
}

/// Source of raw declared-member data for one queried type.
///
/// Enumerations list members declared directly on `definition`, in metadata order,
/// without inherited members.
pub trait MemberEnumerator {
    type Definition;
    type Method: MemberInfo + Clone;
    type Field: MemberInfo + Clone;
    type Property: MemberInfo + Clone;
    type Event: MemberInfo + Clone;

    fn display_name(&self) -> String;

    /// The definition declared-member lookups are anchored to. Generic instantiations
    /// answer with their generic definition; types that declare nothing (arrays,
    /// pointers, generic parameters) answer `None`.
    fn anchoring_type_definition(&self) -> Option<Self::Definition>;

    fn declared_methods(
        &self,
        definition: &Self::Definition,
    ) -> Result<impl Iterator<Item = Self::Method>, ReflectionError>;
    fn declared_fields(
        &self,
        definition: &Self::Definition,
    ) -> Result<impl Iterator<Item = Self::Field>, ReflectionError>;
    fn declared_properties(
        &self,
        definition: &Self::Definition,
    ) -> Result<impl Iterator<Item = Self::Property>, ReflectionError>;
    fn declared_events(
        &self,
        definition: &Self::Definition,
    ) -> Result<impl Iterator<Item = Self::Event>, ReflectionError>;
}

impl<T: MemberEnumerator + ?Sized> MemberEnumerator for &T {
    type Definition = T::Definition;
    type Method = T::Method;
    type Field = T::Field;
    type Property = T::Property;
    type Event = T::Event;

    fn display_name(&self) -> String {
        (**self).display_name()
    }

    fn anchoring_type_definition(&self) -> Option<Self::Definition> {
        (**self).anchoring_type_definition()
    }

    fn declared_methods(
        &self,
        definition: &Self::Definition,
    ) -> Result<impl Iterator<Item = Self::Method>, ReflectionError> {
        (**self).declared_methods(definition)
    }

    fn declared_fields(
        &self,
        definition: &Self::Definition,
    ) -> Result<impl Iterator<Item = Self::Field>, ReflectionError> {
        (**self).declared_fields(definition)
    }

    fn declared_properties(
        &self,
        definition: &Self::Definition,
    ) -> Result<impl Iterator<Item = Self::Property>, ReflectionError> {
        (**self).declared_properties(definition)
    }

    fn declared_events(
        &self,
        definition: &Self::Definition,
    ) -> Result<impl Iterator<Item = Self::Event>, ReflectionError> {
        (**self).declared_events(definition)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub methods: DispenserStats,
    pub fields: DispenserStats,
    pub properties: DispenserStats,
    pub events: DispenserStats,
}

impl CacheStats {
    pub fn total(&self) -> DispenserStats {
        self.methods + self.fields + self.properties + self.events
    }
}

type Table<M> = OnceLock<Dispenser<String, Option<M>>>;

pub struct DeclaredMemberCache<T: MemberEnumerator> {
    type_info: T,
    methods: Table<T::Method>,
    fields: Table<T::Field>,
    properties: Table<T::Property>,
    events: Table<T::Event>,
}

impl<T: MemberEnumerator> DeclaredMemberCache<T> {
    pub fn new(type_info: T) -> Self {
        Self {
            type_info,
            methods: OnceLock::new(),
            fields: OnceLock::new(),
            properties: OnceLock::new(),
            events: OnceLock::new(),
        }
    }

    pub fn type_info(&self) -> &T {
        &self.type_info
    }

    pub fn get_declared_method(&self, name: &str) -> Result<Option<T::Method>, ReflectionError> {
        self.methods
            .get_or_init(Dispenser::new)
            .get_or_try_add(name, |name| {
                let Some(definition) = self.type_info.anchoring_type_definition() else {
                    return Ok(None);
                };
                let members = self.type_info.declared_methods(&definition)?;
                self.single_match(MemberKind::Method, name, members)
            })
    }

    pub fn get_declared_field(&self, name: &str) -> Result<Option<T::Field>, ReflectionError> {
        self.fields
            .get_or_init(Dispenser::new)
            .get_or_try_add(name, |name| {
                let Some(definition) = self.type_info.anchoring_type_definition() else {
                    return Ok(None);
                };
                let members = self.type_info.declared_fields(&definition)?;
                self.single_match(MemberKind::Field, name, members)
            })
    }

    pub fn get_declared_property(
        &self,
        name: &str,
    ) -> Result<Option<T::Property>, ReflectionError> {
        self.properties
            .get_or_init(Dispenser::new)
            .get_or_try_add(name, |name| {
                let Some(definition) = self.type_info.anchoring_type_definition() else {
                    return Ok(None);
                };
                let members = self.type_info.declared_properties(&definition)?;
                self.single_match(MemberKind::Property, name, members)
            })
    }

    pub fn get_declared_event(&self, name: &str) -> Result<Option<T::Event>, ReflectionError> {
        self.events
            .get_or_init(Dispenser::new)
            .get_or_try_add(name, |name| {
                let Some(definition) = self.type_info.anchoring_type_definition() else {
                    return Ok(None);
                };
                let members = self.type_info.declared_events(&definition)?;
                self.single_match(MemberKind::Event, name, members)
            })
    }

    pub fn stats(&self) -> CacheStats {
        fn table_stats<M: Clone>(table: &Table<M>) -> DispenserStats {
            table.get().map(Dispenser::stats).unwrap_or_default()
        }
        CacheStats {
            methods: table_stats(&self.methods),
            fields: table_stats(&self.fields),
            properties: table_stats(&self.properties),
            events: table_stats(&self.events),
        }
    }

    fn single_match<M: MemberInfo>(
        &self,
        kind: MemberKind,
        name: &str,
        members: impl Iterator<Item = M>,
    ) -> Result<Option<M>, ReflectionError> {
        let mut matches = members.filter(|m| m.name() == name);
        let Some(result) = matches.next() else {
            return Ok(None);
        };
        if matches.next().is_some() {
            let type_name = self.type_info.display_name();
            debug!(%kind, name, type_name = %type_name, "ambiguous declared member lookup");
            return Err(ReflectionError::AmbiguousMember {
                kind,
                type_name,
                name: name.to_string(),
            });
        }
        Ok(Some(result))
    }
}
